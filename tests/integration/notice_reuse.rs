//! Reuse of an existing `NOTICE.txt` between runs.

use anyhow::Result;
use noticegen::test_utils::{ConfigFixture, ManifestFixture, MockHttpClient};
use serde_json::json;

use crate::common::TestRepository;

fn registry() -> MockHttpClient {
    MockHttpClient::new()
        .with_json(
            "https://registry.npmjs.org/left-pad",
            &json!({
                "name": "left-pad",
                "author": "azer",
                "license": "WTFPL",
                "homepage": "https://github.com/stevemao/left-pad"
            }),
        )
        .with_body(
            "https://raw.githubusercontent.com/stevemao/left-pad/HEAD/LICENSE",
            "WTFPL\n\nEveryone is permitted to copy and distribute.\n",
        )
        .with_json("https://registry.npmjs.org/react", &json!({"name": "react", "license": "MIT"}))
        .with_json("https://registry.npmjs.org/jest", &json!({"name": "jest"}))
}

fn setup() -> Result<TestRepository> {
    let repo = TestRepository::new()?;
    ManifestFixture::package_json().write_to(repo.root())?;
    repo.write_config(&ConfigFixture::searching(&["package.json"]))?;
    Ok(repo)
}

#[tokio::test]
async fn test_second_run_is_identical_and_offline() -> Result<()> {
    let repo = setup()?;
    repo.run(&registry()).await?;
    let first = repo.notice()?;

    let offline = MockHttpClient::new();
    let summary = repo.run(&offline).await?;

    assert_eq!(summary.reused, 3);
    assert_eq!(summary.generated, 0);
    assert!(offline.requests().is_empty());
    assert_eq!(repo.notice()?, first);
    Ok(())
}

#[tokio::test]
async fn test_crlf_license_text_is_stable_between_runs() -> Result<()> {
    let repo = setup()?;
    let http = registry().with_body(
        "https://raw.githubusercontent.com/stevemao/left-pad/HEAD/LICENSE.txt",
        "MIT\r\nLine two\r\n",
    );
    repo.run(&http).await?;
    let first = repo.notice()?;
    assert!(first.contains("* LICENSE: WTFPL\n\nMIT\nLine two\n\n\n"));
    assert!(!first.contains('\r'));

    let summary = repo.run(&MockHttpClient::new()).await?;
    assert_eq!(summary.reused, 3);
    assert_eq!(repo.notice()?, first);
    Ok(())
}

#[tokio::test]
async fn test_hand_edits_survive_regeneration() -> Result<()> {
    let repo = setup()?;
    repo.run(&registry()).await?;

    let edited = repo.notice()?.replace(
        "This product contains 'react'.",
        "This product contains 'react' by Meta Platforms, Inc.",
    );
    repo.write("NOTICE.txt", &edited)?;

    repo.run(&MockHttpClient::new()).await?;
    assert_eq!(repo.notice()?, edited);
    Ok(())
}

#[tokio::test]
async fn test_removed_section_is_resolved_again() -> Result<()> {
    let repo = setup()?;
    repo.run(&registry()).await?;
    let first = repo.notice()?;

    let start = first.find("## react").unwrap();
    let truncated = first[..start].trim_end_matches("---\n\n").to_string();
    repo.write("NOTICE.txt", &truncated)?;

    let http = registry();
    let summary = repo.run(&http).await?;

    assert_eq!(summary.reused, 2);
    assert_eq!(summary.generated, 1);
    assert_eq!(http.requests(), vec!["https://registry.npmjs.org/react"]);
    assert_eq!(repo.notice()?, first);
    Ok(())
}

#[tokio::test]
async fn test_dropped_dependency_leaves_the_document() -> Result<()> {
    let repo = setup()?;
    repo.run(&registry()).await?;
    assert!(repo.notice()?.contains("## jest"));

    repo.write_config(
        &ConfigFixture::searching(&["package.json"]).with_yaml("includeDevDependencies: false"),
    )?;
    let summary = repo.run(&MockHttpClient::new()).await?;

    assert_eq!(summary.dependencies, 2);
    let notice = repo.notice()?;
    assert!(!notice.contains("## jest"));
    assert!(notice.trim_end().ends_with("* LICENSE: MIT"));
    Ok(())
}

#[tokio::test]
async fn test_stale_work_directory_is_cleared() -> Result<()> {
    let repo = setup()?;
    repo.write(".notice-work/left-pad", "## left-pad\n\nstale\n\n")?;
    repo.write(".notice-work/orphan", "## orphan\n\n")?;

    repo.run(&registry()).await?;

    let notice = repo.notice()?;
    assert!(!notice.contains("stale"));
    assert!(!notice.contains("orphan"));
    assert!(!repo.exists(".notice-work/orphan"));
    Ok(())
}

#[tokio::test]
async fn test_header_follows_configuration() -> Result<()> {
    let repo = setup()?;
    repo.run(&registry()).await?;

    let config = ConfigFixture {
        content: "title: New Title\ncopyright: New Copyright\ndescription: New Description\nsearch:\n  - package.json\n"
            .to_string(),
    };
    repo.write_config(&config)?;
    repo.run(&MockHttpClient::new()).await?;

    assert!(repo.notice()?.starts_with(
        "New Title\n\nNew Copyright\n\nNOTICES:\n--------\n\nNew Description\n\n--------\n\n## jest\n"
    ));
    Ok(())
}
