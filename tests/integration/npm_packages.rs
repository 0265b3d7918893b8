//! `package.json` scanning and npm registry resolution.

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
                "description": "String left pad",
                "author": {"name": "azer"},
                "license": "WTFPL",
                "homepage": "https://github.com/stevemao/left-pad#readme",
                "repository": {"type": "git", "url": "git+https://github.com/stevemao/left-pad.git"}
            }),
        )
        .with_body(
            "https://raw.githubusercontent.com/stevemao/left-pad/HEAD/LICENSE",
            "DO WHAT THE FUCK YOU WANT TO PUBLIC LICENSE\n",
        )
        .with_json(
            "https://registry.npmjs.org/react",
            &json!({"name": "react", "license": "MIT", "homepage": "https://react.dev/"}),
        )
        .with_json("https://registry.npmjs.org/jest", &json!({"name": "jest", "license": "MIT"}))
}

#[tokio::test]
async fn test_left_pad_end_to_end() -> Result<()> {
    let repo = TestRepository::new()?;
    repo.write(
        "package.json",
        r#"{"name": "app", "dependencies": {"left-pad": "^1.3.0"}}"#,
    )?;
    repo.write_config(&ConfigFixture::searching(&["package.json"]))?;

    let http = MockHttpClient::new()
        .with_json(
            "https://registry.npmjs.org/left-pad",
            &json!({
                "name": "left-pad",
                "license": "WTFPL",
                "homepage": "https://github.com/stevemao/left-pad"
            }),
        )
        .with_body(
            "https://raw.githubusercontent.com/stevemao/left-pad/HEAD/LICENSE.txt",
            "WTFPL text",
        );

    let summary = repo.run(&http).await?;
    assert_eq!(summary.written, 1);

    let notice = repo.notice()?;
    assert_eq!(
        notice,
        "Example Notices\n\n\
         Copyright (c) Example Corp\n\n\
         NOTICES:\n--------\n\n\
         Third-party software used by Example.\n\n\
         --------\n\n\
         ## left-pad\n\n\
         This product contains 'left-pad'.\n\n\
         * HOMEPAGE:\n  * https://github.com/stevemao/left-pad\n\n\
         * LICENSE: WTFPL\n\n\
         WTFPL text\n\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_sections_are_sorted_and_separated() -> Result<()> {
    let repo = TestRepository::new()?;
    ManifestFixture::package_json().write_to(repo.root())?;
    repo.write_config(&ConfigFixture::searching(&["package.json"]))?;

    let http = registry();
    let summary = repo.run(&http).await?;
    assert_eq!(summary.dependencies, 3);
    assert_eq!(summary.generated, 3);

    let notice = repo.notice()?;
    let jest = notice.find("## jest").unwrap();
    let left_pad = notice.find("## left-pad").unwrap();
    let react = notice.find("## react").unwrap();
    assert!(jest < left_pad && left_pad < react);

    assert_eq!(notice.matches("\n---\n\n").count(), 2);
    assert!(notice.contains("This product contains 'left-pad' by azer.\n\nString left pad\n\n"));
    assert!(notice.contains("DO WHAT THE FUCK YOU WANT TO PUBLIC LICENSE\n"));
    Ok(())
}

#[tokio::test]
async fn test_dev_dependencies_additional_and_ignored() -> Result<()> {
    let repo = TestRepository::new()?;
    ManifestFixture::package_json().write_to(repo.root())?;
    repo.write_config(
        &ConfigFixture::searching(&["package.json"]).with_yaml(
            "includeDevDependencies: false\n\
             additionalDependencies:\n  - wix\n  - ignored\n\
             ignoreDependencies:\n  - ignored\n  - react\n",
        ),
    )?;

    let http = registry().with_json("https://registry.npmjs.org/wix", &json!({"name": "wix"}));
    repo.run(&http).await?;

    let notice = repo.notice()?;
    assert!(notice.contains("## left-pad"));
    assert!(notice.contains("## wix"));
    assert!(!notice.contains("## jest"));
    assert!(!notice.contains("## react"));
    assert!(!notice.contains("## ignored"));
    assert!(!http.was_requested("https://registry.npmjs.org/ignored"));
    Ok(())
}

#[tokio::test]
async fn test_registry_failure_keeps_a_section() -> Result<()> {
    let repo = TestRepository::new()?;
    repo.write(
        "package.json",
        r#"{"dependencies": {"invalid-npm-package": "1.0.0", "react": "18.0.0"}}"#,
    )?;
    repo.write_config(&ConfigFixture::searching(&["package.json"]))?;

    let http = registry().with_network_failure("https://registry.npmjs.org/invalid-npm-package");
    let summary = repo.run(&http).await?;

    assert_eq!(summary.degraded, 1);
    assert_eq!(summary.generated, 1);
    let notice = repo.notice()?;
    assert!(notice.contains("## invalid-npm-package\n\nThis product contains 'invalid-npm-package'.\n\n"));
    assert!(notice.contains("## react"));
    Ok(())
}

#[tokio::test]
async fn test_glob_search_merges_workspaces() -> Result<()> {
    let repo = TestRepository::new()?;
    repo.write("apps/web/package.json", r#"{"dependencies": {"react": "18"}}"#)?;
    repo.write("apps/cli/package.json", r#"{"dependencies": {"left-pad": "1", "react": "18"}}"#)?;
    repo.write_config(&ConfigFixture::searching(&["apps/*/package.json"]))?;

    let http = registry();
    let summary = repo.run(&http).await?;

    assert_eq!(summary.dependencies, 2);
    assert_eq!(
        http.requests().iter().filter(|u| u.as_str() == "https://registry.npmjs.org/react").count(),
        1
    );
    Ok(())
}

#[tokio::test]
async fn test_invalid_manifest_is_fatal() -> Result<()> {
    let repo = TestRepository::new()?;
    repo.write("package.json", "{ \"dependencies\": ")?;
    repo.write_config(&ConfigFixture::searching(&["package.json"]))?;

    let err = repo.run(&MockHttpClient::new()).await.unwrap_err();
    assert!(err.to_string().contains("Invalid manifest file syntax"));
    assert!(!repo.exists("NOTICE.txt"));
    Ok(())
}
