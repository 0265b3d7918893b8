//! `go.mod` scanning, vanity import discovery and GitHub enrichment.

use anyhow::Result;
use noticegen::test_utils::{ConfigFixture, ManifestFixture, MockHttpClient, go_import_page};
use serde_json::json;

use crate::common::TestRepository;

fn go_services() -> MockHttpClient {
    MockHttpClient::new()
        .with_body(
            "https://github.com/pkg/errors?go-get=1",
            go_import_page("github.com/pkg/errors", "git", "https://github.com/pkg/errors"),
        )
        .with_body(
            "https://gopkg.in/yaml.v3?go-get=1",
            go_import_page("gopkg.in/yaml.v3", "git", "https://gopkg.in/yaml.v3"),
        )
        .with_json(
            "https://api.github.com/repos/pkg/errors",
            &json!({
                "description": "Simple error handling primitives",
                "html_url": "https://github.com/pkg/errors",
                "owner": {"login": "pkg"},
                "license": {"name": "BSD 2-Clause \"Simplified\" License"}
            }),
        )
        .with_json(
            "https://api.github.com/repos/go-yaml/yaml",
            &json!({
                "description": "YAML support for the Go language.",
                "homepage": "",
                "html_url": "https://github.com/go-yaml/yaml",
                "owner": {"login": "go-yaml"},
                "license": {"name": "Apache License 2.0"}
            }),
        )
        .with_json("https://api.github.com/users/go-yaml", &json!({"name": null}))
        .with_json(
            "https://api.github.com/repos/golang/go",
            &json!({
                "description": "The Go programming language",
                "homepage": "https://go.dev",
                "owner": {"login": "golang"},
                "license": {"name": "BSD 3-Clause \"New\" or \"Revised\" License"}
            }),
        )
        .with_json("https://api.github.com/users/golang", &json!({"name": "Go"}))
        .with_body("https://raw.githubusercontent.com/golang/go/HEAD/LICENSE", "Go license\n")
        .with_body("https://raw.githubusercontent.com/go-yaml/yaml/HEAD/LICENSE", "Apache\n")
}

#[tokio::test]
async fn test_go_module_notice() -> Result<()> {
    let repo = TestRepository::new()?;
    ManifestFixture::go_mod().write_to(repo.root())?;
    repo.write_config(&ConfigFixture::searching(&["go.mod"]))?;

    let http = go_services();
    let summary = repo.run(&http).await?;
    assert_eq!(summary.dependencies, 3);

    let notice = repo.notice()?;
    let go = notice.find("## Go\n").unwrap();
    let yaml = notice.find("## go-yaml/yaml\n").unwrap();
    let errors = notice.find("## pkg/errors\n").unwrap();
    assert!(go < yaml && yaml < errors);

    assert!(notice.contains("This product contains 'Go' by Go.\n\nThe Go programming language\n\n* HOMEPAGE:\n  * https://go.dev\n\n"));
    assert!(notice.contains("This product contains 'go-yaml/yaml' by go-yaml.\n\nYAML support for the Go language.\n\n* HOMEPAGE:\n  * https://github.com/go-yaml/yaml\n\n* LICENSE: Apache License 2.0\n\nApache\n\n"));
    assert!(notice.contains("This product contains 'pkg/errors' by pkg.\n\n"));

    assert!(!http.requested_containing("golang.org/x/sys"));
    Ok(())
}

#[tokio::test]
async fn test_github_requests_carry_token() -> Result<()> {
    let repo = TestRepository::new()?;
    ManifestFixture::go_mod().write_to(repo.root())?;
    repo.write_config(&ConfigFixture::searching(&["go.mod"]))?;

    let http = go_services();
    repo.run(&http).await?;

    for request in http.recorded() {
        if request.url.starts_with("https://api.github.com/") {
            assert_eq!(request.bearer.as_deref(), Some("test-token"), "{}", request.url);
        } else {
            assert_eq!(request.bearer, None, "{}", request.url);
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_vanity_fallback_to_module_root() -> Result<()> {
    let repo = TestRepository::new()?;
    repo.write("go.mod", "module example.com/m\n\nrequire example.org/a/b/c v1.0.0\n")?;
    repo.write_config(&ConfigFixture::searching(&["go.mod"]))?;

    let http = MockHttpClient::new()
        .with_status("https://example.org/a/b/c?go-get=1", 404)
        .with_body(
            "https://example.org/a/b?go-get=1",
            go_import_page("example.org/a/b", "git", "https://github.com/org/b"),
        )
        .with_json(
            "https://api.github.com/repos/org/b",
            &json!({"owner": {"login": "org"}, "license": {"name": "MIT License"}}),
        );

    repo.run(&http).await?;

    let notice = repo.notice()?;
    assert!(notice.contains("## a/b\n\nThis product contains 'a/b' by org.\n\n"));
    assert!(notice.contains("* LICENSE: MIT License\n\n"));
    Ok(())
}

#[tokio::test]
async fn test_unresolvable_module_gets_bare_notice() -> Result<()> {
    let repo = TestRepository::new()?;
    repo.write("go.mod", "module example.com/m\n\nrequire example.org/team/gone v1.0.0\n")?;
    repo.write_config(&ConfigFixture::searching(&["go.mod"]))?;

    let http = MockHttpClient::new();
    let summary = repo.run(&http).await?;

    assert_eq!(summary.dependencies, 2);
    assert_eq!(summary.degraded, 2);
    assert_eq!(summary.written, 2);
    let notice = repo.notice()?;
    assert!(notice.contains("## Go\n"));
    assert!(notice.ends_with("---\n\n## team/gone\n\nThis product contains 'team/gone'.\n\n\n\n"));
    assert!(http.was_requested("https://example.org/team/gone?go-get=1"));
    assert!(!http.requested_containing("api.github.com/repos/team"));
    Ok(())
}

#[tokio::test]
async fn test_pipfile_repositories() -> Result<()> {
    let repo = TestRepository::new()?;
    ManifestFixture::pipfile().write_to(repo.root())?;
    repo.write_config(&ConfigFixture::searching(&["Pipfile"]))?;

    let http = MockHttpClient::new()
        .with_json(
            "https://api.github.com/repos/psf/requests",
            &json!({"description": "A simple, yet elegant, HTTP library.", "owner": {"login": "psf"}}),
        )
        .with_json("https://api.github.com/users/psf", &json!({"name": "Python Software Foundation"}));

    let summary = repo.run(&http).await?;
    assert_eq!(summary.dependencies, 2);
    assert_eq!(summary.degraded, 1);

    let notice = repo.notice()?;
    assert!(notice.contains("## requests\n\nThis product contains 'requests' by Python Software Foundation.\n\n"));
    assert!(notice.contains("## flask\n"));
    Ok(())
}
