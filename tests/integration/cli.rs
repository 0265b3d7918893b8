//! Tests of the compiled `noticegen` binary.

use anyhow::Result;
use assert_cmd::Command;
use noticegen::test_utils::ConfigFixture;
use predicates::prelude::*;

use crate::common::TestRepository;

fn noticegen() -> Command {
    let mut cmd = Command::cargo_bin("noticegen").expect("noticegen binary is built");
    cmd.env_remove("GITHUB_TOKEN").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_options() {
    noticegen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--max-parallel"));
}

#[test]
fn test_config_is_required() {
    noticegen()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn test_missing_config_file() -> Result<()> {
    let repo = TestRepository::new()?;

    noticegen()
        .arg("-p")
        .arg(repo.root())
        .arg("-c")
        .arg(repo.root().join("missing.yaml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"));
    Ok(())
}

#[test]
fn test_invalid_config_file() -> Result<()> {
    let repo = TestRepository::new()?;
    let config = repo.write("notice.yaml", "search: [unterminated\n")?;

    noticegen()
        .arg("-p")
        .arg(repo.root())
        .arg("-c")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("notice.yaml"));
    Ok(())
}

#[test]
fn test_header_only_run_needs_no_network() -> Result<()> {
    let repo = TestRepository::new()?;
    let config = repo.write_config(&ConfigFixture::searching(&[]))?;

    noticegen().arg("-p").arg(repo.root()).arg("-c").arg(&config).arg("-q").assert().success();

    assert_eq!(
        repo.notice()?,
        "Example Notices\n\nCopyright (c) Example Corp\n\nNOTICES:\n--------\n\nThird-party software used by Example.\n\n--------\n\n"
    );
    assert!(repo.exists(".notice"));
    assert!(repo.exists(".notice-work"));
    Ok(())
}
