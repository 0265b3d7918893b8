//! Common test utilities for noticegen integration tests
//!
//! A [`TestRepository`] is a throwaway repository root with manifests and a
//! configuration file, run against a `MockHttpClient`.

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use noticegen::config::{NoticeConfig, RunContext};
use noticegen::pipeline::{self, RunSummary};
use noticegen::test_utils::{ConfigFixture, MockHttpClient};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Repository root in a temporary directory.
pub struct TestRepository {
    _temp: TempDir,
    root: PathBuf,
}

impl TestRepository {
    /// Create an empty repository.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new()?;
        let root = temp.path().canonicalize()?;
        Ok(Self {
            _temp: temp,
            root,
        })
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn write(&self, path: &str, content: &str) -> Result<PathBuf> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, content).with_context(|| format!("Failed to write {}", full.display()))?;
        Ok(full)
    }

    /// Write `notice.yaml` at the root.
    pub fn write_config(&self, config: &ConfigFixture) -> Result<PathBuf> {
        config.write_to(&self.root.join("notice.yaml"))
    }

    /// Run context for the configuration written by [`Self::write_config`].
    pub fn context(&self) -> Result<RunContext> {
        let config = NoticeConfig::load(&self.root.join("notice.yaml"))?;
        RunContext::from_config(config, &self.root, Some("test-token".to_string()), Some(4))
    }

    /// Run the pipeline once.
    pub async fn run(&self, http: &MockHttpClient) -> Result<RunSummary> {
        pipeline::run(&self.context()?, http).await
    }

    /// Content of `NOTICE.txt`.
    pub fn notice(&self) -> Result<String> {
        let path = self.root.join("NOTICE.txt");
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Whether a file exists relative to the root.
    pub fn exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }
}
