//! Run configuration.
//!
//! A run is described by two layers:
//!
//! 1. **Configuration file** (YAML, passed with `--config`) - document
//!    strings and dependency selection, usually committed next to the
//!    repository's CI setup
//! 2. **Command line** - repository root, GitHub token and concurrency
//!
//! [`RunContext::from_config`] merges both into the immutable context the
//! pipeline runs with.
//!
//! # Configuration File
//!
//! ```yaml
//! title: Example Notices
//! copyright: Copyright (c) Example Corp
//! description: Third-party software used by Example.
//! reviewers:
//!   - legal-team
//! search:
//!   - go.mod
//!   - package.json
//!   - apps/*/package.json
//!   - Pipfile
//! includeDevDependencies: false
//! additionalDependencies:
//!   - wix
//! ignoreDependencies:
//!   - internal-tool
//! ```
//!
//! Every key is optional and unknown keys are ignored.
//! `includeDevDependencies` defaults to `true`.

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::constants::{NOTICE_CACHE_DIR, NOTICE_FILE_NAME, NOTICE_WORK_DIR, default_max_parallel};
use crate::core::{Dependency, NoticeError};
use crate::manifest::{ManifestPaths, PackageScanOptions};
use crate::notice::NoticeHeader;
use crate::resolver::Endpoints;

fn default_true() -> bool {
    true
}

/// Contents of the YAML configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeConfig {
    /// First line of the document
    #[serde(default)]
    pub title: String,
    /// Copyright line below the title
    #[serde(default)]
    pub copyright: String,
    /// Paragraph framed by the banner lines
    #[serde(default)]
    pub description: String,
    /// People responsible for reviewing the document. Informational only.
    #[serde(default)]
    pub reviewers: Vec<String>,
    /// Manifest paths or glob patterns, relative to the repository root
    #[serde(default)]
    pub search: Vec<String>,
    /// Whether `devDependencies` of `package.json` files are attributed
    #[serde(default = "default_true")]
    pub include_dev_dependencies: bool,
    /// npm packages attributed even when no manifest declares them
    #[serde(default)]
    pub additional_dependencies: Vec<String>,
    /// Dependencies never attributed, matched by name or full name
    #[serde(default)]
    pub ignore_dependencies: Vec<String>,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            copyright: String::new(),
            description: String::new(),
            reviewers: Vec::new(),
            search: Vec::new(),
            include_dev_dependencies: true,
            additional_dependencies: Vec::new(),
            ignore_dependencies: Vec::new(),
        }
    }
}

impl NoticeConfig {
    /// Parse a configuration document.
    ///
    /// An empty document yields the defaults.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeError::ConfigFileNotFound`] when the file does not
    /// exist and [`NoticeError::ConfigParseError`] when it cannot be read or
    /// is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(NoticeError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(NoticeError::ConfigParseError {
                    file: path.display().to_string(),
                    reason: e.to_string(),
                }
                .into());
            }
        };

        Self::parse(&content).map_err(|e| {
            NoticeError::ConfigParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Everything one run needs, fixed before the pipeline starts.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Repository root
    pub root: PathBuf,
    /// Manifests found under the root
    pub manifests: ManifestPaths,
    /// GitHub token sent to the REST API
    pub github_token: Option<String>,
    /// Document strings and dependency selection
    pub config: NoticeConfig,
    /// Ceiling on concurrently resolving dependencies
    pub max_parallel: usize,
    /// Remote service base URLs
    pub endpoints: Endpoints,
}

impl RunContext {
    /// Combine a configuration file with command line values.
    ///
    /// An empty token counts as no token. `max_parallel` falls back to
    /// [`default_max_parallel`] and is never below one.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeError::ConfigError`] for an invalid search pattern.
    pub fn from_config(
        config: NoticeConfig,
        root: impl Into<PathBuf>,
        github_token: Option<String>,
        max_parallel: Option<usize>,
    ) -> Result<Self> {
        let root = root.into();
        let manifests = ManifestPaths::discover(&root, &config.search)?;

        Ok(Self {
            root,
            manifests,
            github_token: github_token.filter(|t| !t.trim().is_empty()),
            config,
            max_parallel: max_parallel.unwrap_or_else(default_max_parallel).max(1),
            endpoints: Endpoints::default(),
        })
    }

    /// Replace the remote service base URLs.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Directory holding fragments of the previous document.
    pub fn notice_dir_path(&self) -> PathBuf {
        self.root.join(NOTICE_CACHE_DIR)
    }

    /// Directory holding fragments of the current run.
    pub fn notice_work_path(&self) -> PathBuf {
        self.root.join(NOTICE_WORK_DIR)
    }

    /// The consolidated document.
    pub fn notice_file_path(&self) -> PathBuf {
        self.root.join(NOTICE_FILE_NAME)
    }

    /// Header strings of the document.
    pub fn header(&self) -> NoticeHeader<'_> {
        NoticeHeader {
            title: &self.config.title,
            copyright: &self.config.copyright,
            description: &self.config.description,
        }
    }

    /// Selection options for `package.json` scanning.
    pub fn package_scan_options(&self) -> PackageScanOptions<'_> {
        PackageScanOptions {
            include_dev: self.config.include_dev_dependencies,
            additional: &self.config.additional_dependencies,
            ignored: &self.config.ignore_dependencies,
        }
    }

    /// Whether `dependency` is on the ignore list.
    pub fn is_ignored(&self, dependency: &Dependency) -> bool {
        self.config.ignore_dependencies.iter().any(|pattern| dependency.matches(pattern))
    }
}
