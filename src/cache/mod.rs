//! Per-dependency notice fragment cache
//!
//! A run never re-resolves a dependency whose notice already appears in the
//! previous `NOTICE.txt`. Instead the previous document is split into one
//! fragment file per dependency, and each fragment is carried forward into
//! the current run by renaming it.
//!
//! # Directory Structure
//!
//! ```text
//! <repository>/
//! ├── NOTICE.txt          # consolidated document (input of the split, output of the run)
//! ├── .notice/            # fragments split from the previous NOTICE.txt
//! │   ├── Go
//! │   └── go-yaml-yaml
//! └── .notice-work/       # fragments of the current run, one per dependency
//!     ├── Go
//!     └── left-pad
//! ```
//!
//! # Document Grammar
//!
//! A line starting with `## ` opens the section of the dependency named by
//! the rest of the line. A line starting with `---` closes it. Lines in
//! between, the heading included, form the fragment. Lines outside any
//! section (the document header) are not cached.
//!
//! Fragment files are named with [`sanitize_file_name`].
//!
//! # Concurrency
//!
//! All file access goes through `tokio::fs`. Every dependency owns exactly
//! one file name in each directory, so the per-dependency operations ([`NoticeCache::take`],
//! [`NoticeCache::write_fragment`], [`NoticeCache::read_fragment`]) run
//! concurrently without locking.

use anyhow::{Context, Result};
use regex::Regex;
use std::io::{BufRead, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;
use tracing::{debug, info};

use crate::constants::{SECTION_HEADING, SECTION_SEPARATOR};
use crate::core::NoticeError;

static NON_ALPHANUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^A-Za-z0-9]+").expect("sanitizer pattern is valid"));

/// File name of the fragment for a dependency name.
///
/// Every maximal run of characters outside `[A-Za-z0-9]` becomes a single
/// `-`, so the result never contains `--`.
///
/// ```rust
/// use noticegen::cache::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("gopkg.in/yaml.v3"), "gopkg-in-yaml-v3");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    NON_ALPHANUMERIC_RUN.replace_all(name, "-").into_owned()
}

/// Split a consolidated notice document into `(name, fragment)` pairs.
///
/// Each fragment holds the section's lines verbatim, heading included, each
/// terminated by `\n`.
pub fn split_sections(reader: impl BufRead) -> std::io::Result<Vec<(String, String)>> {
    let mut sections = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in reader.lines() {
        let line = line?;

        if let Some(name) = line.strip_prefix(SECTION_HEADING) {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some((name.to_string(), String::new()));
        }

        if line.starts_with(SECTION_SEPARATOR) {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            continue;
        }

        if let Some((_, text)) = current.as_mut() {
            text.push_str(&line);
            text.push('\n');
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }

    Ok(sections)
}

/// Fragment storage of one repository.
#[derive(Debug, Clone)]
pub struct NoticeCache {
    cache_dir: PathBuf,
    work_dir: PathBuf,
}

impl NoticeCache {
    /// Cache over the given directories. Nothing is created yet.
    pub fn new(cache_dir: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Directory holding fragments of the previous document.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Directory holding fragments of the current run.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Create the cache directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeError::DirectoryError`] when the directory cannot be
    /// created.
    pub async fn ensure_cache_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).await.map_err(|e| {
            anyhow::Error::from(e).context(NoticeError::DirectoryError {
                operation: "create".to_string(),
                path: self.cache_dir.display().to_string(),
            })
        })
    }

    /// Remove any leftover working directory and create an empty one.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeError::DirectoryError`] when the directory cannot be
    /// cleared or created.
    pub async fn reset_work_dir(&self) -> Result<()> {
        match fs::remove_dir_all(&self.work_dir).await {
            Ok(()) => debug!("Removed stale {}", self.work_dir.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(anyhow::Error::from(e).context(NoticeError::DirectoryError {
                    operation: "clear".to_string(),
                    path: self.work_dir.display().to_string(),
                }));
            }
        }

        fs::create_dir_all(&self.work_dir).await.map_err(|e| {
            anyhow::Error::from(e).context(NoticeError::DirectoryError {
                operation: "create".to_string(),
                path: self.work_dir.display().to_string(),
            })
        })
    }

    /// Split the previous document at `notice_path` into the cache directory.
    ///
    /// Returns the number of fragments written; a missing document yields
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be read or a fragment
    /// cannot be written.
    pub async fn split_existing(&self, notice_path: &Path) -> Result<usize> {
        let document = match fs::read(notice_path).await {
            Ok(document) => document,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No existing {} to split", notice_path.display());
                return Ok(0);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", notice_path.display()));
            }
        };

        let sections = split_sections(document.as_slice())
            .with_context(|| format!("Failed to read {}", notice_path.display()))?;

        for (name, text) in &sections {
            info!("Found {} in existing notice", name);
            let path = self.cache_dir.join(sanitize_file_name(name));
            fs::write(&path, text)
                .await
                .with_context(|| format!("Failed to write cached fragment {}", path.display()))?;
        }

        Ok(sections.len())
    }

    /// Move a cached fragment into the working directory.
    ///
    /// Returns `true` when the fragment existed and now belongs to the
    /// current run.
    pub async fn take(&self, file_name: &str) -> bool {
        let from = self.cache_dir.join(file_name);
        let to = self.work_dir.join(file_name);
        match fs::rename(&from, &to).await {
            Ok(()) => true,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!("Cannot reuse {}: {}", from.display(), e);
                }
                false
            }
        }
    }

    /// Write a freshly generated fragment into the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub async fn write_fragment(&self, file_name: &str, text: &str) -> Result<()> {
        let path = self.work_dir.join(file_name);
        fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write fragment {}", path.display()))
    }

    /// Read a fragment of the current run.
    ///
    /// Returns `None` when the fragment does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than a missing file.
    pub async fn read_fragment(&self, file_name: &str) -> Result<Option<String>> {
        let path = self.work_dir.join(file_name);
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read fragment {}", path.display())),
        }
    }
}
