//! Manifest discovery and scanning.
//!
//! A repository declares its dependencies in one or more ecosystem
//! manifests. This module finds them ([`ManifestPaths::discover`]) and
//! turns them into raw dependency identifiers:
//!
//! - [`scan_go_modules`] - direct `require` entries of `go.mod` files
//! - [`scan_package_manifests`] - `dependencies` and `devDependencies` keys
//!   of `package.json` files, adjusted by the configured additional and
//!   ignored names
//! - [`scan_pipfiles`] - GitHub repository comments in `Pipfile`s
//!
//! Every scanner is all-or-nothing: an unreadable or unparsable manifest
//! fails the whole scan with [`NoticeError::ManifestReadError`] or
//! [`NoticeError::ManifestParseError`].

pub mod go_mod;
pub mod package_json;
pub mod pipfile;

use anyhow::Result;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::{Dependency, Ecosystem, NoticeError};

pub use go_mod::{GoModFile, GoRequirement};
pub use package_json::PackageJson;

/// Manifest files of a repository, grouped by ecosystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestPaths {
    /// `go.mod` files
    pub go_modules: Vec<PathBuf>,
    /// `package.json` files
    pub packages: Vec<PathBuf>,
    /// `Pipfile`s
    pub pipfiles: Vec<PathBuf>,
}

impl ManifestPaths {
    /// Resolve configured search entries against the repository root.
    ///
    /// An entry is classified by the manifest name it mentions. Entries
    /// containing `*` are glob patterns (`**` included); a pattern with no
    /// match is logged and skipped. Entries naming no known manifest are
    /// ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeError::ConfigError`] for an invalid glob pattern.
    pub fn discover(root: &Path, search: &[String]) -> Result<Self> {
        let mut paths = Self::default();

        for entry in search {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let bucket = if entry.contains("package.json") {
                &mut paths.packages
            } else if entry.contains("go.mod") {
                &mut paths.go_modules
            } else if entry.contains("Pipfile") {
                &mut paths.pipfiles
            } else {
                warn!("Ignoring search entry {:?}: no known manifest name", entry);
                continue;
            };

            let candidate = root.join(entry);
            if entry.contains('*') {
                let matches = expand_glob(&candidate)?;
                if matches.is_empty() {
                    warn!("Failed to find any manifest for {}", entry);
                }
                bucket.extend(matches);
            } else {
                bucket.push(candidate);
            }
        }

        Ok(paths)
    }

    /// Whether no manifest was found at all.
    pub fn is_empty(&self) -> bool {
        self.go_modules.is_empty() && self.packages.is_empty() && self.pipfiles.is_empty()
    }
}

fn expand_glob(pattern: &Path) -> Result<Vec<PathBuf>> {
    let pattern = pattern.to_string_lossy();
    let entries = glob::glob(&pattern).map_err(|e| NoticeError::ConfigError {
        message: format!("invalid search pattern {pattern:?}: {e}"),
    })?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable path while expanding {}: {}", pattern, e);
                None
            }
        })
        .collect();
    matches.sort();
    Ok(matches)
}

fn read_manifest(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        NoticeError::ManifestReadError {
            file: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// The synthetic dependency standing for the Go toolchain itself.
pub fn go_language_dependency() -> Dependency {
    let mut dep = Dependency::new("Go", Ecosystem::GoModule)
        .with_full_name("github.com/golang/go")
        .with_repository("git", "github.com/golang/go");
    dep.homepage = "https://go.dev/".to_string();
    dep.description = "The Go programming language".to_string();
    dep.author.name = "The Go authors".to_string();
    dep.license = "BSD-style".to_string();
    dep
}

/// Direct requirements of every `go.mod`, in file order, without duplicates.
///
/// # Errors
///
/// Fails on the first manifest that cannot be read or parsed.
pub fn scan_go_modules(paths: &[PathBuf]) -> Result<Vec<GoRequirement>> {
    let mut seen = BTreeSet::new();
    let mut requirements = Vec::new();

    for path in paths {
        let content = read_manifest(path)?;
        let file = go_mod::parse(&content).map_err(|reason| NoticeError::ManifestParseError {
            file: path.display().to_string(),
            reason,
        })?;

        debug!(
            "{}: {} requirements ({} direct)",
            path.display(),
            file.requirements.len(),
            file.direct_requirements().count()
        );

        for requirement in file.direct_requirements() {
            if seen.insert(requirement.path.clone()) {
                requirements.push(requirement.clone());
            }
        }
    }

    Ok(requirements)
}

/// Options applied on top of the names declared in `package.json` files.
#[derive(Debug, Clone, Copy)]
pub struct PackageScanOptions<'a> {
    /// Whether `devDependencies` count
    pub include_dev: bool,
    /// Names added even if no manifest declares them
    pub additional: &'a [String],
    /// Names removed from the result; wins over `additional`
    pub ignored: &'a [String],
}

/// Package names declared across every `package.json`, sorted and unique.
///
/// # Errors
///
/// Fails on the first manifest that cannot be read or parsed.
pub fn scan_package_manifests(
    paths: &[PathBuf],
    options: PackageScanOptions<'_>,
) -> Result<Vec<String>> {
    let mut names = BTreeSet::new();

    for path in paths {
        let content = read_manifest(path)?;
        let manifest =
            PackageJson::parse(&content).map_err(|e| NoticeError::ManifestParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;
        names.extend(manifest.dependency_names(options.include_dev));
    }

    names.extend(options.additional.iter().cloned());
    for ignored in options.ignored {
        if names.remove(ignored) {
            debug!("Ignoring dependency {}", ignored);
        }
    }

    Ok(names.into_iter().collect())
}

/// Dependencies named by repository comments across every `Pipfile`.
///
/// # Errors
///
/// Fails on the first `Pipfile` that cannot be read.
pub fn scan_pipfiles(paths: &[PathBuf]) -> Result<Vec<Dependency>> {
    let mut dependencies = Vec::new();
    for path in paths {
        let content = read_manifest(path)?;
        dependencies.extend(pipfile::parse(&content));
    }
    Ok(dependencies)
}
