//! Test fixtures for manifests, configuration files and discovery pages.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A manifest file to drop into a test repository.
#[derive(Clone, Debug)]
pub struct ManifestFixture {
    /// File name relative to the repository root
    pub name: String,
    /// File content
    pub content: String,
}

impl ManifestFixture {
    /// `go.mod` with two direct requirements and one indirect one.
    pub fn go_mod() -> Self {
        Self {
            name: "go.mod".to_string(),
            content: r"
module example.com/service

go 1.22

require (
	github.com/pkg/errors v0.9.1
	gopkg.in/yaml.v3 v3.0.1
	golang.org/x/sys v0.20.0 // indirect
)
"
            .trim_start()
            .to_string(),
        }
    }

    /// `package.json` with runtime and development dependencies.
    pub fn package_json() -> Self {
        Self {
            name: "package.json".to_string(),
            content: r#"{
  "name": "web",
  "version": "1.0.0",
  "dependencies": {
    "left-pad": "^1.3.0",
    "react": "^18.2.0"
  },
  "devDependencies": {
    "jest": "^29.0.0"
  }
}
"#
            .to_string(),
        }
    }

    /// `Pipfile` with repository comments.
    pub fn pipfile() -> Self {
        Self {
            name: "Pipfile".to_string(),
            content: r#"[[source]]
url = "https://pypi.org/simple"

[packages]
# repo: https://github.com/psf/requests
requests = "*"
# Repository: https://github.com/pallets/flask
flask = "*"
"#
            .to_string(),
        }
    }

    /// Use a different file name, e.g. to place the manifest in a subdirectory.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Write the manifest below `dir`, creating parent directories.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// A YAML configuration file.
#[derive(Clone, Debug)]
pub struct ConfigFixture {
    /// File content
    pub content: String,
}

impl ConfigFixture {
    /// Configuration searching the given manifests.
    pub fn searching(search: &[&str]) -> Self {
        let mut content = String::from(
            "title: Example Notices\n\
             copyright: Copyright (c) Example Corp\n\
             description: Third-party software used by Example.\n",
        );
        if search.is_empty() {
            content.push_str("search: []\n");
        } else {
            content.push_str("search:\n");
            for entry in search {
                content.push_str(&format!("  - \"{entry}\"\n"));
            }
        }
        Self {
            content,
        }
    }

    /// Append raw YAML lines.
    #[must_use]
    pub fn with_yaml(mut self, yaml: &str) -> Self {
        self.content.push_str(yaml);
        if !yaml.ends_with('\n') {
            self.content.push('\n');
        }
        self
    }

    /// Write the configuration to `path`.
    pub fn write_to(&self, path: &Path) -> Result<PathBuf> {
        fs::write(path, &self.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}

/// HTML page answering a `?go-get=1` discovery request.
pub fn go_import_page(import_prefix: &str, vcs: &str, repo_root: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n\
         <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\"/>\n\
         <meta name=\"go-import\" content=\"{import_prefix} {vcs} {repo_root}\">\n\
         </head>\n<body>go get {import_prefix}</body>\n</html>\n"
    )
}
