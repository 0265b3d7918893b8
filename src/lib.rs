//! noticegen - NOTICE file generator
//!
//! noticegen writes the third-party attribution document (`NOTICE.txt`) of a
//! repository. It reads the repository's dependency manifests, looks up
//! author, description, homepage, license and license text of every
//! dependency, and merges the results into one document ordered by name.
//!
//! # Supported Manifests
//!
//! | Manifest | Dependencies | Metadata source |
//! |----------|--------------|-----------------|
//! | `go.mod` | direct `require` entries | vanity import discovery, then GitHub |
//! | `package.json` | `dependencies`, `devDependencies` | npm registry |
//! | `Pipfile` | `# repo: <GitHub URL>` comments | GitHub |
//!
//! # Reuse Between Runs
//!
//! Every dependency section of an existing `NOTICE.txt` is reused verbatim.
//! Only dependencies without a section are resolved over the network, so
//! hand edits survive regeneration and unchanged repositories regenerate
//! without any request. Deleting a section forces its dependency to be
//! resolved again.
//!
//! # Module Layout
//!
//! - [`cli`] - command-line interface
//! - [`config`] - YAML configuration and the per-run [`config::RunContext`]
//! - [`manifest`] - manifest discovery and parsing
//! - [`resolver`] - remote metadata and license lookups
//! - [`http`] - the [`http::HttpClient`] seam all lookups go through
//! - [`cache`] - fragment storage between runs
//! - [`notice`] - fragment rendering and document assembly
//! - [`pipeline`] - the end-to-end run
//! - [`core`] - dependency model and error types
//!
//! # Example
//!
//! ```rust,no_run
//! use noticegen::config::{NoticeConfig, RunContext};
//! use noticegen::http::ReqwestClient;
//! use noticegen::pipeline;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = NoticeConfig::load(Path::new("notice.yaml"))?;
//! let ctx = RunContext::from_config(config, "/path/to/repo", None, None)?;
//! let summary = pipeline::run(&ctx, &ReqwestClient::new()?).await?;
//! println!("{} notices written", summary.written);
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod pipeline;

// Dependency discovery and resolution
pub mod http;
pub mod manifest;
pub mod resolver;

// Output
pub mod notice;

// Supporting modules
pub mod constants;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
