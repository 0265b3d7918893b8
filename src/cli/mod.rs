//! Command-line interface for noticegen.
//!
//! noticegen has a single operation, so the interface is a flat set of
//! options rather than subcommands:
//!
//! ```bash
//! # Regenerate NOTICE.txt in the current repository
//! noticegen --config notice.yaml
//!
//! # Another repository, with a GitHub token for the REST API rate limit
//! noticegen -p ../service -t "$TOKEN" -c ../service/.github/notice.yaml
//!
//! # Fewer parallel requests and debug logging
//! noticegen -c notice.yaml --max-parallel 4 --verbose
//! ```
//!
//! The token may also come from `GITHUB_TOKEN`. `RUST_LOG` overrides the
//! log level chosen by `--verbose`/`--quiet`.


use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{NoticeConfig, RunContext};
use crate::http::ReqwestClient;
use crate::pipeline;

/// Process-wide settings derived from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter, used when `RUST_LOG` is unset
    pub log_level: String,
}

impl CliConfig {
    /// Install the global tracing subscriber.
    ///
    /// Log lines go to stderr. Calling this more than once keeps the first
    /// subscriber.
    pub fn init_logging(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Generate a NOTICE.txt for a repository's third-party dependencies.
#[derive(Parser, Debug)]
#[command(
    name = "noticegen",
    about = "Generate a NOTICE file from a repository's dependency manifests",
    version,
    long_about = "noticegen scans go.mod, package.json and Pipfile manifests, resolves \
                  author, license and homepage of every dependency, and writes them to \
                  NOTICE.txt. Sections of an existing NOTICE.txt are reused as-is."
)]
pub struct Cli {
    /// Repository root
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// GitHub token used for API requests
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Maximum number of dependencies resolved at the same time
    /// (default: max(10, 2 × CPU cores))
    #[arg(long, value_parser = clap::value_parser!(usize))]
    max_parallel: Option<usize>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Run noticegen with the parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns configuration, manifest and output errors; see
    /// [`pipeline::run`].
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();

        let ctx = self.run_context()?;
        let http = ReqwestClient::new()?.with_github_api(ctx.endpoints.github_api.clone());
        let summary = pipeline::run(&ctx, &http).await?;
        debug!("{:?}", summary);
        Ok(())
    }

    /// Process-wide settings for these arguments.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
        }
    }

    /// Load the configuration file and resolve the repository root.
    ///
    /// # Errors
    ///
    /// Fails when the configuration cannot be loaded or the repository root
    /// does not exist.
    pub fn run_context(&self) -> Result<RunContext> {
        let config = NoticeConfig::load(&self.config)?;
        let root = std::fs::canonicalize(&self.path)
            .with_context(|| format!("Repository path {} does not exist", self.path.display()))?;

        RunContext::from_config(config, root, self.token.clone(), self.max_parallel)
    }
}
