//! End-to-end notice generation.
//!
//! [`run`] drives one repository through every stage:
//!
//! 1. **Split** - the previous `NOTICE.txt` is split into `.notice/`
//! 2. **Collect** - manifests are scanned and Go modules discovered
//! 3. **Filter** - ignored dependencies and file name collisions are dropped
//! 4. **Generate** - every dependency gets a fragment in `.notice-work/`,
//!    either carried over from `.notice/` or freshly resolved
//! 5. **Assemble** - fragments are joined into `NOTICE.txt`
//!
//! Generation runs one future per dependency, at most
//! [`RunContext::max_parallel`] at a time. Futures share no mutable state:
//! each owns its dependency and a unique fragment file name, and reports
//! its own [`GenerateOutcome`]. A failing dependency never stops the others.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::cache::NoticeCache;
use crate::config::RunContext;
use crate::core::{Dependency, Ecosystem};
use crate::http::HttpClient;
use crate::manifest::{self, go_language_dependency};
use crate::notice::{self, render_fragment};
use crate::resolver::{Resolver, ResolverContext, license, vanity};

/// How the fragment of one dependency came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Moved over from the previous document without any request
    Reused,
    /// Resolved and written
    Generated,
    /// Written after metadata resolution failed
    Degraded,
    /// No fragment could be written
    Failed,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Dependencies attributed after filtering
    pub dependencies: usize,
    /// Fragments carried over from the previous document
    pub reused: usize,
    /// Fragments freshly generated
    pub generated: usize,
    /// Fragments generated with incomplete metadata
    pub degraded: usize,
    /// Dependencies left without a fragment
    pub failed: usize,
    /// Fragments in the written document
    pub written: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: GenerateOutcome) {
        match outcome {
            GenerateOutcome::Reused => self.reused += 1,
            GenerateOutcome::Generated => self.generated += 1,
            GenerateOutcome::Degraded => self.degraded += 1,
            GenerateOutcome::Failed => self.failed += 1,
        }
    }
}

/// Gather every dependency the repository's manifests declare.
///
/// Go modules come first, preceded by the Go toolchain itself when any
/// `go.mod` is configured, then npm packages, then Pipfile repositories.
///
/// # Errors
///
/// Fails when a manifest cannot be read or parsed.
pub async fn collect_dependencies<C: HttpClient>(
    ctx: &RunContext,
    http: &C,
) -> Result<Vec<Dependency>> {
    let mut dependencies = Vec::new();

    if !ctx.manifests.go_modules.is_empty() {
        let requirements = manifest::scan_go_modules(&ctx.manifests.go_modules)?;
        info!("Discovering {} Go modules", requirements.len());
        dependencies.push(go_language_dependency());
        dependencies.extend(vanity::resolve_requirements(http, &requirements, ctx.max_parallel).await);
    }

    if !ctx.manifests.packages.is_empty() {
        let names =
            manifest::scan_package_manifests(&ctx.manifests.packages, ctx.package_scan_options())?;
        debug!("Found {} npm packages", names.len());
        dependencies.extend(names.into_iter().map(|name| Dependency::new(name, Ecosystem::Npm)));
    }

    if !ctx.manifests.pipfiles.is_empty() {
        dependencies.extend(manifest::scan_pipfiles(&ctx.manifests.pipfiles)?);
    }

    Ok(dependencies)
}

/// Drop ignored dependencies and keep the first of each fragment file name.
pub fn select_dependencies(ctx: &RunContext, dependencies: Vec<Dependency>) -> Vec<Dependency> {
    let mut owners: HashMap<String, String> = HashMap::new();
    let mut selected = Vec::with_capacity(dependencies.len());

    for dependency in dependencies {
        if ctx.is_ignored(&dependency) {
            info!("Ignoring {}", dependency.name);
            continue;
        }

        let file_name = dependency.fragment_file_name();
        if let Some(owner) = owners.get(&file_name) {
            if owner == &dependency.name {
                debug!("{} is declared more than once", dependency.name);
            } else {
                warn!(
                    "Dropping {}: its notice file {} is already used by {}",
                    dependency.name, file_name, owner
                );
            }
            continue;
        }

        owners.insert(file_name, dependency.name.clone());
        selected.push(dependency);
    }

    selected
}

/// Produce the fragment of one dependency in the working directory.
///
/// A fragment carried over from the previous document wins; no request is
/// made in that case. Otherwise the dependency is resolved, its license
/// text fetched and a fresh fragment written, even when resolution failed.
pub async fn generate<C: HttpClient>(
    mut dependency: Dependency,
    cache: &NoticeCache,
    resolver_ctx: ResolverContext<'_, C>,
) -> GenerateOutcome {
    let file_name = dependency.fragment_file_name();

    if cache.take(&file_name).await {
        info!("{}: using existing notice", dependency.name);
        return GenerateOutcome::Reused;
    }

    let resolved = match Resolver::for_ecosystem(dependency.ecosystem)
        .resolve(&mut dependency, resolver_ctx)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            warn!("{}: metadata resolution failed: {}", dependency.name, e);
            false
        }
    };

    let license_text = license::fetch_license_text(&dependency, resolver_ctx).await;
    let fragment = render_fragment(&dependency, &license_text);

    match cache.write_fragment(&file_name, &fragment).await {
        Ok(()) if resolved => GenerateOutcome::Generated,
        Ok(()) => GenerateOutcome::Degraded,
        Err(e) => {
            warn!("{}: {:#}", dependency.name, e);
            GenerateOutcome::Failed
        }
    }
}

/// Regenerate the repository's `NOTICE.txt`.
///
/// # Errors
///
/// Fails when a manifest cannot be read or parsed, when the cache or
/// working directory cannot be prepared, or when the document cannot be
/// written. Failures of individual dependencies are logged and counted in
/// the returned summary.
pub async fn run<C: HttpClient>(ctx: &RunContext, http: &C) -> Result<RunSummary> {
    let cache = NoticeCache::new(ctx.notice_dir_path(), ctx.notice_work_path());
    let notice_path = ctx.notice_file_path();

    info!("Processing repository {}", ctx.root.display());
    if ctx.manifests.is_empty() {
        warn!("No manifest configured; the notice will only contain the header");
    }

    cache.ensure_cache_dir().await?;
    match cache.split_existing(&notice_path).await {
        Ok(count) => debug!("Split {} sections out of {}", count, notice_path.display()),
        Err(e) => warn!("Error while splitting existing notice: {:#}", e),
    }

    let dependencies = select_dependencies(ctx, collect_dependencies(ctx, http).await?);
    cache.reset_work_dir().await?;

    let resolver_ctx = ResolverContext {
        http,
        endpoints: &ctx.endpoints,
        github_token: ctx.github_token.as_deref(),
    };

    let outcomes: Vec<GenerateOutcome> = stream::iter(dependencies.iter().cloned())
        .map(|dependency| generate(dependency, &cache, resolver_ctx))
        .buffer_unordered(ctx.max_parallel.max(1))
        .collect()
        .await;

    let mut summary = RunSummary {
        dependencies: dependencies.len(),
        ..RunSummary::default()
    };
    for outcome in outcomes {
        summary.record(outcome);
    }

    summary.written = notice::assemble(&ctx.header(), &dependencies, &cache, &notice_path).await?;

    info!(
        "Wrote {} notices to {} ({} reused, {} generated, {} incomplete, {} failed)",
        summary.written,
        notice_path.display(),
        summary.reused,
        summary.generated,
        summary.degraded,
        summary.failed
    );

    Ok(summary)
}
