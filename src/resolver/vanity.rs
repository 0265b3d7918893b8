//! Go vanity import discovery.
//!
//! A Go module path does not have to name its repository host. The
//! repository is discovered by fetching `https://<path>?go-get=1` and
//! reading the `go-import` meta tag:
//!
//! ```html
//! <meta name="go-import" content="gopkg.in/yaml.v3 git https://gopkg.in/yaml.v3">
//! ```
//!
//! Some hosts emit the attributes the other way round, so both orders are
//! accepted. When the full module path yields nothing and it is longer
//! than `host/owner/repo`, discovery is retried on that module root.

use futures::stream::{self, StreamExt};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::constants::{GO_GOOGLESOURCE_PREFIX, GO_MODULE_ROOT_SEGMENTS, GOPKG_IN_PREFIX};
use crate::core::{Dependency, Ecosystem, NoticeError};
use crate::http::HttpClient;
use crate::manifest::GoRequirement;

static GO_IMPORT_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(
            r#"(?i)<\s*meta\s*name\s*=\s*"go-import"\s*content\s*=\s*"(?P<import_prefix>\S+)\s+(?P<vcs>\S+)\s+(?P<repo_root>\S+)"\s*/?>"#,
        )
        .expect("go-import pattern is valid"),
        Regex::new(
            r#"(?i)<\s*meta\s*content\s*=\s*"(?P<import_prefix>\S+)\s+(?P<vcs>\S+)\s+(?P<repo_root>\S+)"\s*name\s*=\s*"go-import"\s*/?>"#,
        )
        .expect("go-import pattern is valid"),
    ]
});

/// Content of a `go-import` meta tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoImport {
    /// Import path prefix the repository serves
    pub import_prefix: String,
    /// Version control system, usually `git`
    pub vcs: String,
    /// Repository URL
    pub repo_root: String,
}

/// Extract the first `go-import` tag from an HTML page.
pub fn parse_go_import(html: &str) -> Option<GoImport> {
    GO_IMPORT_PATTERNS.iter().find_map(|pattern| {
        pattern.captures(html).map(|caps| GoImport {
            import_prefix: caps["import_prefix"].to_string(),
            vcs: caps["vcs"].to_string(),
            repo_root: caps["repo_root"].to_string(),
        })
    })
}

/// Discovery URL for a module path.
pub fn discovery_url(module_path: &str) -> String {
    format!("https://{module_path}?go-get=1")
}

/// The `host/owner/repo` root of a longer module path.
pub fn module_root(module_path: &str) -> Option<String> {
    let parts: Vec<&str> = module_path.split('/').collect();
    (parts.len() > GO_MODULE_ROOT_SEGMENTS)
        .then(|| parts[..GO_MODULE_ROOT_SEGMENTS].join("/"))
}

async fn fetch_go_import<C: HttpClient>(http: &C, module_path: &str) -> Option<GoImport> {
    let url = discovery_url(module_path);
    match http.get(&url, None).await {
        Ok(body) => {
            let found = parse_go_import(&body);
            if found.is_none() {
                debug!("No go-import meta tag at {}", url);
            }
            found
        }
        Err(e) => {
            debug!("Discovery request failed: {}", e);
            None
        }
    }
}

/// Discover the repository serving `module_path`.
///
/// # Errors
///
/// Returns [`NoticeError::GoImportNotFound`] when neither the module path
/// nor its module root yields a `go-import` tag.
pub async fn discover<C: HttpClient>(http: &C, module_path: &str) -> Result<GoImport, NoticeError> {
    if let Some(found) = fetch_go_import(http, module_path).await {
        return Ok(found);
    }

    if let Some(root) = module_root(module_path) {
        debug!("Retrying discovery of {} at module root {}", module_path, root);
        if let Some(found) = fetch_go_import(http, &root).await {
            return Ok(found);
        }
    }

    Err(NoticeError::GoImportNotFound {
        module: module_path.to_string(),
    })
}

/// Display name of a module path: its last two segments.
fn display_name(module_path: &str) -> String {
    let segments: Vec<&str> = module_path.split('/').collect();
    match segments.as_slice() {
        [.., owner, repo] => format!("{owner}/{repo}"),
        _ => module_path.to_string(),
    }
}

/// Build the dependency described by a discovered `go-import` tag.
///
/// The display name is the last two segments of the import prefix. The
/// repository is canonicalized to GitHub for `go.googlesource.com` roots
/// and for `gopkg.in` versioned imports.
pub fn dependency_from_import(go_import: GoImport) -> Dependency {
    let GoImport {
        import_prefix,
        vcs,
        mut repo_root,
    } = go_import;

    let mut name = display_name(&import_prefix);

    if repo_root.starts_with(GO_GOOGLESOURCE_PREFIX) {
        let repo = repo_root.rsplit('/').next().unwrap_or_default().to_string();
        repo_root = format!("https://github.com/golang/{repo}");
    } else if name.starts_with(GOPKG_IN_PREFIX) {
        let package = name.split('/').nth(1).unwrap_or_default();
        let root = package.split('.').next().unwrap_or_default();
        name = format!("go-{root}/{root}");
        repo_root = format!("https://github.com/{name}");
    }

    Dependency::new(name, Ecosystem::GoModule)
        .with_full_name(import_prefix)
        .with_repository(vcs, repo_root)
}

/// Dependency of a module whose repository could not be discovered.
///
/// It keeps the module path as full name and has no repository, so it is
/// attributed with a bare fragment.
pub fn unresolved_dependency(module_path: &str) -> Dependency {
    Dependency::new(display_name(module_path), Ecosystem::GoModule).with_full_name(module_path)
}

/// Resolve every requirement concurrently, at most `max_parallel` at a time.
///
/// Requirements that cannot be discovered are logged and kept as
/// [`unresolved_dependency`]. The result preserves requirement order.
pub async fn resolve_requirements<C: HttpClient>(
    http: &C,
    requirements: &[GoRequirement],
    max_parallel: usize,
) -> Vec<Dependency> {
    stream::iter(requirements)
        .map(|requirement| async move {
            match discover(http, &requirement.path).await {
                Ok(go_import) => {
                    let dependency = dependency_from_import(go_import);
                    debug!("{} resolved to {}", requirement.path, dependency.repository.url);
                    dependency
                }
                Err(e) => {
                    warn!("{}", e);
                    unresolved_dependency(&requirement.path)
                }
            }
        })
        .buffered(max_parallel.max(1))
        .collect()
        .await
}
