//! License text lookup on GitHub's raw content mirror.

use tracing::{debug, info};

use super::ResolverContext;
use crate::constants::LICENSE_FILE_CANDIDATES;
use crate::core::Dependency;
use crate::http::HttpClient;

/// `owner/repo` of the GitHub project a URL points into.
///
/// The URL is split on `/`, `#` and `.`; the two tokens following a
/// `github`, `com` pair name the project. This accepts web URLs with
/// fragments (`.../repo#readme`), `git+https` URLs and `.git` suffixes.
pub fn github_slug(url: &str) -> Option<String> {
    let parts: Vec<&str> = url.split(['/', '#', '.']).filter(|p| !p.is_empty()).collect();

    parts.windows(4).find_map(|window| match window {
        ["github", "com", owner, repo] => Some(format!("{owner}/{repo}")),
        _ => None,
    })
}

/// URL the license of a dependency is looked up from: its homepage when
/// that is on GitHub, otherwise its repository.
fn license_source(dependency: &Dependency) -> Option<&str> {
    if dependency.homepage.contains("github.com") {
        Some(&dependency.homepage)
    } else if !dependency.repository.url.is_empty() {
        Some(&dependency.repository.url)
    } else {
        None
    }
}

/// Fetch the license text of `dependency`.
///
/// Probes `LICENSE.txt`, `LICENSE.md` and `LICENSE` on the default branch
/// and returns the first that exists. Returns an empty string when the
/// project cannot be located or no candidate exists.
pub async fn fetch_license_text<C: HttpClient>(
    dependency: &Dependency,
    ctx: ResolverContext<'_, C>,
) -> String {
    let Some(slug) = license_source(dependency).and_then(github_slug) else {
        debug!("{}: no GitHub project to fetch a license from", dependency.name);
        return String::new();
    };

    let raw = ctx.endpoints.github_raw.trim_end_matches('/');
    for file in LICENSE_FILE_CANDIDATES {
        let url = format!("{raw}/{slug}/HEAD/{file}");
        match ctx.http.get(&url, None).await {
            Ok(text) => {
                info!("{}: using license text from {}", dependency.name, url);
                return text;
            }
            Err(e) => debug!("{}: {}", dependency.name, e),
        }
    }

    info!("{}: no license file found for {}", dependency.name, slug);
    String::new()
}
