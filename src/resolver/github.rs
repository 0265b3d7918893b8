//! GitHub repository metadata.
//!
//! Dependencies whose repository lives on GitHub are enriched from the
//! repository and owner records of the REST API. A configured token is
//! sent as a bearer credential, which mostly matters for the API's rate
//! limit.

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::ResolverContext;
use crate::core::{Dependency, DependencyAuthor, NoticeError};
use crate::http::HttpClient;

#[derive(Debug, Default, Deserialize)]
struct RepositoryRecord {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    owner: Option<OwnerRecord>,
    #[serde(default)]
    license: Option<LicenseRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct OwnerRecord {
    #[serde(default)]
    login: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LicenseRecord {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UserRecord {
    #[serde(default)]
    name: Option<String>,
}

/// Owner and repository name of a GitHub repository URL.
///
/// Uses the last two path segments and strips a `.git` suffix. Returns
/// `None` for URLs that do not mention `github.com`.
pub fn owner_and_repo(url: &str) -> Option<(String, String)> {
    if !url.contains("github.com") {
        return None;
    }

    let segments: Vec<&str> = url.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., owner, repo] if !owner.contains("github.com") && !repo.contains("github.com") => {
            let repo = repo.strip_suffix(".git").unwrap_or(repo);
            Some(((*owner).to_string(), repo.to_string()))
        }
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn get_json<C: HttpClient, T: for<'de> Deserialize<'de>>(
    ctx: ResolverContext<'_, C>,
    url: &str,
) -> Result<T, NoticeError> {
    let body = ctx.http.get(url, ctx.github_token).await?;
    serde_json::from_str(&body).map_err(|e| NoticeError::HostDecodeError {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Fill `dependency` from its GitHub repository.
///
/// Description, homepage (falling back to the repository page), author
/// (profile name, falling back to the owner login) and license name are
/// overwritten when GitHub reports them. Dependencies without a GitHub
/// repository URL are left untouched.
///
/// # Errors
///
/// Returns the error of the repository request. A failed owner lookup is
/// logged and the login is used instead.
pub async fn enrich<C: HttpClient>(
    dependency: &mut Dependency,
    ctx: ResolverContext<'_, C>,
) -> Result<(), NoticeError> {
    let Some((owner, repo)) = owner_and_repo(&dependency.repository.url) else {
        debug!("{}: repository {:?} is not on GitHub", dependency.name, dependency.repository.url);
        return Ok(());
    };

    info!("Load {} information from GitHub ({}/{})", dependency.name, owner, repo);

    let api = ctx.endpoints.github_api.trim_end_matches('/');
    let record: RepositoryRecord = get_json(ctx, &format!("{api}/repos/{owner}/{repo}")).await?;

    if let Some(description) = non_empty(record.description) {
        dependency.description = description;
    }

    if let Some(login) = non_empty(record.owner.and_then(|o| o.login)) {
        let author_name = match get_json::<C, UserRecord>(ctx, &format!("{api}/users/{login}")).await
        {
            Ok(user) => non_empty(user.name).unwrap_or_else(|| login.clone()),
            Err(e) => {
                warn!("{}: owner lookup failed, using login: {}", dependency.name, e);
                login.clone()
            }
        };
        dependency.author = DependencyAuthor {
            name: author_name,
            email: String::new(),
        };
    }

    if let Some(homepage) = non_empty(record.homepage).or_else(|| non_empty(record.html_url)) {
        dependency.homepage = homepage;
    }

    if let Some(license) = non_empty(record.license.and_then(|l| l.name)) {
        dependency.license = license;
    }

    Ok(())
}
