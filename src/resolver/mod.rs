//! Remote metadata resolution.
//!
//! Each ecosystem has its own way of turning a bare dependency name into
//! attribution metadata:
//!
//! | Ecosystem | Discovery | Metadata |
//! |-----------|-----------|----------|
//! | Go modules | [`vanity`] `?go-get=1` discovery | [`github`] repository API |
//! | npm | manifest key | [`registry`] package document |
//! | Pipfile | repository comment | [`github`] repository API |
//!
//! [`Resolver`] is the closed set of strategies, selected from a
//! dependency's [`Ecosystem`]. Independently of the strategy, [`license`]
//! probes GitHub's raw content mirror for the license text.
//!
//! All resolution is best effort: the caller logs a failure and keeps
//! whatever fields were already known.

pub mod github;
pub mod license;
pub mod registry;
pub mod vanity;

use crate::constants::{GITHUB_API_URL, GITHUB_RAW_URL, NPM_REGISTRY_URL};
use crate::core::{Dependency, Ecosystem, NoticeError};
use crate::http::HttpClient;

/// Base URLs of the remote services consulted during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// npm registry, e.g. `https://registry.npmjs.org`
    pub npm_registry: String,
    /// GitHub REST API, e.g. `https://api.github.com`
    pub github_api: String,
    /// GitHub raw content mirror, e.g. `https://raw.githubusercontent.com`
    pub github_raw: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            npm_registry: NPM_REGISTRY_URL.to_string(),
            github_api: GITHUB_API_URL.to_string(),
            github_raw: GITHUB_RAW_URL.to_string(),
        }
    }
}

/// Everything a resolver needs to talk to remote services.
#[derive(Debug)]
pub struct ResolverContext<'a, C> {
    /// HTTP client
    pub http: &'a C,
    /// Service base URLs
    pub endpoints: &'a Endpoints,
    /// GitHub token sent as a bearer credential
    pub github_token: Option<&'a str>,
}

impl<C> Clone for ResolverContext<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ResolverContext<'_, C> {}

/// Metadata resolution strategy for one ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolver {
    /// Fill metadata from the repository's GitHub project.
    GithubRepository,
    /// Fill metadata from the npm registry.
    NpmRegistry,
}

impl Resolver {
    /// The strategy used for dependencies of `ecosystem`.
    pub const fn for_ecosystem(ecosystem: Ecosystem) -> Self {
        match ecosystem {
            Ecosystem::GoModule | Ecosystem::Pipfile => Self::GithubRepository,
            Ecosystem::Npm => Self::NpmRegistry,
        }
    }

    /// Fill in `dependency`'s metadata from the strategy's remote service.
    ///
    /// # Errors
    ///
    /// Returns the HTTP or decode error of the primary lookup. Fields
    /// resolved before the failure are kept. A Go module without a
    /// discovered repository fails with [`NoticeError::GoImportNotFound`].
    pub async fn resolve<C: HttpClient>(
        self,
        dependency: &mut Dependency,
        ctx: ResolverContext<'_, C>,
    ) -> Result<(), NoticeError> {
        match self {
            Self::GithubRepository
                if dependency.ecosystem == Ecosystem::GoModule
                    && dependency.repository.url.is_empty() =>
            {
                Err(NoticeError::GoImportNotFound {
                    module: dependency.full_name.clone(),
                })
            }
            Self::GithubRepository => github::enrich(dependency, ctx).await,
            Self::NpmRegistry => registry::load(dependency, ctx).await,
        }
    }
}
