//! npm registry lookups.
//!
//! The registry document of a package is loosely typed across the
//! ecosystem: `author` and `repository` are objects for most packages but
//! plain strings for some, and old packages still carry `license` as an
//! object. Decoding therefore happens in two steps. The body is first read
//! into [`RawPackage`], where every field is an untyped JSON value, and
//! then promoted field by field into [`RegistryPackage`]. A shape mismatch
//! in one field never fails the package; only invalid JSON does.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::ResolverContext;
use crate::core::{Dependency, DependencyAuthor, DependencyRepository, NoticeError};
use crate::http::HttpClient;

/// Registry document as received, before any field is interpreted.
#[derive(Debug, Default, Deserialize)]
pub struct RawPackage {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    description: Value,
    #[serde(default)]
    author: Value,
    #[serde(default)]
    license: Value,
    #[serde(default)]
    repository: Value,
    #[serde(default)]
    homepage: Value,
}

/// Attribution metadata decoded from a registry document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryPackage {
    /// Registry name
    pub name: String,
    /// Package description
    pub description: String,
    /// Author
    pub author: DependencyAuthor,
    /// License
    pub license: String,
    /// Source repository
    pub repository: DependencyRepository,
    /// Homepage
    pub homepage: String,
}

impl From<RawPackage> for RegistryPackage {
    fn from(raw: RawPackage) -> Self {
        Self {
            name: string_field(&raw.name),
            description: string_field(&raw.description),
            author: promote_author(&raw.author),
            license: promote_license(&raw.license),
            repository: promote_repository(&raw.repository),
            homepage: string_field(&raw.homepage),
        }
    }
}

fn string_field(value: &Value) -> String {
    value.as_str().map(str::to_string).unwrap_or_default()
}

fn promote_author(value: &Value) -> DependencyAuthor {
    match value {
        Value::String(name) => DependencyAuthor {
            name: name.clone(),
            email: String::new(),
        },
        Value::Object(fields) => DependencyAuthor {
            name: fields.get("name").map(string_field).unwrap_or_default(),
            email: fields.get("email").map(string_field).unwrap_or_default(),
        },
        _ => DependencyAuthor::default(),
    }
}

fn promote_repository(value: &Value) -> DependencyRepository {
    match value {
        Value::String(url) => DependencyRepository {
            kind: String::new(),
            url: url.clone(),
        },
        Value::Object(fields) => DependencyRepository {
            kind: fields.get("type").map(string_field).unwrap_or_default(),
            url: fields.get("url").map(string_field).unwrap_or_default(),
        },
        _ => DependencyRepository::default(),
    }
}

fn promote_license(value: &Value) -> String {
    match value {
        Value::String(license) => license.clone(),
        Value::Object(fields) => fields.get("type").map(string_field).unwrap_or_default(),
        _ => String::new(),
    }
}

/// Decode a registry document.
///
/// # Errors
///
/// Returns [`NoticeError::RegistryDecodeError`] when `body` is not a JSON
/// object.
pub fn decode_package(name: &str, body: &str) -> Result<RegistryPackage, NoticeError> {
    serde_json::from_str::<RawPackage>(body).map(RegistryPackage::from).map_err(|e| {
        NoticeError::RegistryDecodeError {
            name: name.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Registry URL of a package.
pub fn package_url(registry: &str, name: &str) -> String {
    format!("{}/{}", registry.trim_end_matches('/'), name)
}

/// Fill `dependency` from its npm registry document.
///
/// The declared name is kept; the registry's name becomes `full_name`.
/// Fields the registry leaves empty keep their previous value.
///
/// # Errors
///
/// Returns the HTTP error for a failed or non-2xx request and
/// [`NoticeError::RegistryDecodeError`] for an invalid document.
pub async fn load<C: HttpClient>(
    dependency: &mut Dependency,
    ctx: ResolverContext<'_, C>,
) -> Result<(), NoticeError> {
    info!("Load {} information by npm", dependency.name);

    let url = package_url(&ctx.endpoints.npm_registry, &dependency.name);
    let body = ctx.http.get(&url, None).await?;
    let package = decode_package(&dependency.name, &body)?;
    debug!("{}: registry reports license {:?}", dependency.name, package.license);

    merge(dependency, package);
    Ok(())
}

fn merge(dependency: &mut Dependency, package: RegistryPackage) {
    fn take(target: &mut String, value: String) {
        if !value.is_empty() {
            *target = value;
        }
    }

    take(&mut dependency.full_name, package.name);
    take(&mut dependency.description, package.description);
    take(&mut dependency.license, package.license);
    take(&mut dependency.homepage, package.homepage);
    if !package.author.name.is_empty() {
        dependency.author = package.author;
    }
    if !package.repository.url.is_empty() {
        dependency.repository = package.repository;
    }
}
