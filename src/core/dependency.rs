//! Dependency model shared by scanners, resolvers and the notice writer.

use std::fmt;

/// Ecosystem a dependency was discovered in.
///
/// The tag selects which resolver fills in the dependency's metadata
/// (see [`crate::resolver::Resolver::for_ecosystem`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    /// Go modules declared in `go.mod`.
    GoModule,
    /// npm packages declared in `package.json`.
    Npm,
    /// GitHub repositories named in `Pipfile` comments.
    Pipfile,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoModule => write!(f, "go-module"),
            Self::Npm => write!(f, "npm"),
            Self::Pipfile => write!(f, "pipfile"),
        }
    }
}

/// Author of a dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyAuthor {
    /// Display name
    pub name: String,
    /// Contact email, when the registry reports one
    pub email: String,
}

/// Source repository of a dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyRepository {
    /// VCS or transport kind (`git`, `https`, ...)
    pub kind: String,
    /// Repository URL as reported upstream
    pub url: String,
}

/// A third-party dependency and the attribution metadata resolved for it.
///
/// Empty strings mean "unknown"; the notice writer omits unknown fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Externally visible name, also the key of its notice fragment
    pub name: String,
    /// Fully qualified identifier (import prefix, registry name, owner/repo)
    pub full_name: String,
    /// One-paragraph description
    pub description: String,
    /// Author
    pub author: DependencyAuthor,
    /// License name or SPDX identifier
    pub license: String,
    /// Source repository
    pub repository: DependencyRepository,
    /// Project homepage
    pub homepage: String,
    /// Ecosystem the dependency was declared in
    pub ecosystem: Ecosystem,
}

impl Dependency {
    /// Create a dependency that only carries its name.
    pub fn new(name: impl Into<String>, ecosystem: Ecosystem) -> Self {
        Self {
            name: name.into(),
            full_name: String::new(),
            description: String::new(),
            author: DependencyAuthor::default(),
            license: String::new(),
            repository: DependencyRepository::default(),
            homepage: String::new(),
            ecosystem,
        }
    }

    /// Set the repository.
    #[must_use]
    pub fn with_repository(mut self, kind: impl Into<String>, url: impl Into<String>) -> Self {
        self.repository = DependencyRepository {
            kind: kind.into(),
            url: url.into(),
        };
        self
    }

    /// Set the fully qualified name.
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Name of this dependency's notice fragment file.
    pub fn fragment_file_name(&self) -> String {
        crate::cache::sanitize_file_name(&self.name)
    }

    /// Whether `pattern` names this dependency, by name or full name.
    pub fn matches(&self, pattern: &str) -> bool {
        self.name == pattern || (!self.full_name.is_empty() && self.full_name == pattern)
    }
}
