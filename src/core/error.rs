//! Error handling for noticegen
//!
//! This module provides the typed error enum used across the crate and the
//! user-facing error reporting used by the binary. The error system follows
//! two principles:
//! 1. **Strongly-typed errors** for the failure modes callers branch on
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`NoticeError`] - Enumerated error types for every failure case
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion
//!
//! Library code returns `anyhow::Result` and attaches context with
//! `.context(..)`; the binary converts whatever reaches `main` with
//! [`user_friendly_error`] and prints it with [`ErrorContext::display`].
//!
//! # Fatal versus per-dependency errors
//!
//! Only configuration, manifest, and directory/document I/O errors abort a
//! run. Network and decode errors ([`NoticeError::HttpStatus`],
//! [`NoticeError::NetworkError`], [`NoticeError::RegistryDecodeError`],
//! [`NoticeError::GoImportNotFound`]) are raised per dependency, logged by
//! the pipeline, and never reach `main`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use noticegen::core::{NoticeError, user_friendly_error};
//!
//! let error = anyhow::Error::from(NoticeError::ConfigFileNotFound {
//!     path: "notice.yaml".to_string(),
//! });
//! let ctx = user_friendly_error(error);
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for noticegen operations.
///
/// Each variant carries enough context (file paths, URLs, dependency names)
/// to produce a useful message without consulting the error chain.
///
/// ## Configuration and manifests
/// - [`ConfigFileNotFound`](Self::ConfigFileNotFound), [`ConfigParseError`](Self::ConfigParseError),
///   [`ConfigError`](Self::ConfigError)
/// - [`ManifestReadError`](Self::ManifestReadError), [`ManifestParseError`](Self::ManifestParseError)
///
/// ## Remote resolution
/// - [`HttpStatus`](Self::HttpStatus), [`NetworkError`](Self::NetworkError)
/// - [`RegistryDecodeError`](Self::RegistryDecodeError), [`HostDecodeError`](Self::HostDecodeError),
///   [`GoImportNotFound`](Self::GoImportNotFound)
///
/// ## File system
/// - [`DirectoryError`](Self::DirectoryError), [`NoticeWriteError`](Self::NoticeWriteError)
#[derive(Error, Debug, Clone)]
pub enum NoticeError {
    /// Configuration file does not exist or cannot be read.
    #[error("Configuration file not found: {path}")]
    ConfigFileNotFound {
        /// Path that was looked up
        path: String,
    },

    /// Configuration file is not valid YAML for the expected shape.
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParseError {
        /// Configuration file path
        file: String,
        /// Parser message
        reason: String,
    },

    /// Configuration values are inconsistent or unusable.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// A declared manifest could not be read.
    #[error("Failed to read manifest {file}")]
    ManifestReadError {
        /// Manifest path
        file: String,
        /// Underlying I/O message
        reason: String,
    },

    /// A declared manifest does not parse.
    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError {
        /// Manifest path
        file: String,
        /// Parser message
        reason: String,
    },

    /// A remote endpoint answered with a non-success status.
    #[error("HTTP status {status} when downloading {url}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// A request could not be sent or its body not read.
    #[error("Network error while requesting {url}: {reason}")]
    NetworkError {
        /// Requested URL
        url: String,
        /// Transport message
        reason: String,
    },

    /// The registry document for a package is not valid JSON.
    #[error("Failed to decode registry metadata for '{name}': {reason}")]
    RegistryDecodeError {
        /// Package name
        name: String,
        /// Decoder message
        reason: String,
    },

    /// A hosting platform API response does not have the expected shape.
    #[error("Failed to decode response from {url}: {reason}")]
    HostDecodeError {
        /// Requested URL
        url: String,
        /// Decoder message
        reason: String,
    },

    /// No `go-import` meta tag could be discovered for a module path.
    #[error("Unrecognised import {module:?} (no go-import meta tags)")]
    GoImportNotFound {
        /// Module path from go.mod
        module: String,
    },

    /// A work or cache directory could not be prepared.
    #[error("Failed to {operation} directory: {path}")]
    DirectoryError {
        /// Operation that failed (e.g. "create", "clear")
        operation: String,
        /// Directory path
        path: String,
    },

    /// The consolidated notice document could not be written.
    #[error("Failed to write notice file {path}")]
    NoticeWriteError {
        /// Document path
        path: String,
        /// Underlying I/O message
        reason: String,
    },

    /// Any other error, carrying the rendered error chain.
    #[error("{message}")]
    Other {
        /// Rendered message
        message: String,
    },
}

/// An error enriched with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: NoticeError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Additional explanation
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error without details or suggestion.
    #[must_use]
    pub const fn new(error: NoticeError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colours.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for display.
///
/// Known [`NoticeError`] variants anywhere in the chain get tailored
/// suggestions. I/O and YAML errors are mapped to the closest variant.
/// Everything else is reported as [`NoticeError::Other`] with the full
/// chain rendered into the message.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(notice_error) = error.downcast_ref::<NoticeError>() {
        let mut ctx = create_error_context(notice_error.clone());
        if ctx.details.is_none() {
            let chain = render_chain(&error);
            if !chain.is_empty() {
                ctx = ctx.with_details(chain);
            }
        }
        return ctx;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(NoticeError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check file ownership and permissions of the repository directory")
                .with_details("noticegen writes NOTICE.txt, .notice/ and .notice-work/ at the repository root");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(NoticeError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(yaml_error) = error.downcast_ref::<serde_yaml::Error>() {
        return ErrorContext::new(NoticeError::ConfigParseError {
            file: "configuration".to_string(),
            reason: yaml_error.to_string(),
        })
        .with_suggestion("Check the YAML syntax of the configuration file");
    }

    let mut message = error.to_string();
    let chain = render_chain(&error);
    if !chain.is_empty() {
        message.push_str("\n\n");
        message.push_str(&chain);
    }

    ErrorContext::new(NoticeError::Other {
        message,
    })
}

fn render_chain(error: &anyhow::Error) -> String {
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if chain.is_empty() {
        return String::new();
    }

    let mut message = String::from("Caused by:");
    for (i, cause) in chain.iter().enumerate() {
        message.push_str(&format!("\n  {}: {}", i + 1, cause));
    }
    message
}

fn create_error_context(error: NoticeError) -> ErrorContext {
    match &error {
        NoticeError::ConfigFileNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass an existing YAML file with -c/--config"),

        NoticeError::ConfigParseError {
            reason, ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the YAML syntax. Supported keys: title, copyright, description, reviewers, search, includeDevDependencies, additionalDependencies, ignoreDependencies")
                .with_details(details)
        }

        NoticeError::ManifestReadError {
            reason, ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the 'search' entries in the configuration file; they are resolved relative to the repository path")
                .with_details(details)
        }

        NoticeError::ManifestParseError {
            reason, ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Fix the manifest syntax; noticegen does not process partially valid manifests")
                .with_details(details)
        }

        NoticeError::DirectoryError {
            ..
        }
        | NoticeError::NoticeWriteError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the repository directory is writable"),

        NoticeError::HttpStatus {
            status, ..
        } if *status == 403 || *status == 429 => ErrorContext::new(error)
            .with_suggestion("The remote service is rate limiting requests. Pass a GitHub token with -t or lower --max-parallel"),

        _ => ErrorContext::new(error),
    }
}
