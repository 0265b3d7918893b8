//! Core types and error handling for noticegen
//!
//! - [`error`] - [`NoticeError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`dependency`] - the [`Dependency`] model and its [`Ecosystem`] tag

pub mod dependency;
pub mod error;

pub use dependency::{Dependency, DependencyAuthor, DependencyRepository, Ecosystem};
pub use error::{ErrorContext, NoticeError, user_friendly_error};
