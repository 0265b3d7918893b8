//! Integration test suite for noticegen
//!
//! End-to-end runs of the notice pipeline over temporary repositories, with
//! every remote service served by `MockHttpClient`, plus tests of the
//! compiled binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **npm_packages**: `package.json` scanning and registry resolution
//! - **go_modules**: `go.mod` scanning and vanity import discovery
//! - **notice_reuse**: reuse of an existing `NOTICE.txt` between runs
//! - **cli**: the `noticegen` binary

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod go_modules;
mod notice_reuse;
mod npm_packages;
