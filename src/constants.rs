//! Global constants used throughout the noticegen codebase.
//!
//! This module contains file names, remote endpoints, timeouts and
//! parallelism parameters that are shared across modules. Defining them
//! centrally keeps magic strings and numbers discoverable.

use std::time::Duration;

/// Name of the consolidated notice document at the repository root.
pub const NOTICE_FILE_NAME: &str = "NOTICE.txt";

/// Directory holding fragments split out of the previous notice document.
pub const NOTICE_CACHE_DIR: &str = ".notice";

/// Directory holding the fragments assembled by the current run.
pub const NOTICE_WORK_DIR: &str = ".notice-work";

/// Heading marker that opens a dependency section in the notice document.
pub const SECTION_HEADING: &str = "## ";

/// Marker that closes a dependency section in the notice document.
pub const SECTION_SEPARATOR: &str = "---";

/// Banner line framing the document description.
pub const BANNER_SEPARATOR: &str = "--------";

/// Base URL of the npm package registry.
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Base URL of the GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Base URL of GitHub's raw content mirror.
pub const GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";

/// License file names probed, in order, at the raw content mirror.
pub const LICENSE_FILE_CANDIDATES: [&str; 3] = ["LICENSE.txt", "LICENSE.md", "LICENSE"];

/// Mirror prefix of the Go project's own git hosting.
pub const GO_GOOGLESOURCE_PREFIX: &str = "https://go.googlesource.com/";

/// Prefix of versioned Go import paths served by gopkg.in.
pub const GOPKG_IN_PREFIX: &str = "gopkg.in";

/// Number of leading path segments that make up a Go module root
/// (`host/owner/repo`).
pub const GO_MODULE_ROOT_SEGMENTS: usize = 3;

/// Timeout for a single outbound HTTP request (30 seconds).
///
/// Bounds how long one unresponsive host can stall the dependency
/// that is waiting on it.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for establishing an outbound HTTP connection (10 seconds).
pub const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum number of parallel resolutions regardless of CPU count.
///
/// Resolution is I/O bound, so even single-core machines benefit from
/// several requests in flight.
pub const MIN_PARALLELISM: usize = 10;

/// Multiplier applied to CPU core count for default parallelism.
///
/// Higher values increase throughput but run into registry and GitHub
/// rate limits sooner.
pub const PARALLELISM_CORE_MULTIPLIER: usize = 2;

/// Default CPU core count when detection fails.
pub const FALLBACK_CORE_COUNT: usize = 4;

/// Default ceiling on concurrently resolving dependencies:
/// `max(10, 2 × CPU cores)`.
pub fn default_max_parallel() -> usize {
    let cores = std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(FALLBACK_CORE_COUNT);
    std::cmp::max(MIN_PARALLELISM, cores * PARALLELISM_CORE_MULTIPLIER)
}
