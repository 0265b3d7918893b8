//! Repository comments in `Pipfile`s.
//!
//! Python dependencies are attributed through comments naming their GitHub
//! repository:
//!
//! ```text
//! # repo: https://github.com/psf/requests
//! requests = "*"
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::core::{Dependency, Ecosystem};

static REPO_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^#\s*[Rr]epo(?:sitory)?:\s*(?P<url>https://github\.com/(?P<full_name>[^/\s]+/(?P<name>[^/\s]+)))",
    )
    .expect("repository comment pattern is valid")
});

/// Dependencies named by repository comments, in file order.
pub fn parse(content: &str) -> Vec<Dependency> {
    content
        .lines()
        .filter_map(|line| REPO_COMMENT.captures(line.trim()))
        .map(|caps| {
            Dependency::new(&caps["name"], Ecosystem::Pipfile)
                .with_full_name(&caps["full_name"])
                .with_repository("https", &caps["url"])
        })
        .collect()
}
