//! Notice fragment rendering and document assembly.
//!
//! A fragment is the attribution paragraph of one dependency:
//!
//! ```text
//! ## left-pad
//!
//! This product contains 'left-pad' by azer.
//!
//! String left pad
//!
//! * HOMEPAGE:
//!   * https://github.com/stevemao/left-pad
//!
//! * LICENSE: WTFPL
//!
//! <license text>
//!
//! ```
//!
//! Every fragment ends with a blank line. The document places the header
//! first and joins fragments with `---` lines, so splitting a generated
//! document with [`crate::cache::split_sections`] recovers each fragment
//! byte for byte.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

use crate::cache::NoticeCache;
use crate::constants::{BANNER_SEPARATOR, SECTION_HEADING, SECTION_SEPARATOR};
use crate::core::{Dependency, NoticeError};
use crate::utils::fs::safe_write;

/// Document-level strings printed above the fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoticeHeader<'a> {
    /// First line of the document
    pub title: &'a str,
    /// Copyright line
    pub copyright: &'a str,
    /// Paragraph between the banner lines
    pub description: &'a str,
}

impl NoticeHeader<'_> {
    /// Render the header block.
    pub fn render(&self) -> String {
        format!(
            "{}\n\n{}\n\nNOTICES:\n{BANNER_SEPARATOR}\n\n{}\n\n{BANNER_SEPARATOR}\n\n",
            self.title, self.copyright, self.description
        )
    }
}

/// Render the fragment of a resolved dependency.
///
/// Unknown description, homepage and license are left out. The license
/// text is always written with `\n` line endings, followed by a blank line.
pub fn render_fragment(dependency: &Dependency, license_text: &str) -> String {
    let name = &dependency.name;
    let mut out = format!("{SECTION_HEADING}{name}\n\n");

    if dependency.author.name.is_empty() {
        out.push_str(&format!("This product contains '{name}'.\n\n"));
    } else {
        out.push_str(&format!(
            "This product contains '{name}' by {}.\n\n",
            dependency.author.name
        ));
    }

    if !dependency.description.is_empty() {
        out.push_str(&format!("{}\n\n", dependency.description));
    }
    if !dependency.homepage.is_empty() {
        out.push_str(&format!("* HOMEPAGE:\n  * {}\n\n", dependency.homepage));
    }
    if !dependency.license.is_empty() {
        out.push_str(&format!("* LICENSE: {}\n\n", dependency.license));
    }

    out.push_str(&license_text.replace("\r\n", "\n"));
    out.push_str("\n\n");
    out
}

/// Join the header and fragments into the final document.
///
/// Fragments are emitted in the given order, separated by `---` and a
/// blank line.
pub fn join_document<'a>(
    header: &NoticeHeader<'_>,
    fragments: impl IntoIterator<Item = &'a str>,
) -> String {
    let mut document = header.render();
    for (index, fragment) in fragments.into_iter().enumerate() {
        if index > 0 {
            document.push_str(SECTION_SEPARATOR);
            document.push_str("\n\n");
        }
        document.push_str(fragment);
    }
    document
}

/// Assemble the fragments of `dependencies` into `notice_path`.
///
/// Dependencies are ordered by name. A dependency whose fragment is missing
/// from the working directory is logged and skipped. The atomic replacement
/// of the document runs on the blocking pool. Returns the number of
/// fragments written.
///
/// # Errors
///
/// Returns [`NoticeError::NoticeWriteError`] when the document cannot be
/// replaced, or the error of an unreadable fragment.
pub async fn assemble(
    header: &NoticeHeader<'_>,
    dependencies: &[Dependency],
    cache: &NoticeCache,
    notice_path: &Path,
) -> Result<usize> {
    let mut ordered: Vec<&Dependency> = dependencies.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let mut fragments = Vec::with_capacity(ordered.len());
    for dependency in ordered {
        match cache.read_fragment(&dependency.fragment_file_name()).await? {
            Some(fragment) => fragments.push(fragment),
            None => warn!("{}: no notice fragment, leaving it out", dependency.name),
        }
    }

    let document = join_document(header, fragments.iter().map(String::as_str));
    let target = notice_path.to_path_buf();
    let written = tokio::task::spawn_blocking(move || safe_write(&target, &document))
        .await
        .with_context(|| "spawn_blocking panicked")?;
    written.map_err(|e| {
        let reason = format!("{e:#}");
        e.context(NoticeError::NoticeWriteError {
            path: notice_path.display().to_string(),
            reason,
        })
    })?;

    debug!("Wrote {} fragments to {}", fragments.len(), notice_path.display());
    Ok(fragments.len())
}
