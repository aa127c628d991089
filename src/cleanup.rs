//! Removal of generated artifacts from a working directory.
//!
//! Only top-level entries whose names match a generated-artifact pattern are
//! touched. Source files, documentation and original PDFs stay.

use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

/// File patterns removed by [`cleanup`].
pub const FILE_PATTERNS: [&str; 7] = [
    "*_fields.json",
    "*_field_names.json",
    "*_hierarchical.json",
    "*_full_extraction.json",
    "*_Filled.pdf",
    "RF401_Filled_Form.pdf",
    "*.png",
];

/// Directory pattern removed by [`cleanup`].
pub const DIR_PATTERN: &str = "*_cache";

lazy_static! {
    static ref FILE_MATCHERS: Vec<Regex> = FILE_PATTERNS.iter().map(|p| glob_regex(p)).collect();
    static ref DIR_MATCHER: Regex = glob_regex(DIR_PATTERN);
}

/// Translate a `*` glob into an anchored regex.
fn glob_regex(pattern: &str) -> Regex {
    let body = pattern.split('*').map(regex::escape).collect::<Vec<_>>().join(".*");
    Regex::new(&format!("^{}$", body)).expect("escaped glob is a valid regex")
}

/// Whether [`cleanup`] would remove an entry with this name.
///
/// # Examples
///
/// ```
/// use pdf_formkit::cleanup::is_generated;
///
/// assert!(is_generated("form_fields.json", false));
/// assert!(is_generated("render_cache", true));
/// assert!(!is_generated("form.pdf", false));
/// assert!(!is_generated("render_cache", false));
/// ```
pub fn is_generated(name: &str, is_dir: bool) -> bool {
    if is_dir {
        DIR_MATCHER.is_match(name)
    } else {
        FILE_MATCHERS.iter().any(|re| re.is_match(name))
    }
}

/// Outcome of one cleanup run.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Entries removed, in directory order
    pub removed: Vec<PathBuf>,
    /// Entries that matched but could not be removed
    pub errors: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    /// Number of removed entries.
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Remove generated artifacts directly inside `dir`.
///
/// Only an unreadable directory is an error; failures on single entries are
/// collected in the report.
pub fn cleanup(dir: impl AsRef<Path>) -> Result<CleanupReport> {
    let dir = dir.as_ref();
    log::info!("Cleaning up directory: {}", dir.display());

    let mut entries = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect::<Vec<_>>();
    entries.sort();

    let mut report = CleanupReport::default();
    for path in entries {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        let is_dir = path.is_dir();
        if !is_generated(&name, is_dir) {
            continue;
        }

        let removed = if is_dir {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        match removed {
            Ok(()) => {
                log::info!("Removed {}: {}", if is_dir { "directory" } else { "file" }, name);
                report.removed.push(path);
            },
            Err(e) => {
                log::error!("Error removing {}: {}", name, e);
                report.errors.push((path, e.to_string()));
            },
        }
    }

    log::info!("Cleanup complete! Removed {} items.", report.removed_count());
    Ok(report)
}
