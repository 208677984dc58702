//! Filename to MIME type resolution with compound extensions.
//!
//! Candidate suffixes begin after every `.` in the name, earliest first, so
//! `backup.tar.gz` is tried as `tar.gz` before `gz`. Comparison is ASCII
//! case-insensitive and does not allocate.

pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionMimeEntry {
    pub extension: &'static str,
    pub mime_type: &'static str,
}

impl ExtensionMimeEntry {
    pub const fn new(extension: &'static str, mime_type: &'static str) -> Self {
        Self {
            extension,
            mime_type,
        }
    }

    pub fn segments(&self) -> usize {
        self.extension.split('.').count()
    }
}

pub const EXTENSION_MIME_TYPES: &[ExtensionMimeEntry] = &[
    ExtensionMimeEntry::new("tar.gz", "application/gzip"),
    ExtensionMimeEntry::new("tar.bz2", "application/x-bzip2"),
    ExtensionMimeEntry::new("zip", "application/zip"),
    ExtensionMimeEntry::new("rar", "application/x-rar-compressed"),
    ExtensionMimeEntry::new("7z", "application/x-7z-compressed"),
    ExtensionMimeEntry::new("gz", "application/gzip"),
    ExtensionMimeEntry::new("bz2", "application/x-bzip2"),
    ExtensionMimeEntry::new("tar", "application/x-tar"),
];

#[derive(Debug, Clone, Copy)]
pub struct MimeResolver<'t> {
    table: &'t [ExtensionMimeEntry],
}

impl Default for MimeResolver<'static> {
    fn default() -> Self {
        Self {
            table: EXTENSION_MIME_TYPES,
        }
    }
}

impl<'t> MimeResolver<'t> {
    pub fn with_table(table: &'t [ExtensionMimeEntry]) -> Self {
        Self { table }
    }

    pub fn mime_type(&self, filename: &str) -> &'t str {
        self.matched_entry(filename)
            .map(|entry| entry.mime_type)
            .unwrap_or(OCTET_STREAM)
    }

    /// Table extension that decided [`Self::mime_type`], if any.
    pub fn matched_extension(&self, filename: &str) -> Option<&'t str> {
        self.matched_entry(filename).map(|entry| entry.extension)
    }

    fn matched_entry(&self, filename: &str) -> Option<&'t ExtensionMimeEntry> {
        candidate_suffixes(filename).find_map(|suffix| self.entry_for(suffix))
    }

    fn entry_for(&self, suffix: &str) -> Option<&'t ExtensionMimeEntry> {
        self.table
            .iter()
            .find(|entry| entry.extension.eq_ignore_ascii_case(suffix))
    }
}

/// Suffixes following each `.`, longest first. Empty suffixes are skipped.
fn candidate_suffixes(filename: &str) -> impl Iterator<Item = &str> {
    filename
        .match_indices('.')
        .map(move |(idx, _)| &filename[idx + 1..])
        .filter(|suffix| !suffix.is_empty())
}

pub(crate) fn lookup_extension(extension: &str) -> Option<&'static str> {
    MimeResolver::default()
        .entry_for(extension)
        .map(|entry| entry.mime_type)
}

/// Resolve with the built-in table.
pub fn mime_type(filename: &str) -> &'static str {
    MimeResolver::default().mime_type(filename)
}
