//! Agreement between what a filename claims and what the bytes contain.

use std::fmt;

use crate::mime::{self, OCTET_STREAM};
use crate::signature::FormatTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Consistency {
    /// Name and content resolve to the same MIME type.
    Match,
    /// Content was recognised but the name carries no known extension.
    NameUnresolved,
    /// No signature matched the content.
    ContentUnknown,
    /// Name and content resolve to different MIME types.
    Mismatch,
}

impl Consistency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Consistency::Match => "match",
            Consistency::NameUnresolved => "name_unresolved",
            Consistency::ContentUnknown => "content_unknown",
            Consistency::Mismatch => "mismatch",
        }
    }
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

pub fn consistency(tag: FormatTag, filename: Option<&str>) -> Consistency {
    if !tag.is_known() {
        return Consistency::ContentUnknown;
    }

    let by_name = filename.map_or(OCTET_STREAM, mime::mime_type);
    if by_name == OCTET_STREAM {
        Consistency::NameUnresolved
    } else if by_name == tag.mime_type() {
        Consistency::Match
    } else {
        Consistency::Mismatch
    }
}
