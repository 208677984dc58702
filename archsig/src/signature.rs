use std::fmt;
use std::str::FromStr;

use crate::mime;

/// Container or compression format identified from leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Zip,
    Rar,
    SevenZip,
    Tar,
    Gz,
    Bz2,
    Unknown,
}

impl FormatTag {
    pub const KNOWN: [FormatTag; 6] = [
        FormatTag::Zip,
        FormatTag::Rar,
        FormatTag::SevenZip,
        FormatTag::Tar,
        FormatTag::Gz,
        FormatTag::Bz2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Zip => "zip",
            FormatTag::Rar => "rar",
            FormatTag::SevenZip => "7z",
            FormatTag::Tar => "tar",
            FormatTag::Gz => "gz",
            FormatTag::Bz2 => "bz2",
            FormatTag::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FormatTag::Unknown)
    }

    /// Canonical MIME type for content carrying this tag.
    ///
    /// Shares the extension table used for filename resolution, so a file
    /// whose name and content agree resolves to the same string both ways.
    pub fn mime_type(&self) -> &'static str {
        match self {
            FormatTag::Unknown => mime::OCTET_STREAM,
            known => mime::lookup_extension(known.as_str()).unwrap_or(mime::OCTET_STREAM),
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "zip" => Ok(FormatTag::Zip),
            "rar" => Ok(FormatTag::Rar),
            "7z" => Ok(FormatTag::SevenZip),
            "tar" => Ok(FormatTag::Tar),
            "gz" => Ok(FormatTag::Gz),
            "bz2" => Ok(FormatTag::Bz2),
            "unknown" => Ok(FormatTag::Unknown),
            _ => Err(ParseTagError::new("format", s)),
        }
    }
}

/// Returned when a tag string does not name any variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagError {
    kind: &'static str,
    input: String,
}

impl ParseTagError {
    pub(crate) fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised {} tag '{}'", self.kind, self.input)
    }
}

impl std::error::Error for ParseTagError {}

/// One fixed-length magic prefix and the tag it identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignaturePattern {
    pub tag: FormatTag,
    pub bytes: &'static [u8],
    pub priority: u8,
}

impl SignaturePattern {
    pub const fn new(tag: FormatTag, bytes: &'static [u8], priority: u8) -> Self {
        Self {
            tag,
            bytes,
            priority,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when `data` is at least as long as the pattern and starts with it.
    pub fn matches(&self, data: &[u8]) -> bool {
        if self.bytes.is_empty() || data.len() < self.bytes.len() {
            return false;
        }
        self.bytes
            .iter()
            .zip(data)
            .all(|(expected, actual)| expected == actual)
    }

    pub fn hex(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub const RAR4_MARKER: &[u8] = b"Rar!\x1a\x07\x00";
pub const RAR5_MARKER: &[u8] = b"Rar!\x1a\x07\x01\x00";

/// Built-in registry, in the order the detector walks it.
pub const SIGNATURES: &[SignaturePattern] = &[
    SignaturePattern::new(FormatTag::Zip, b"PK\x03\x04", 0),
    SignaturePattern::new(FormatTag::Zip, b"PK\x05\x06", 1),
    SignaturePattern::new(FormatTag::Zip, b"PK\x07\x08", 2),
    SignaturePattern::new(FormatTag::Rar, RAR4_MARKER, 3),
    SignaturePattern::new(FormatTag::Rar, RAR5_MARKER, 4),
    SignaturePattern::new(FormatTag::SevenZip, b"7z\xbc\xaf\x27\x1c", 5),
    // ustar magic; matched at the start of the supplied window, not at 257.
    SignaturePattern::new(FormatTag::Tar, b"ustar\x0000", 6),
    SignaturePattern::new(FormatTag::Tar, b"ustar  \x00", 7),
    SignaturePattern::new(FormatTag::Gz, b"\x1f\x8b\x08", 8),
    SignaturePattern::new(FormatTag::Bz2, b"BZh", 9),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_matches_canonical_hex() {
        let rendered: Vec<(&str, String)> = SIGNATURES
            .iter()
            .map(|p| (p.tag.as_str(), p.hex()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("zip", "50 4B 03 04".to_string()),
                ("zip", "50 4B 05 06".to_string()),
                ("zip", "50 4B 07 08".to_string()),
                ("rar", "52 61 72 21 1A 07 00".to_string()),
                ("rar", "52 61 72 21 1A 07 01 00".to_string()),
                ("7z", "37 7A BC AF 27 1C".to_string()),
                ("tar", "75 73 74 61 72 00 30 30".to_string()),
                ("tar", "75 73 74 61 72 20 20 00".to_string()),
                ("gz", "1F 8B 08".to_string()),
                ("bz2", "42 5A 68".to_string()),
            ]
        );
    }

    #[test]
    fn priorities_strictly_increase() {
        for pair in SIGNATURES.windows(2) {
            assert!(
                pair[0].priority < pair[1].priority,
                "{} must precede {}",
                pair[0].hex(),
                pair[1].hex()
            );
        }
    }

    #[test]
    fn no_cross_tag_prefix_collisions() {
        for a in SIGNATURES {
            for b in SIGNATURES {
                if a.tag == b.tag {
                    continue;
                }
                let shorter = a.len().min(b.len());
                assert_ne!(
                    &a.bytes[..shorter],
                    &b.bytes[..shorter],
                    "{} ({}) collides with {} ({})",
                    a.hex(),
                    a.tag,
                    b.hex(),
                    b.tag
                );
            }
        }
    }

    #[test]
    fn pattern_rejects_short_input() {
        let pattern = SIGNATURES[0];
        assert!(!pattern.matches(b"PK\x03"));
        assert!(pattern.matches(b"PK\x03\x04"));
        assert!(pattern.matches(b"PK\x03\x04trailing"));
    }

    #[test]
    fn tag_strings_round_trip_through_from_str() {
        for tag in FormatTag::KNOWN.iter().chain([FormatTag::Unknown].iter()) {
            assert_eq!(tag.as_str().parse::<FormatTag>().unwrap(), *tag);
        }
        assert_eq!(" ZIP ".parse::<FormatTag>().unwrap(), FormatTag::Zip);
    }

    #[test]
    fn unknown_tag_string_is_an_error() {
        let err = "lzh".parse::<FormatTag>().unwrap_err();
        assert_eq!(err.input(), "lzh");
        assert_eq!(err.to_string(), "unrecognised format tag 'lzh'");
    }

    #[test]
    fn content_mime_types() {
        assert_eq!(FormatTag::Zip.mime_type(), "application/zip");
        assert_eq!(FormatTag::Rar.mime_type(), "application/x-rar-compressed");
        assert_eq!(FormatTag::SevenZip.mime_type(), "application/x-7z-compressed");
        assert_eq!(FormatTag::Tar.mime_type(), "application/x-tar");
        assert_eq!(FormatTag::Gz.mime_type(), "application/gzip");
        assert_eq!(FormatTag::Bz2.mime_type(), "application/x-bzip2");
        assert_eq!(FormatTag::Unknown.mime_type(), "application/octet-stream");
    }
}
