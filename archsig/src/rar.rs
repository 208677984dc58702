//! RAR sub-version resolution.
//!
//! RAR 1.5-4.x and RAR 5.0+ share the six-byte marker prefix `Rar!\x1a\x07`
//! and diverge at index 6: `0x00` for the old block format, `0x01` for the
//! new one.

use std::fmt;
use std::str::FromStr;

use crate::signature::ParseTagError;

const MARKER_PREFIX: &[u8] = b"Rar!\x1a\x07";
const VERSION_OFFSET: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RarVersion {
    /// RAR 1.5 to 4.x
    V4,
    /// RAR 5.0+
    V5,
    Unknown,
}

impl RarVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            RarVersion::V4 => "4.x",
            RarVersion::V5 => "5.x",
            RarVersion::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RarVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RarVersion {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4.x" => Ok(RarVersion::V4),
            "5.x" => Ok(RarVersion::V5),
            "unknown" => Ok(RarVersion::Unknown),
            _ => Err(ParseTagError::new("rar version", s)),
        }
    }
}

pub fn detect_rar_version(data: &[u8]) -> RarVersion {
    if data.len() <= VERSION_OFFSET || !data.starts_with(MARKER_PREFIX) {
        return RarVersion::Unknown;
    }

    match data[VERSION_OFFSET] {
        0x00 => RarVersion::V4,
        0x01 => RarVersion::V5,
        _ => RarVersion::Unknown,
    }
}
