//! First-pass format detection over a leading byte window.
//!
//! The detector walks its registry in declaration order and returns the tag
//! of the first pattern that fully matches. Buffers shorter than a pattern
//! never match that pattern, so truncated input degrades to
//! [`FormatTag::Unknown`] instead of faulting.

use crate::signature::{FormatTag, SIGNATURES, SignaturePattern};

#[derive(Debug, Clone, Copy)]
pub struct Detector<'r> {
    registry: &'r [SignaturePattern],
}

impl Default for Detector<'static> {
    fn default() -> Self {
        Self {
            registry: SIGNATURES,
        }
    }
}

impl<'r> Detector<'r> {
    /// Detector over a caller-supplied registry, walked in slice order.
    pub fn with_registry(registry: &'r [SignaturePattern]) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r [SignaturePattern] {
        self.registry
    }

    pub fn detect(&self, data: &[u8]) -> FormatTag {
        self.matching_pattern(data)
            .map(|pattern| pattern.tag)
            .unwrap_or(FormatTag::Unknown)
    }

    pub fn detect_opt(&self, data: Option<&[u8]>) -> FormatTag {
        data.map_or(FormatTag::Unknown, |bytes| self.detect(bytes))
    }

    /// The registry entry that decided the result, if any.
    pub fn matching_pattern(&self, data: &[u8]) -> Option<&'r SignaturePattern> {
        if data.is_empty() {
            return None;
        }
        self.registry.iter().find(|pattern| pattern.matches(data))
    }
}

/// Detect with the built-in registry.
pub fn detect(data: &[u8]) -> FormatTag {
    Detector::default().detect(data)
}

/// Detect with the built-in registry; absent input is `Unknown`.
pub fn detect_opt(data: Option<&[u8]>) -> FormatTag {
    Detector::default().detect_opt(data)
}
