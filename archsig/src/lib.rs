//! Archive format detection over leading byte windows.
//!
//! Every entry point is a total, allocation-free function over `'static`
//! tables: unrecognised or truncated input resolves to `unknown` (or
//! `application/octet-stream` for MIME lookups) rather than an error.

pub mod consistency;
pub mod detect;
pub mod mime;
pub mod rar;
pub mod signature;
pub mod zip;

pub use consistency::{Consistency, consistency};
pub use detect::{Detector, detect, detect_opt};
pub use mime::{EXTENSION_MIME_TYPES, ExtensionMimeEntry, MimeResolver, OCTET_STREAM, mime_type};
pub use rar::{RarVersion, detect_rar_version};
pub use signature::{FormatTag, ParseTagError, SIGNATURES, SignaturePattern};
pub use zip::{ZipRecordType, zip_record_type};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of leading bytes consumers read before calling [`detect`].
pub const DEFAULT_WINDOW: usize = 512;

/// Largest window the bundled tools accept on the command line.
pub const MAX_WINDOW: u64 = 1 << 20;
