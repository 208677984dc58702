use archsig::{Consistency, FormatTag, consistency, detect, mime_type};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Mismatch,
    Rejected,
    Error,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Accepted => "accepted",
            Verdict::Mismatch => "mismatch",
            Verdict::Rejected => "rejected",
            Verdict::Error => "error",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Formats an upload may carry. Unknown content is never allowed.
#[derive(Debug, Clone)]
pub struct Policy {
    allowed: Vec<FormatTag>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allowed: FormatTag::KNOWN.to_vec(),
        }
    }
}

impl Policy {
    pub fn new(allowed: &[FormatTag]) -> Self {
        if allowed.is_empty() {
            return Self::default();
        }
        let mut list = Vec::new();
        for tag in allowed {
            if tag.is_known() && !list.contains(tag) {
                list.push(*tag);
            }
        }
        if list.is_empty() {
            return Self::default();
        }
        Self { allowed: list }
    }

    pub fn allows(&self, tag: FormatTag) -> bool {
        self.allowed.contains(&tag)
    }

    pub fn describe(&self) -> String {
        self.allowed
            .iter()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub index: usize,
    pub path: PathBuf,
    pub format: FormatTag,
    pub verdict: Verdict,
    pub detail: String,
}

impl FileReport {
    pub fn error(index: usize, path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            index,
            path,
            format: FormatTag::Unknown,
            verdict: Verdict::Error,
            detail: message.into(),
        }
    }

    pub fn line(&self) -> String {
        format!(
            "{:<8} {:<7} {} - {}",
            self.verdict,
            self.format,
            self.path.display(),
            self.detail
        )
    }
}

pub fn check_window(
    index: usize,
    path: PathBuf,
    window: &[u8],
    name: Option<&str>,
    policy: &Policy,
) -> FileReport {
    let format = detect(window);

    let (verdict, detail) = if !format.is_known() {
        (
            Verdict::Rejected,
            format!("no archive signature in first {} bytes", window.len()),
        )
    } else if !policy.allows(format) {
        (
            Verdict::Rejected,
            format!("{format} is not in the allow-list ({})", policy.describe()),
        )
    } else {
        match consistency(format, name) {
            Consistency::Mismatch => (
                Verdict::Mismatch,
                format!(
                    "name implies {} but content is {}",
                    name.map_or(archsig::OCTET_STREAM, mime_type),
                    format.mime_type()
                ),
            ),
            Consistency::NameUnresolved => (
                Verdict::Accepted,
                format!("{} (no archive extension in name)", format.mime_type()),
            ),
            _ => (Verdict::Accepted, format.mime_type().to_string()),
        }
    };

    FileReport {
        index,
        path,
        format,
        verdict,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(window: &[u8], name: &str, policy: &Policy) -> FileReport {
        check_window(0, PathBuf::from(name), window, Some(name), policy)
    }

    #[test]
    fn accepts_matching_upload() {
        let report = run(b"7z\xbc\xaf\x27\x1c\x00\x04", "photos.7z", &Policy::default());
        assert_eq!(report.verdict, Verdict::Accepted);
        assert_eq!(report.format, FormatTag::SevenZip);
        assert_eq!(report.detail, "application/x-7z-compressed");
    }

    #[test]
    fn accepts_recognised_content_with_plain_name() {
        let report = run(b"BZh91AY&SY", "dump.bin", &Policy::default());
        assert_eq!(report.verdict, Verdict::Accepted);
        assert!(report.detail.contains("no archive extension"));
    }

    #[test]
    fn flags_renamed_archive() {
        let report = run(b"Rar!\x1a\x07\x01\x00", "invoice.zip", &Policy::default());
        assert_eq!(report.verdict, Verdict::Mismatch);
        assert_eq!(
            report.detail,
            "name implies application/zip but content is application/x-rar-compressed"
        );
    }

    #[test]
    fn rejects_unknown_or_disallowed_content() {
        let report = run(b"%PDF-1.7", "paper.zip", &Policy::default());
        assert_eq!(report.verdict, Verdict::Rejected);

        let zip_only = Policy::new(&[FormatTag::Zip]);
        let report = run(b"\x1f\x8b\x08\x00", "logs.tar.gz", &zip_only);
        assert_eq!(report.verdict, Verdict::Rejected);
        assert!(report.detail.contains("allow-list (zip)"));
    }

    #[test]
    fn policy_ignores_unknown_and_duplicates() {
        let policy = Policy::new(&[FormatTag::Unknown, FormatTag::Gz, FormatTag::Gz]);
        assert_eq!(policy.describe(), "gz");
        assert!(!policy.allows(FormatTag::Unknown));
        assert_eq!(Policy::new(&[]).describe(), "zip, rar, 7z, tar, gz, bz2");
    }

    #[test]
    fn unknown_only_allow_list_falls_back_to_all_formats() {
        let policy = Policy::new(&[FormatTag::Unknown]);
        assert_eq!(policy.describe(), "zip, rar, 7z, tar, gz, bz2");
        assert!(!policy.allows(FormatTag::Unknown));

        let report = run(b"PK\x03\x04", "a.zip", &policy);
        assert_eq!(report.verdict, Verdict::Accepted);
        assert_eq!(report.detail, "application/zip");
    }

    #[test]
    fn report_line_layout() {
        let report = FileReport::error(3, PathBuf::from("gone.zip"), "not found");
        assert_eq!(report.line(), "error    unknown gone.zip - not found");
    }
}
