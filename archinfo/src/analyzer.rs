use archsig::{
    Consistency, Detector, FormatTag, MimeResolver, RarVersion, ZipRecordType, consistency,
    detect_rar_version, zip_record_type,
};
use indexmap::IndexSet;
use tracing::debug;

const PREVIEW_BYTES: usize = 64;
const USTAR_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8] = b"ustar";

#[derive(Debug, Default, Clone)]
pub struct WindowPreview {
    pub hex_lines: Vec<String>,
    pub text_lines: Vec<String>,
    pub previewed_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub window_len: usize,
    pub format: FormatTag,
    pub matched_pattern: Option<String>,
    pub rar_version: Option<RarVersion>,
    pub zip_record: Option<ZipRecordType>,
    pub name: Option<String>,
    pub name_mime: &'static str,
    pub name_extension: Option<&'static str>,
    pub content_mime: &'static str,
    pub consistency: Consistency,
    pub notes: IndexSet<String>,
    pub preview: WindowPreview,
}

impl Analysis {
    fn note(&mut self, note: impl Into<String>) {
        let note = note.into();
        if !note.is_empty() {
            self.notes.insert(note);
        }
    }
}

pub fn analyze_window(bytes: &[u8], name: Option<&str>) -> Analysis {
    let detector = Detector::default();
    let resolver = MimeResolver::default();

    let pattern = detector.matching_pattern(bytes);
    let format = pattern.map_or(FormatTag::Unknown, |p| p.tag);
    debug!(format = %format, window = bytes.len(), "signature pass complete");

    let rar_version = (format == FormatTag::Rar).then(|| detect_rar_version(bytes));
    let zip_record = (format == FormatTag::Zip).then(|| zip_record_type(bytes));

    let name_mime = name.map_or(archsig::OCTET_STREAM, |n| resolver.mime_type(n));
    let name_extension = name.and_then(|n| resolver.matched_extension(n));

    let mut analysis = Analysis {
        window_len: bytes.len(),
        format,
        matched_pattern: pattern.map(|p| p.hex()),
        rar_version,
        zip_record,
        name: name.map(str::to_string),
        name_mime,
        name_extension,
        content_mime: format.mime_type(),
        consistency: consistency(format, name),
        notes: IndexSet::new(),
        preview: build_preview(bytes),
    };

    if bytes.is_empty() {
        analysis.note("Input is empty");
    }

    match analysis.consistency {
        Consistency::ContentUnknown if !bytes.is_empty() => {
            analysis.note(format!(
                "No archive signature matched the first {} bytes",
                bytes.len()
            ));
        }
        Consistency::Mismatch => {
            let claimed = name_extension.unwrap_or("?");
            analysis.note(format!(
                "Name suggests .{claimed} ({name_mime}) but content is {format} ({})",
                analysis.content_mime
            ));
        }
        Consistency::NameUnresolved => match name {
            Some(n) => analysis.note(format!("Name '{n}' has no recognised archive extension")),
            None => analysis.note("No filename supplied; MIME by name defaults to octet-stream"),
        },
        _ => {}
    }

    if format == FormatTag::Tar {
        analysis.note("Tar magic matched at offset 0 of the window");
    } else if format == FormatTag::Unknown && has_ustar_at_header_offset(bytes) {
        analysis.note(format!(
            "ustar magic present at offset {USTAR_OFFSET}; detection only inspects offset 0"
        ));
    }

    if zip_record.is_some_and(|record| record.is_empty_archive()) {
        analysis.note("Zip starts with an end-of-central-directory record (empty archive)");
    }

    analysis
}

fn has_ustar_at_header_offset(bytes: &[u8]) -> bool {
    bytes
        .get(USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len())
        .is_some_and(|magic| magic == USTAR_MAGIC)
}

fn build_preview(data: &[u8]) -> WindowPreview {
    if data.is_empty() {
        return WindowPreview::default();
    }

    let mut preview = WindowPreview::default();
    let limit = data.len().min(PREVIEW_BYTES);

    for chunk in data[..limit].chunks(16) {
        let hex = chunk
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        preview.hex_lines.push(hex);

        let text = chunk
            .iter()
            .map(|&b| match b {
                32..=126 => b as char,
                _ => '.',
            })
            .collect::<String>();
        preview.text_lines.push(text);
    }

    preview.previewed_bytes = limit;
    preview
}
