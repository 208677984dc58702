use crate::analyzer::Analysis;

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub show_hex: bool,
}

pub fn format_analysis(analysis: &Analysis, opts: &OutputOptions) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Window: {} bytes", analysis.window_len));
    lines.push(format!("Format: {}", analysis.format));

    if let Some(pattern) = &analysis.matched_pattern {
        lines.push(format!("  Signature: {pattern}"));
    }
    if let Some(version) = analysis.rar_version {
        lines.push(format!("  RAR version: {version}"));
    }
    if let Some(record) = analysis.zip_record {
        lines.push(format!("  Zip record: {record}"));
    }

    lines.push(String::new());
    match &analysis.name {
        Some(name) => lines.push(format!("Name: {name}")),
        None => lines.push("Name: (none)".to_string()),
    }
    match analysis.name_extension {
        Some(ext) => lines.push(format!("MIME by name: {} (.{ext})", analysis.name_mime)),
        None => lines.push(format!("MIME by name: {}", analysis.name_mime)),
    }
    lines.push(format!("MIME by content: {}", analysis.content_mime));
    lines.push(format!("Consistency: {}", analysis.consistency));

    if !analysis.notes.is_empty() {
        lines.push(String::new());
        lines.push("Notes:".to_string());
        for note in &analysis.notes {
            lines.push(format!("  - {note}"));
        }
    }

    if opts.show_hex && analysis.preview.previewed_bytes > 0 {
        lines.push(String::new());
        lines.push(format!(
            "Leading bytes ({} of {}):",
            analysis.preview.previewed_bytes, analysis.window_len
        ));
        for (hex, text) in analysis
            .preview
            .hex_lines
            .iter()
            .zip(&analysis.preview.text_lines)
        {
            lines.push(format!("  {hex:<47}  |{text}|"));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_window;

    #[test]
    fn report_lists_refinements_and_mime() {
        let analysis = analyze_window(b"Rar!\x1a\x07\x00\xcf\x90", Some("old.rar"));
        let report = format_analysis(&analysis, &OutputOptions::default());
        assert!(report.contains("Format: rar"));
        assert!(report.contains("RAR version: 4.x"));
        assert!(report.contains("MIME by name: application/x-rar-compressed (.rar)"));
        assert!(report.contains("Consistency: match"));
        assert!(!report.contains("Leading bytes"));
    }

    #[test]
    fn hex_preview_only_when_requested() {
        let analysis = analyze_window(b"\x1f\x8b\x08\x00payload", None);
        let report = format_analysis(&analysis, &OutputOptions { show_hex: true });
        assert!(report.contains("Leading bytes (11 of 11):"));
        assert!(report.contains("1f 8b 08 00"));
        assert!(report.contains("|....payload|"));
        assert!(report.contains("Name: (none)"));
    }
}
