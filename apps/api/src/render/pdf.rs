//! Minimal single-page PDF serializer for generated profile summaries.
//!
//! Emits a self-contained PDF 1.4 byte stream (US-Letter, Helvetica with
//! WinAnsi encoding) without an external layout engine. Markdown-ish input
//! is flattened to presentational rules: headings switch font size, bullet
//! markers become a literal "* " prefix, bold/italic markers are stripped.
//! Content past the bottom margin is silently truncated — there is no
//! pagination.
//!
//! The serializer never fails: any internal error during generation falls
//! back to an even more minimal valid PDF carrying the candidate name and a
//! truncated error note.

const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;
const MARGIN: f64 = 72.0;
const TITLE_Y: f64 = PAGE_HEIGHT - MARGIN;

const TITLE_SIZE: u32 = 16;
const H1_SIZE: u32 = 14;
const H2_SIZE: u32 = 12;
const BODY_SIZE: u32 = 10;
/// Fixed character budget per wrapped body line.
const WRAP_COLS: usize = 90;

/// Renders a profile summary as PDF bytes. Always returns a valid PDF.
pub fn render_profile_pdf(candidate_name: &str, body: &str) -> Vec<u8> {
    let title = format!("Profile Summary - {candidate_name}");
    let result = std::panic::catch_unwind(|| build_document(&title, body));
    match result {
        Ok(bytes) => bytes,
        Err(_) => fallback_pdf(candidate_name, "internal error during PDF generation"),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    size: u32,
    text: String,
}

fn build_document(title: &str, body: &str) -> Vec<u8> {
    let lines = layout(body);
    let content = content_stream(title, &lines);
    assemble(&content)
}

/// Minimal two-line document used when the main path fails.
fn fallback_pdf(candidate_name: &str, error: &str) -> Vec<u8> {
    let note: String = error.chars().take(120).collect();
    let ops = format!(
        "BT\n/F1 14 Tf\n72 720 Td\n({}) Tj\n0 -20 Td\n/F1 10 Tf\n({}) Tj\nET\n",
        escape_text(&sanitize(candidate_name)),
        escape_text(&sanitize(&note)),
    );
    assemble(&latin1_bytes(&ops))
}

/// Normalizes markdown-ish body text into sized, wrapped lines.
fn layout(body: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    for raw in body.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            lines.push(Line {
                size: BODY_SIZE,
                text: String::new(),
            });
            continue;
        }

        let (size, text) = if let Some(rest) = trimmed.strip_prefix('#') {
            let level = 1 + rest.chars().take_while(|&c| c == '#').count();
            let heading = rest.trim_start_matches('#').trim();
            let size = if level == 1 { H1_SIZE } else { H2_SIZE };
            (size, strip_inline_markers(heading))
        } else if let Some(rest) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            (BODY_SIZE, format!("* {}", strip_inline_markers(rest.trim())))
        } else {
            (BODY_SIZE, strip_inline_markers(trimmed))
        };

        for wrapped in wrap(&sanitize(&text), WRAP_COLS) {
            lines.push(Line {
                size,
                text: wrapped,
            });
        }
    }
    lines
}

fn strip_inline_markers(text: &str) -> String {
    text.replace("**", "").replace('*', "").replace('_', " ")
}

/// Replaces the non-ASCII punctuation the embedded font cannot be trusted
/// with; anything outside Latin-1 becomes '?' at byte-encoding time.
fn sanitize(text: &str) -> String {
    text.chars()
        .flat_map(|c| {
            let replacement: &[char] = match c {
                '\u{2018}' | '\u{2019}' | '\u{201A}' => &['\''],
                '\u{201C}' | '\u{201D}' | '\u{201E}' => &['"'],
                '\u{2013}' | '\u{2014}' => &['-'],
                '\u{2022}' | '\u{00B7}' => &['*'],
                '\u{2026}' => &['.', '.', '.'],
                '\t' => &[' ', ' '],
                _ => return vec![c].into_iter(),
            };
            replacement.to_vec().into_iter()
        })
        .collect()
}

/// Escapes PDF string-literal specials: backslash and parentheses.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => out.push(c),
        }
    }
    out
}

/// Greedy word wrap to a fixed column budget; oversized words hard-split.
fn wrap(text: &str, cols: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > cols {
            // hard split
            let split_at = word
                .char_indices()
                .nth(cols)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= cols {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Builds the page content stream: title, then body lines following the
/// vertical cursor, stopping once the cursor would pass the bottom margin.
fn content_stream(title: &str, lines: &[Line]) -> Vec<u8> {
    let mut ops = String::new();
    ops.push_str(&format!(
        "BT\n/F1 {TITLE_SIZE} Tf\n{MARGIN} {TITLE_Y} Td\n({}) Tj\n",
        escape_text(&sanitize(title))
    ));

    let mut y = TITLE_Y;
    let mut current_size = TITLE_SIZE;
    for line in lines {
        let leading = f64::from(line.size) + 4.0;
        if y - leading < MARGIN {
            break; // bottom margin reached; remainder is dropped
        }
        y -= leading;
        if line.size != current_size {
            ops.push_str(&format!("/F1 {} Tf\n", line.size));
            current_size = line.size;
        }
        ops.push_str(&format!("0 -{leading} Td\n"));
        if !line.text.is_empty() {
            ops.push_str(&format!("({}) Tj\n", escape_text(&line.text)));
        }
    }
    ops.push_str("ET\n");
    latin1_bytes(&ops)
}

/// The font is WinAnsi-encoded; chars beyond Latin-1 degrade to '?'.
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

/// Assembles the object table, xref, and trailer around a content stream.
fn assemble(content: &[u8]) -> Vec<u8> {
    let mut objects: Vec<Vec<u8>> = vec![
        b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_vec(),
        b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n".to_vec(),
        format!(
            "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>\nendobj\n"
        )
        .into_bytes(),
        b"4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>\nendobj\n"
            .to_vec(),
        Vec::new(),
    ];
    let mut stream_obj = format!("5 0 obj\n<< /Length {} >>\nstream\n", content.len()).into_bytes();
    stream_obj.extend_from_slice(content);
    stream_obj.extend_from_slice(b"\nendstream\nendobj\n");
    objects[4] = stream_obj;

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for obj in &objects {
        offsets.push(out.len());
        out.extend_from_slice(obj);
    }

    let xref_pos = out.len();
    out.extend_from_slice(b"xref\n0 6\n0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(b"trailer\n<< /Size 6 /Root 1 0 R >>\nstartxref\n");
    out.extend_from_slice(format!("{xref_pos}\n%%EOF\n").as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn output_always_starts_with_pdf_header() {
        let huge = "word ".repeat(5_000);
        for body in ["", "plain text", huge.as_str()] {
            let bytes = render_profile_pdf("Jane Doe", body);
            assert!(bytes.starts_with(b"%PDF-1.4"));
            assert!(!bytes.is_empty());
        }
    }

    #[test]
    fn output_has_trailer_and_eof() {
        let text = as_text(&render_profile_pdf("Jane", "body"));
        assert!(text.contains("startxref"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn title_carries_candidate_name() {
        let text = as_text(&render_profile_pdf("Jane Doe", "body"));
        assert!(text.contains("(Profile Summary - Jane Doe) Tj"));
    }

    #[test]
    fn parens_and_backslashes_are_escaped() {
        let text = as_text(&render_profile_pdf("A (B)", "pa\\th (x)"));
        assert!(text.contains("\\(B\\)"));
        assert!(text.contains("pa\\\\th \\(x\\)"));
    }

    #[test]
    fn smart_punctuation_becomes_ascii() {
        let text = as_text(&render_profile_pdf(
            "J",
            "\u{201C}quoted\u{201D} \u{2014} bullet \u{2022} it\u{2019}s",
        ));
        assert!(text.contains("\"quoted\" - bullet * it's"));
    }

    #[test]
    fn headings_switch_font_size() {
        let text = as_text(&render_profile_pdf("J", "# Heading\nbody\n## Sub"));
        assert!(text.contains("/F1 14 Tf"));
        assert!(text.contains("/F1 12 Tf"));
        assert!(text.contains("/F1 10 Tf"));
        assert!(text.contains("(Heading) Tj"));
    }

    #[test]
    fn bullets_get_literal_star_prefix_and_bold_is_stripped() {
        let text = as_text(&render_profile_pdf("J", "- **Rust** expertise"));
        assert!(text.contains("(* Rust expertise) Tj"));
    }

    #[test]
    fn long_lines_are_wrapped() {
        let body = "word ".repeat(60); // ~300 chars, must span several lines
        let text = as_text(&render_profile_pdf("J", &body));
        let tj_count = text.matches(") Tj").count();
        assert!(tj_count >= 4, "expected wrapped lines, got {tj_count}");
    }

    #[test]
    fn content_is_truncated_at_bottom_margin() {
        // A page holds at most (720 - 72) / 14 body lines plus the title.
        let body = "line\n".repeat(5_000);
        let text = as_text(&render_profile_pdf("J", &body));
        let tj_count = text.matches(") Tj").count();
        assert!(tj_count <= 60, "expected truncation, got {tj_count} lines");
    }

    #[test]
    fn stream_length_matches_content() {
        let bytes = render_profile_pdf("J", "hello");
        let text = as_text(&bytes);
        let length: usize = text
            .split("/Length ")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        let start = text.find("stream\n").unwrap() + "stream\n".len();
        let end = text.find("\nendstream").unwrap();
        assert_eq!(end - start, length);
    }

    #[test]
    fn non_latin1_characters_degrade_to_question_marks() {
        let bytes = render_profile_pdf("J", "skills: 日本語");
        assert!(as_text(&bytes).contains("???"));
    }

    #[test]
    fn fallback_document_is_valid() {
        let bytes = fallback_pdf("Jane", "boom");
        let text = as_text(&bytes);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(text.contains("(Jane) Tj"));
        assert!(text.contains("(boom) Tj"));
    }
}
