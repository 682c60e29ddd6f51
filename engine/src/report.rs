use crate::reviewer::AnalysisResult;
use thiserror::Error;

pub const MARKDOWN_TITLE: &str = "# CodeRefine Analysis Report";
pub const DOCUMENT_TITLE: &str = "CodeRefine Analysis Report";
pub const NO_ISSUES_PLACEHOLDER: &str = "No issues found.";

const REWRITE_TITLE: &str = "Rewritten Code";
const LINES_PER_PAGE: usize = 54;
const PAGE_HEADER_LINES: usize = 3;
const HEADER_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Document,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("character {ch:?} at byte {position} cannot be encoded in the document character set")]
    Encoding { ch: char, position: usize },
}

/// Serialize a critique into a downloadable artifact. Markdown is UTF-8 text
/// and cannot fail; the paginated document is Latin-1 and fails explicitly on
/// characters it cannot carry.
pub fn serialize(result: &AnalysisResult, format: ReportFormat) -> Result<Vec<u8>, ReportError> {
    match format {
        ReportFormat::Markdown => Ok(to_markdown(result).into_bytes()),
        ReportFormat::Document => document_bytes(result),
    }
}

/// Category titles and contents in canonical report order.
fn categories(result: &AnalysisResult) -> [(&'static str, &[String]); 4] {
    [
        ("Bugs", result.bugs.as_slice()),
        ("Performance Issues", result.performance_issues.as_slice()),
        ("Security Risks", result.security_risks.as_slice()),
        ("Suggestions", result.suggestions.as_slice()),
    ]
}

/// Render the Markdown report: fixed headings, one bullet per item, an
/// explicit placeholder for empty categories, and the rewritten code in a
/// fenced block (omitted entirely when empty).
pub fn to_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(MARKDOWN_TITLE);
    out.push('\n');
    for (title, items) in categories(result) {
        out.push_str("\n## ");
        out.push_str(title);
        out.push_str("\n\n");
        if items.is_empty() {
            out.push('_');
            out.push_str(NO_ISSUES_PLACEHOLDER);
            out.push_str("_\n");
        } else {
            for item in items {
                out.push_str("- ");
                out.push_str(item);
                out.push('\n');
            }
        }
    }
    if !result.rewritten_code.is_empty() {
        out.push_str("\n## ");
        out.push_str(REWRITE_TITLE);
        out.push_str("\n\n```\n");
        out.push_str(&result.rewritten_code);
        if !result.rewritten_code.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("```\n");
    }
    out
}

fn document_bytes(result: &AnalysisResult) -> Result<Vec<u8>, ReportError> {
    let mut blocks = vec![category_lines(result)];
    if !result.rewritten_code.is_empty() {
        blocks.push(code_lines(&result.rewritten_code));
    }
    let pages = paginate(&blocks);
    encode_latin1(&pages.join("\n\u{0C}\n"))
}

fn category_lines(result: &AnalysisResult) -> Vec<String> {
    let mut lines = Vec::new();
    for (title, items) in categories(result) {
        lines.push(title.to_uppercase());
        lines.push("-".repeat(title.len()));
        if items.is_empty() {
            lines.push(NO_ISSUES_PLACEHOLDER.to_string());
        } else {
            for item in items {
                lines.push(format!("- {item}"));
            }
        }
        lines.push(String::new());
    }
    lines
}

fn code_lines(code: &str) -> Vec<String> {
    let mut lines = vec![
        REWRITE_TITLE.to_uppercase(),
        "-".repeat(REWRITE_TITLE.len()),
    ];
    lines.extend(code.lines().map(str::to_string));
    lines
}

fn page_header(page: usize) -> Vec<String> {
    let label = format!("Page {page}");
    let pad = HEADER_WIDTH.saturating_sub(DOCUMENT_TITLE.len() + label.len());
    vec![
        format!("{DOCUMENT_TITLE}{}{label}", " ".repeat(pad)),
        "=".repeat(HEADER_WIDTH),
        String::new(),
    ]
}

/// Fill pages block by block. Every block starts on a fresh page; a block
/// longer than a page spills onto continuation pages. Each page carries the
/// fixed header.
fn paginate(blocks: &[Vec<String>]) -> Vec<String> {
    let capacity = LINES_PER_PAGE - PAGE_HEADER_LINES;
    let mut bodies: Vec<Vec<String>> = Vec::new();
    for block in blocks {
        if block.is_empty() {
            continue;
        }
        for chunk in block.chunks(capacity) {
            bodies.push(chunk.to_vec());
        }
    }
    if bodies.is_empty() {
        bodies.push(Vec::new());
    }
    bodies
        .into_iter()
        .enumerate()
        .map(|(idx, body)| {
            let mut lines = page_header(idx + 1);
            lines.extend(body);
            lines.join("\n")
        })
        .collect()
}

/// ASCII stand-ins for common typography the model tends to emit.
fn transliterate(ch: char) -> Option<&'static str> {
    match ch {
        '\u{2018}' | '\u{2019}' => Some("'"),
        '\u{201C}' | '\u{201D}' => Some("\""),
        '\u{2013}' => Some("-"),
        '\u{2014}' => Some("--"),
        '\u{2026}' => Some("..."),
        '\u{2022}' => Some("*"),
        '\u{A0}' => Some(" "),
        _ => None,
    }
}

/// Encode as Latin-1. Known typography is transliterated; any other character
/// above U+00FF fails explicitly rather than being dropped.
fn encode_latin1(text: &str) -> Result<Vec<u8>, ReportError> {
    let mut out = Vec::with_capacity(text.len());
    for (position, ch) in text.char_indices() {
        if let Some(replacement) = transliterate(ch) {
            out.extend_from_slice(replacement.as_bytes());
        } else if (ch as u32) <= 0xFF {
            out.push(ch as u8);
        } else {
            return Err(ReportError::Encoding { ch, position });
        }
    }
    Ok(out)
}
