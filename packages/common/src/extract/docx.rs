use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::TextExtractError;

const DOCUMENT_PART: &str = "word/document.xml";
const MAX_DOCUMENT_XML: u64 = 32 * 1024 * 1024;

/// Text runs, tabs, breaks and paragraph ends in WordprocessingML.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab\s*/>|<w:(?:br|cr)(?:\s[^>]*)?/>|</w:p>")
        .expect("valid regex")
});

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex"));

/// Extract text from a DOCX package: one line per paragraph.
pub fn extract_docx(bytes: &[u8]) -> Result<String, TextExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| TextExtractError::Docx(format!("invalid package: {e}")))?;
    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| TextExtractError::Docx(format!("missing {DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.take(MAX_DOCUMENT_XML)
        .read_to_string(&mut xml)
        .map_err(|e| TextExtractError::Docx(format!("unreadable {DOCUMENT_PART}: {e}")))?;

    Ok(document_text(&xml))
}

fn document_text(xml: &str) -> String {
    let mut out = String::new();
    for cap in TOKEN.captures_iter(xml) {
        if let Some(run) = cap.get(1) {
            out.push_str(&unescape(run.as_str()));
            continue;
        }
        let token = &cap[0];
        if token.starts_with("<w:tab") {
            out.push('\t');
        } else {
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}

fn unescape(text: &str) -> String {
    ENTITY
        .replace_all(text, |cap: &Captures| {
            let name = &cap[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => numeric_entity(name),
            };
            decoded.map_or_else(|| cap[0].to_string(), String::from)
        })
        .into_owned()
}

fn numeric_entity(name: &str) -> Option<char> {
    let code = if let Some(hex) = name.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        name.strip_prefix('#')?.parse().ok()?
    };
    char::from_u32(code)
}
