use common::ai::FieldExtractor;
use common::extract::extract_text_blocking;
use common::{ParsedResume, SchemaVersion, map_resume};
use tracing::{debug, info};

/// Run one document through text extraction, AI field extraction and mapping.
///
/// Never fails; each stage degrades to an empty result.
pub async fn parse_document(
    extractor: &dyn FieldExtractor,
    version: SchemaVersion,
    filename: &str,
    bytes: Vec<u8>,
) -> ParsedResume {
    let text = extract_text_blocking(filename.to_string(), bytes).await;
    if text.trim().is_empty() {
        debug!(filename, "No text extracted; skipping AI extraction");
        return ParsedResume::default();
    }

    let fields = extractor.extract(&text).await;
    let parsed = map_resume(&fields, version);
    info!(
        filename,
        chars = text.len(),
        skills = parsed.skills.len(),
        education = parsed.education.len(),
        projects = parsed.projects.len(),
        experience = parsed.experience.len(),
        languages = parsed.languages.len(),
        "Parsed resume document"
    );
    parsed
}
