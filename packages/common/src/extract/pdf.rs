use std::panic::{self, AssertUnwindSafe};

use super::TextExtractError;

/// Extract text from a PDF held in memory.
///
/// `pdf-extract` panics on some malformed inputs; the panic is caught and
/// reported as an error.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, TextExtractError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));
    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(TextExtractError::Pdf(e.to_string())),
        Err(payload) => Err(TextExtractError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
