use serde::Serialize;

use crate::error::FieldError;

/// Maximum length of short profile and bill text fields, in characters.
pub const MAX_TEXT_LEN: usize = 255;

/// Pagination metadata included in list responses.
#[derive(Debug, Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Record an error if `value` is longer than `max` characters.
pub fn check_len(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("Must be at most {max} characters"),
        ));
    }
}

/// Record an error if a required text field is blank.
pub fn check_not_blank(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "Must not be empty"));
    }
}
