//! Normalization of raw extraction output into the fixed record schema
//!
//! This is a total function: it never fails, no matter how malformed or
//! incomplete the extraction result is. Absent, empty or unrecognized fields
//! degrade to empty strings; an absent score degrades to `0.0`.

use crate::extraction::ExtractionResult;
use crate::record::FormRecord;

/// Model field name feeding `date_value`
pub const FIELD_DATE: &str = "date";
/// Model field name feeding `text_value`
pub const FIELD_TEXT: &str = "text";
/// Model field name feeding `dropdown_value`
pub const FIELD_DROPDOWN: &str = "dropdown";
/// Model field name feeding `numeric_value`
pub const FIELD_NUMERIC: &str = "numeric";
/// Model field name feeding `free_text_writing_value`
pub const FIELD_FREE_TEXT_WRITING: &str = "free_text_writing";

/// Map an extraction result onto the fixed record schema
///
/// For each record slot, the first non-empty candidate of the corresponding
/// model field wins; everything else becomes an empty string. The overall
/// score is carried through unchanged, even if it falls outside [0, 1];
/// clamping would hide a misbehaving model from the logs.
///
/// Deterministic: the same input always yields an identical record.
pub fn normalize(result: &ExtractionResult) -> FormRecord {
    let slot = |field: &str| result.first_value(field).unwrap_or_default().to_string();

    FormRecord {
        score: result.score.unwrap_or(0.0),
        date_value: slot(FIELD_DATE),
        text_value: slot(FIELD_TEXT),
        dropdown_value: slot(FIELD_DROPDOWN),
        numeric_value: slot(FIELD_NUMERIC),
        free_text_writing_value: slot(FIELD_FREE_TEXT_WRITING),
    }
}
