//! The normalized form record and its identifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a committed record, based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability for "latest row" queries
/// - 128-bit uniqueness with no coordination
/// - RFC 9562-standard format with broad ecosystem support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u128);

impl RecordId {
    /// Generate a new UUIDv7-based RecordId
    ///
    /// # Examples
    ///
    /// ```
    /// use formrelay_domain::RecordId;
    ///
    /// let id = RecordId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RecordId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// The normalized output of one processed form image
///
/// Every attribute is always present: missing extraction fields normalize to
/// an empty string and a missing confidence score normalizes to `0.0`. A
/// record is committed as one immutable row and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    /// Overall confidence score reported by the extraction model
    pub score: f64,

    /// Value of the form's date field
    pub date_value: String,

    /// Value of the form's printed free-text field
    pub text_value: String,

    /// Value of the form's dropdown/choice field
    pub dropdown_value: String,

    /// Value of the form's numeric field
    pub numeric_value: String,

    /// Value of the form's handwritten free-text field
    pub free_text_writing_value: String,
}

impl FormRecord {
    /// A record with zero score and all fields empty
    ///
    /// This is what the normalizer produces for an extraction result that
    /// carried no usable predictions at all.
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            date_value: String::new(),
            text_value: String::new(),
            dropdown_value: String::new(),
            numeric_value: String::new(),
            free_text_writing_value: String::new(),
        }
    }
}
