//! Raw extraction model output

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One candidate value for a named form field
///
/// The model may return several candidates per field, and any of them may be
/// empty. Nothing here is trusted or interpreted; the normalizer decides what
/// survives into a [`crate::FormRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPrediction {
    /// Predicted value, if the model produced one
    pub value: Option<String>,

    /// Per-candidate confidence, if the model reported one
    pub score: Option<f64>,
}

impl FieldPrediction {
    /// A prediction carrying just a value
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            score: None,
        }
    }
}

/// The raw, structured response of one extraction call
///
/// Transient: created per request, consumed by the normalizer, never
/// persisted directly. Field names are whatever the model was trained with;
/// unrecognized names are simply ignored downstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Overall document confidence score, if the model reported one
    pub score: Option<f64>,

    /// Ordered set of named field predictions
    pub fields: BTreeMap<String, Vec<FieldPrediction>>,
}

impl ExtractionResult {
    /// First non-empty candidate value for a field, if any
    pub fn first_value(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)?
            .iter()
            .filter_map(|p| p.value.as_deref())
            .find(|v| !v.is_empty())
    }

    /// Insert a single-candidate field (test and mock convenience)
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields
            .insert(name.into(), vec![FieldPrediction::with_value(value)]);
    }
}
