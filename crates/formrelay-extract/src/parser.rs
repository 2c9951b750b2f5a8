//! Parse the model's prediction response into an ExtractionResult

use crate::ExtractionError;
use formrelay_domain::{ExtractionResult, FieldPrediction};
use serde_json::Value;
use tracing::warn;

/// Key the model uses for document-level metadata
const METADATA_KEY: &str = "__documentMetadata";

/// Key inside the metadata object carrying the overall confidence score
const SCORE_KEY: &str = "ocrScore";

/// Parse a prediction response body into an ExtractionResult
///
/// The body is expected to be a JSON object with a `__documentMetadata`
/// entry carrying an `ocrScore`, plus one entry per trained field name
/// mapping to an array of `{ "value": ..., "score": ... }` candidates.
///
/// Parsing is deliberately lenient: a missing score becomes `None`,
/// malformed candidate entries are skipped with a warning, and non-array
/// field entries are ignored. Only a body that is not a JSON object at all
/// is a hard error; everything salvageable is salvaged, and the normalizer
/// downstream is total anyway.
pub fn parse_predict_response(body: &str) -> Result<ExtractionResult, ExtractionError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MalformedResponse(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| ExtractionError::MalformedResponse("Expected JSON object".to_string()))?;

    let score = obj
        .get(METADATA_KEY)
        .and_then(|m| m.get(SCORE_KEY))
        .and_then(|v| v.as_f64());

    let mut result = ExtractionResult {
        score,
        ..Default::default()
    };

    for (name, value) in obj {
        if name == METADATA_KEY {
            continue;
        }

        let Some(candidates) = value.as_array() else {
            warn!(field = %name, "field entry is not an array, ignoring");
            continue;
        };

        let predictions: Vec<FieldPrediction> = candidates
            .iter()
            .filter_map(|c| parse_candidate(name, c))
            .collect();

        result.fields.insert(name.clone(), predictions);
    }

    Ok(result)
}

/// Parse a single field candidate, or skip it if it is not an object
fn parse_candidate(field: &str, json: &Value) -> Option<FieldPrediction> {
    let Some(obj) = json.as_object() else {
        warn!(field = %field, "candidate is not an object, skipping");
        return None;
    };

    let value = obj.get("value").and_then(stringify);
    let score = obj.get("score").and_then(|v| v.as_f64());

    Some(FieldPrediction { value, score })
}

/// Render a JSON value as the string the table will carry
///
/// The model usually answers with strings, but numeric fields sometimes come
/// back as bare numbers; those are stringified rather than dropped.
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "__documentMetadata": { "ocrScore": 0.94 },
            "date": [ { "value": "2024-01-05", "score": 0.99 } ],
            "dropdown": [ { "value": "Option B", "score": 0.87 } ]
        }"#;

        let result = parse_predict_response(body).unwrap();
        assert_eq!(result.score, Some(0.94));
        assert_eq!(result.first_value("date"), Some("2024-01-05"));
        assert_eq!(result.first_value("dropdown"), Some("Option B"));
        assert_eq!(result.fields["date"][0].score, Some(0.99));
    }

    #[test]
    fn test_parse_missing_metadata() {
        let body = r#"{ "text": [ { "value": "hello" } ] }"#;

        let result = parse_predict_response(body).unwrap();
        assert_eq!(result.score, None);
        assert_eq!(result.first_value("text"), Some("hello"));
    }

    #[test]
    fn test_parse_empty_candidate_list() {
        let body = r#"{
            "__documentMetadata": { "ocrScore": 0.5 },
            "numeric": []
        }"#;

        let result = parse_predict_response(body).unwrap();
        assert_eq!(result.first_value("numeric"), None);
        assert!(result.fields.contains_key("numeric"));
    }

    #[test]
    fn test_parse_null_value_candidate() {
        let body = r#"{ "date": [ { "value": null, "score": 0.1 } ] }"#;

        let result = parse_predict_response(body).unwrap();
        assert_eq!(result.first_value("date"), None);
        assert_eq!(result.fields["date"][0].score, Some(0.1));
    }

    #[test]
    fn test_parse_numeric_value_stringified() {
        let body = r#"{ "numeric": [ { "value": 42, "score": 0.8 } ] }"#;

        let result = parse_predict_response(body).unwrap();
        assert_eq!(result.first_value("numeric"), Some("42"));
    }

    #[test]
    fn test_parse_skips_malformed_candidates() {
        let body = r#"{
            "date": [ "not an object", { "value": "2024-01-05" } ],
            "text": "not an array"
        }"#;

        let result = parse_predict_response(body).unwrap();
        assert_eq!(result.first_value("date"), Some("2024-01-05"));
        assert!(!result.fields.contains_key("text"));
    }

    #[test]
    fn test_parse_not_an_object_is_error() {
        assert!(matches!(
            parse_predict_response("[1, 2, 3]"),
            Err(ExtractionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_invalid_json_is_error() {
        assert!(matches!(
            parse_predict_response("not json at all"),
            Err(ExtractionError::MalformedResponse(_))
        ));
    }
}
