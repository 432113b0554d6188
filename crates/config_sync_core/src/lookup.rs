use serde_json::{Map, Value};

use crate::error::SyncError;

/// Resolves a dot-separated key path inside a configuration document.
///
/// Any absent segment (or a segment that lands on a non-object) fails with
/// `ParameterNotFound` naming the full key and the document's top-level keys.
pub fn lookup_parameter<'a>(
    document: &'a Map<String, Value>,
    parameter_key: &str,
) -> Result<&'a Value, SyncError> {
    let not_found = || SyncError::ParameterNotFound {
        parameter_key: parameter_key.to_string(),
        available_keys: top_level_keys(document),
    };

    let mut segments = parameter_key.split('.');
    let first = segments.next().unwrap_or_default();
    let mut current = document.get(first).ok_or_else(not_found)?;
    for segment in segments {
        current = current
            .as_object()
            .and_then(|object| object.get(segment))
            .ok_or_else(not_found)?;
    }
    Ok(current)
}

pub fn top_level_keys(document: &Map<String, Value>) -> Vec<String> {
    document.keys().cloned().collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("fixture is an object")
    }

    #[test]
    fn resolves_nested_path() {
        let document = object(json!({"a": {"b": {"c": 42}}}));
        assert_eq!(lookup_parameter(&document, "a.b.c"), Ok(&json!(42)));
    }

    #[test]
    fn resolves_top_level_key() {
        let document = object(json!({"threshold": "0.7"}));
        assert_eq!(lookup_parameter(&document, "threshold"), Ok(&json!("0.7")));
    }

    #[test]
    fn missing_leaf_names_full_key() {
        let document = object(json!({"a": {"b": {}}, "z": 1}));
        let error = lookup_parameter(&document, "a.b.c").expect_err("leaf is missing");

        assert_eq!(
            error,
            SyncError::ParameterNotFound {
                parameter_key: "a.b.c".to_string(),
                available_keys: vec!["a".to_string(), "z".to_string()],
            }
        );
    }

    #[test]
    fn scalar_in_the_middle_of_a_path_is_not_found() {
        let document = object(json!({"a": 3}));
        assert!(lookup_parameter(&document, "a.b").is_err());
    }
}
