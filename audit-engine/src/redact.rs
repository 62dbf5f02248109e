//! Credential scrubbing for captured payloads.
//!
//! Matching is a case-insensitive substring test on field names, so
//! `Password`, `refreshToken` and `X-Api-Key` are all caught. Matched values
//! are replaced wholesale. Nested objects and arrays are walked recursively.

use serde_json::Value;

/// Replacement written over any value whose field name looks sensitive.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Field name fragments that mark a value as credential material.
const SENSITIVE_FRAGMENTS: [&str; 5] = ["password", "token", "secret", "key", "auth"];

/// Returns true when a field with this name must never be persisted verbatim.
pub fn is_sensitive(field: &str) -> bool {
    let lowered = field.to_ascii_lowercase();
    SENSITIVE_FRAGMENTS
        .iter()
        .any(|fragment| lowered.contains(fragment))
}

/// Walks `value` in place, overwriting every sensitive field.
///
/// Non-container values are left untouched. A sensitive field holding an
/// object or array is masked as a whole rather than walked.
pub fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (field, nested) in map.iter_mut() {
                if is_sensitive(field) {
                    *nested = Value::String(REDACTION_MARKER.to_owned());
                } else {
                    redact_value(nested);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                redact_value(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_credentials_are_masked() {
        let mut body = json!({ "email": "buyer@gov.example", "password": "hunter2" });
        redact_value(&mut body);

        assert_eq!(body["password"], REDACTION_MARKER);
        assert_eq!(body["email"], "buyer@gov.example");
    }

    #[test]
    fn matching_ignores_case_and_position() {
        let mut body = json!({
            "Password": "a",
            "refreshToken": "b",
            "API_KEY": "c",
            "client_secret": "d",
            "authorization": "e"
        });
        redact_value(&mut body);

        for field in [
            "Password",
            "refreshToken",
            "API_KEY",
            "client_secret",
            "authorization",
        ] {
            assert_eq!(body[field], REDACTION_MARKER, "{field} survived redaction");
        }
    }

    #[test]
    fn nested_objects_and_arrays_are_walked() {
        let mut body = json!({
            "bids": [
                { "amount": 10, "api_token": "abc" },
                { "amount": 20, "contact": { "password": "xyz" } }
            ]
        });
        redact_value(&mut body);

        assert_eq!(body["bids"][0]["api_token"], REDACTION_MARKER);
        assert_eq!(body["bids"][1]["contact"]["password"], REDACTION_MARKER);
        assert_eq!(body["bids"][0]["amount"], 10);
        assert_eq!(body["bids"][1]["amount"], 20);
    }

    #[test]
    fn sensitive_containers_are_masked_whole() {
        let mut body = json!({ "auth": { "user": "a", "pass": "b" } });
        redact_value(&mut body);

        assert_eq!(body["auth"], REDACTION_MARKER);
    }

    #[test]
    fn scalar_values_pass_through() {
        let mut text = json!("password=hunter2");
        redact_value(&mut text);
        assert_eq!(text, "password=hunter2");

        let mut number = json!(42);
        redact_value(&mut number);
        assert_eq!(number, 42);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn masked_fields_never_leak_their_value(
                field in prop::sample::select(vec![
                    "password", "new_password", "accessToken", "Secret",
                    "x-api-key", "authorization", "note", "amount", "email",
                ]),
                value in "[a-zA-Z0-9]{8,24}",
            ) {
                let mut map = serde_json::Map::new();
                map.insert(field.to_owned(), Value::String(value.clone()));
                let mut body = Value::Object(map);

                redact_value(&mut body);

                let stored = body.get(field).and_then(Value::as_str).unwrap_or_default();
                if is_sensitive(field) {
                    prop_assert_eq!(stored, REDACTION_MARKER);
                } else {
                    prop_assert_eq!(stored, value.as_str());
                }
            }
        }
    }
}
