//! The `{status, message}` wrapper every catalog response comes in.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ApiError;

/// Decode `text` as an envelope and its `message` payload as `T`.
///
/// `{"status":"error","message":"..."}` becomes [`ApiError::Remote`]; any
/// structural mismatch, including one inside the payload, becomes
/// [`ApiError::Decode`] naming the offending path.
pub fn decode_envelope<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| ApiError::decode("$", err.to_string()))?;
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(ApiError::decode(
                "$",
                format!("expected an object, found {}", kind(&other)),
            ))
        }
    };

    let status = match fields.get("status") {
        Some(Value::String(status)) => status.clone(),
        Some(other) => {
            return Err(ApiError::decode(
                "$.status",
                format!("expected a string, found {}", kind(other)),
            ))
        }
        None => return Err(ApiError::decode("$.status", "missing field")),
    };
    let message = fields
        .remove("message")
        .ok_or_else(|| ApiError::decode("$.message", "missing field"))?;

    match status.as_str() {
        "success" => decode_payload(message),
        "error" => match message {
            Value::String(message) => Err(ApiError::Remote(message)),
            other => Err(ApiError::decode(
                "$.message",
                format!("expected a string, found {}", kind(&other)),
            )),
        },
        other => Err(ApiError::decode(
            "$.status",
            format!("unknown status {other:?}"),
        )),
    }
}

fn decode_payload<T: DeserializeOwned>(message: Value) -> Result<T, ApiError> {
    serde_json::from_value(message).map_err(|err| ApiError::decode("$.message", err.to_string()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::decode_envelope;
    use crate::ApiError;

    type Listing = BTreeMap<String, Vec<String>>;

    #[test]
    fn success_payload_is_decoded() {
        let listing: Listing =
            decode_envelope(r#"{"status":"success","message":{"pug":[],"hound":["afghan"]}}"#)
                .unwrap();
        assert_eq!(listing["hound"], vec!["afghan".to_string()]);
        assert!(listing["pug"].is_empty());
    }

    #[test]
    fn error_status_carries_message() {
        let err = decode_envelope::<Listing>(r#"{"status":"error","message":"Breed not found"}"#)
            .unwrap_err();
        assert_eq!(err, ApiError::Remote("Breed not found".to_string()));
    }

    #[test]
    fn unknown_status_is_a_decode_error() {
        let err = decode_envelope::<Listing>(r#"{"status":"pending","message":{}}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref path, .. } if path == "$.status"));
    }

    #[test]
    fn success_with_wrong_payload_shape_is_rejected() {
        let err = decode_envelope::<Listing>(r#"{"status":"success","message":["pug"]}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref path, .. } if path == "$.message"));

        let err = decode_envelope::<Listing>(r#"{"status":"success","message":{"pug":[1]}}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref path, .. } if path == "$.message"));
    }

    #[test]
    fn malformed_envelopes_are_rejected() {
        for (text, expected_path) in [
            ("not json", "$"),
            ("[1,2]", "$"),
            (r#"{"message":{}}"#, "$.status"),
            (r#"{"status":3,"message":{}}"#, "$.status"),
            (r#"{"status":"success"}"#, "$.message"),
            (r#"{"status":"error","message":{"code":1}}"#, "$.message"),
        ] {
            match decode_envelope::<Listing>(text) {
                Err(ApiError::Decode { path, .. }) => assert_eq!(path, expected_path, "{text}"),
                other => panic!("expected decode error for {text}, got {other:?}"),
            }
        }
    }
}
