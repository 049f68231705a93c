use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /subscribe`.
///
/// `email` is kept as a raw JSON value so a non-string email is reported as an
/// invalid address rather than a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<Value>,
}

impl SubscribeRequest {
    /// Interpret an already-parsed JSON document as a subscribe request.
    /// Anything that isn't an object simply has no email.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn email_of(value: Value) -> Option<String> {
        SubscribeRequest::from_value(value)
            .email
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    #[test]
    fn test_string_email() {
        assert_eq!(email_of(json!({ "email": "a@b.co" })).as_deref(), Some("a@b.co"));
    }

    #[test]
    fn test_non_string_email() {
        let request = SubscribeRequest::from_value(json!({ "email": 42 }));
        assert_eq!(request.email, Some(json!(42)));
        assert_eq!(request.email.as_ref().and_then(Value::as_str), None);
    }

    #[test]
    fn test_missing_email_and_non_object_bodies() {
        assert_eq!(email_of(json!({})), None);
        assert_eq!(email_of(json!(["a@b.co"])), None);
        assert_eq!(email_of(json!("a@b.co")), None);
        assert_eq!(email_of(Value::Null), None);
    }
}
