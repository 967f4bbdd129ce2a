//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::cache::Payload;

/// Request body for the STORE operation (POST /store)
///
/// `value` may be a JSON string, integer, float or an array of byte values.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// The value to store
    pub value: Payload,
}

/// How GET /get/:key decodes the stored bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decode {
    /// Raw bytes, as an array of byte values
    #[default]
    Raw,
    Text,
    Integer,
    Float,
}

/// Query string for GET /get/:key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    #[serde(default)]
    pub decode: Decode,
}

/// Query string for GET /page and GET /page/count
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub url: String,
}

impl PageQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("url cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_request_deserialize() {
        let req: StoreRequest = serde_json::from_str(r#"{"value": "foo"}"#).unwrap();
        assert_eq!(req.value, Payload::Text("foo".to_string()));

        let req: StoreRequest = serde_json::from_str(r#"{"value": 123}"#).unwrap();
        assert_eq!(req.value, Payload::Integer(123));
    }

    #[test]
    fn test_store_request_missing_value() {
        assert!(serde_json::from_str::<StoreRequest>(r#"{}"#).is_err());
    }

    #[test]
    fn test_decode_names() {
        let q: GetQuery = serde_json::from_str(r#"{"decode": "integer"}"#).unwrap();
        assert_eq!(q.decode, Decode::Integer);

        let q: GetQuery = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(q.decode, Decode::Raw);
    }

    #[test]
    fn test_validate_empty_url() {
        let q = PageQuery {
            url: "  ".to_string(),
        };
        assert!(q.validate().is_some());

        let q = PageQuery {
            url: "http://example.com".to_string(),
        };
        assert!(q.validate().is_none());
    }
}
