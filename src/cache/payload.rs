//! Payload Module
//!
//! Values accepted by `store`, and how they turn into bytes and history text.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Payload ==
/// A value the cache can store.
///
/// Deserializes from JSON untagged: integers before floats before strings,
/// and an array of byte values as binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    /// Encodes the payload the way a Redis client writes it on the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Payload::Text(text) => text.as_bytes().to_vec(),
            Payload::Bytes(bytes) => bytes.clone(),
            Payload::Integer(n) => n.to_string().into_bytes(),
            Payload::Float(f) => format_float(*f).into_bytes(),
        }
    }
}

/// Shortest round-trip decimal, always with a fractional part for finite values.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{}inf", sign)
    } else {
        format!("{:?}", value)
    }
}

/// History representation: text as-is, numbers as literals, binary as `b'..'`.
impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            Payload::Integer(n) => write!(f, "{}", n),
            Payload::Float(v) => f.write_str(&format_float(*v)),
            Payload::Bytes(bytes) => {
                f.write_str("b'")?;
                for &byte in bytes {
                    match byte {
                        b'\'' => f.write_str("\\'")?,
                        b'"' => f.write_str("\"")?,
                        _ => write!(f, "{}", std::ascii::escape_default(byte))?,
                    }
                }
                f.write_str("'")
            }
        }
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::Bytes(value)
    }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self {
        Payload::Bytes(value.to_vec())
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Integer(value)
    }
}

impl From<i32> for Payload {
    fn from(value: i32) -> Self {
        Payload::Integer(value.into())
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes() {
        assert_eq!(Payload::from("foo").to_bytes(), b"foo");
        assert_eq!(Payload::from(b"hello".as_slice()).to_bytes(), b"hello");
        assert_eq!(Payload::from(123).to_bytes(), b"123");
        assert_eq!(Payload::from(-7i64).to_bytes(), b"-7");
        assert_eq!(Payload::from(3.5).to_bytes(), b"3.5");
        assert_eq!(Payload::from(1.0).to_bytes(), b"1.0");
    }

    #[test]
    fn test_display_for_history() {
        assert_eq!(Payload::from("foo").to_string(), "foo");
        assert_eq!(Payload::from(42).to_string(), "42");
        assert_eq!(Payload::from(b"hello".as_slice()).to_string(), "b'hello'");
        assert_eq!(
            Payload::from(vec![0u8, b'\'', 0xff]).to_string(),
            "b'\\x00\\'\\xff'"
        );
    }

    #[test]
    fn test_deserialize_untagged() {
        let p: Payload = serde_json::from_str("123").unwrap();
        assert_eq!(p, Payload::Integer(123));

        let p: Payload = serde_json::from_str("1.5").unwrap();
        assert_eq!(p, Payload::Float(1.5));

        let p: Payload = serde_json::from_str("\"bar\"").unwrap();
        assert_eq!(p, Payload::Text("bar".to_string()));

        let p: Payload = serde_json::from_str("[104, 105]").unwrap();
        assert_eq!(p, Payload::Bytes(b"hi".to_vec()));
    }
}
