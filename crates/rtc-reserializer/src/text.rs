// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON text encoding: `{"<qualified type name>": <tree>}`.

use crate::tree::TextTree;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors for the text encoding.
#[derive(Debug, Error)]
pub enum TextError {
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected an object with exactly one type name key, found {0}")]
    MissingWrapperKey(String),
}

/// Serialize a tree as compact JSON under a single wrapper key.
///
/// Output is deterministic: object members keep their insertion order.
pub fn serialize(tree: &TextTree, wrapper_name: &str) -> Result<String, TextError> {
    let mut wrapper = Map::with_capacity(1);
    wrapper.insert(wrapper_name.to_string(), tree.clone());
    Ok(serde_json::to_string(&Value::Object(wrapper))?)
}

/// Parse wrapped JSON text, returning the wrapper key and the inner tree.
pub fn deserialize(text: &str) -> Result<(String, TextTree), TextError> {
    unwrap(serde_json::from_str(text)?)
}

/// Same as [`deserialize`], for raw transport payloads.
pub fn deserialize_slice(bytes: &[u8]) -> Result<(String, TextTree), TextError> {
    unwrap(serde_json::from_slice(bytes)?)
}

fn unwrap(value: Value) -> Result<(String, TextTree), TextError> {
    match value {
        Value::Object(obj) if obj.len() == 1 => obj
            .into_iter()
            .next()
            .ok_or_else(|| TextError::MissingWrapperKey("an empty object".into())),
        Value::Object(obj) => Err(TextError::MissingWrapperKey(format!(
            "an object with {} keys",
            obj.len()
        ))),
        Value::Array(_) => Err(TextError::MissingWrapperKey("an array".into())),
        other => Err(TextError::MissingWrapperKey(format!("the value {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_wraps_tree() {
        let tree = json!({"x": 1.5, "y": -2.25});
        let text = serialize(&tree, "RTC.Point2D").expect("serialize");
        assert_eq!(text, r#"{"RTC.Point2D":{"x":1.5,"y":-2.25}}"#);
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let tree = json!({"position": {"x": 1.5, "y": -2.25}, "heading": 0.5});
        let a = serialize(&tree, "RTC.Pose2D").expect("serialize");
        let b = serialize(&tree, "RTC.Pose2D").expect("serialize");
        assert_eq!(a, b);
        assert!(a.find("position") < a.find("heading"));
    }

    #[test]
    fn test_deserialize() {
        let (name, tree) =
            deserialize(r#"{"RTC.TimedLong":{"tm":{"sec":1,"nsec":2},"data":-7}}"#).expect("parse");
        assert_eq!(name, "RTC.TimedLong");
        assert_eq!(tree, json!({"tm": {"sec": 1, "nsec": 2}, "data": -7}));
    }

    #[test]
    fn test_deserialize_slice() {
        let (name, tree) = deserialize_slice(br#"{"RTC.Point2D":{"x":0,"y":0}}"#).expect("parse");
        assert_eq!(name, "RTC.Point2D");
        assert_eq!(tree["x"], json!(0));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            deserialize(r#"{"RTC.Point2D": {"x": 1.0,"#),
            Err(TextError::Parse(_))
        ));
        assert!(matches!(
            deserialize_slice(&[0xFF, 0xFE]),
            Err(TextError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_wrapper_key() {
        for text in ["{}", r#"{"a":1,"b":2}"#, "[1,2]", "42", "null"] {
            assert!(
                matches!(deserialize(text), Err(TextError::MissingWrapperKey(_))),
                "{} should be rejected",
                text
            );
        }
    }
}
