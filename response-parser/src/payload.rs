use crate::error::ShapeError;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw key-value mapping extracted from a response, ready to be handed to a mapper.
pub type RawMapping = serde_json::Map<String, Value>;

/// Untyped data extracted from a response by
/// [`ResponseParser::extract_data`](crate::parser::ResponseParser::extract_data).
///
/// Single object operations require a [`RawPayload::Mapping`], list operations require a
/// [`RawPayload::Sequence`]. Use [`RawPayload::try_from`] to shape-check an arbitrary
/// [`serde_json::Value`].
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawPayload {
    Mapping(RawMapping),
    Sequence(Vec<RawMapping>),
}

impl RawPayload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Mapping(_) => PayloadKind::Mapping,
            Self::Sequence(_) => PayloadKind::Sequence,
        }
    }

    /// Consume this [`RawPayload`], returning the inner [`RawMapping`] if it is a
    /// [`RawPayload::Mapping`].
    pub fn into_mapping(self) -> Result<RawMapping, ShapeError> {
        match self {
            Self::Mapping(mapping) => Ok(mapping),
            Self::Sequence(_) => Err(ShapeError {
                expected: PayloadKind::Mapping,
                actual: PayloadKind::Sequence,
            }),
        }
    }

    /// Consume this [`RawPayload`], returning the inner [`RawMapping`]s if it is a
    /// [`RawPayload::Sequence`].
    pub fn into_sequence(self) -> Result<Vec<RawMapping>, ShapeError> {
        match self {
            Self::Sequence(sequence) => Ok(sequence),
            Self::Mapping(_) => Err(ShapeError {
                expected: PayloadKind::Sequence,
                actual: PayloadKind::Mapping,
            }),
        }
    }
}

impl From<RawMapping> for RawPayload {
    fn from(mapping: RawMapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<Vec<RawMapping>> for RawPayload {
    fn from(sequence: Vec<RawMapping>) -> Self {
        Self::Sequence(sequence)
    }
}

impl TryFrom<Value> for RawPayload {
    type Error = ShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(mapping) => Ok(Self::Mapping(mapping)),
            Value::Array(elements) => elements
                .into_iter()
                .map(|element| match element {
                    Value::Object(mapping) => Ok(mapping),
                    _ => Err(ShapeError {
                        expected: PayloadKind::Sequence,
                        actual: PayloadKind::MixedSequence,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Sequence),
            other => Err(ShapeError {
                expected: PayloadKind::Mapping,
                actual: PayloadKind::of(&other),
            }),
        }
    }
}

impl From<RawPayload> for Value {
    fn from(payload: RawPayload) -> Self {
        match payload {
            RawPayload::Mapping(mapping) => Value::Object(mapping),
            RawPayload::Sequence(sequence) => {
                Value::Array(sequence.into_iter().map(Value::Object).collect())
            }
        }
    }
}

/// Structural kind of a raw value, used to report [`ShapeError`]s.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    #[display("mapping")]
    Mapping,
    #[display("sequence")]
    Sequence,
    /// Sequence containing at least one element that is not a mapping.
    #[display("mixed sequence")]
    MixedSequence,
    #[display("null")]
    Null,
    #[display("bool")]
    Bool,
    #[display("number")]
    Number,
    #[display("string")]
    String,
}

impl PayloadKind {
    /// Determine the [`PayloadKind`] of an arbitrary [`serde_json::Value`].
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Mapping,
            Value::Array(elements) if elements.iter().all(Value::is_object) => Self::Sequence,
            Value::Array(_) => Self::MixedSequence,
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: Value) -> RawMapping {
        match value {
            Value::Object(mapping) => mapping,
            other => panic!("test value is not an object: {other}"),
        }
    }

    #[test]
    fn test_raw_payload_try_from_value() {
        struct TestCase {
            input: Value,
            expected: Result<RawPayload, ShapeError>,
        }

        let cases = vec![
            TestCase {
                // TC0: object is a Mapping
                input: json!({"id": 1, "name": "Test"}),
                expected: Ok(RawPayload::Mapping(mapping(json!({"id": 1, "name": "Test"})))),
            },
            TestCase {
                // TC1: array of objects is a Sequence, order preserved
                input: json!([{"id": 1}, {"id": 2}]),
                expected: Ok(RawPayload::Sequence(vec![
                    mapping(json!({"id": 1})),
                    mapping(json!({"id": 2})),
                ])),
            },
            TestCase {
                // TC2: empty array is an empty Sequence
                input: json!([]),
                expected: Ok(RawPayload::Sequence(vec![])),
            },
            TestCase {
                // TC3: array containing a non-object is rejected
                input: json!([{"id": 1}, 2]),
                expected: Err(ShapeError {
                    expected: PayloadKind::Sequence,
                    actual: PayloadKind::MixedSequence,
                }),
            },
            TestCase {
                // TC4: null is rejected
                input: Value::Null,
                expected: Err(ShapeError {
                    expected: PayloadKind::Mapping,
                    actual: PayloadKind::Null,
                }),
            },
            TestCase {
                // TC5: string is rejected
                input: json!("data"),
                expected: Err(ShapeError {
                    expected: PayloadKind::Mapping,
                    actual: PayloadKind::String,
                }),
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = RawPayload::try_from(test.input);
            assert_eq!(actual, test.expected, "TC{index} failed");
        }
    }

    #[test]
    fn test_payload_kind_display() {
        struct TestCase {
            input: PayloadKind,
            expected: &'static str,
        }

        let cases = vec![
            TestCase {
                // TC0
                input: PayloadKind::Mapping,
                expected: "mapping",
            },
            TestCase {
                // TC1
                input: PayloadKind::Sequence,
                expected: "sequence",
            },
            TestCase {
                // TC2: multi word variant
                input: PayloadKind::MixedSequence,
                expected: "mixed sequence",
            },
            TestCase {
                // TC3
                input: PayloadKind::Number,
                expected: "number",
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            assert_eq!(test.input.to_string(), test.expected, "TC{index} failed");
        }
    }

    #[test]
    fn test_raw_payload_shape_conversions() {
        let single = RawPayload::from(mapping(json!({"id": 1})));
        assert_eq!(single.kind(), PayloadKind::Mapping);
        assert_eq!(
            single.clone().into_sequence(),
            Err(ShapeError {
                expected: PayloadKind::Sequence,
                actual: PayloadKind::Mapping,
            })
        );
        assert_eq!(single.into_mapping(), Ok(mapping(json!({"id": 1}))));

        let list = RawPayload::from(vec![mapping(json!({"id": 1}))]);
        assert_eq!(list.kind(), PayloadKind::Sequence);
        assert_eq!(
            list.clone().into_mapping(),
            Err(ShapeError {
                expected: PayloadKind::Mapping,
                actual: PayloadKind::Sequence,
            })
        );
        assert_eq!(list.into_sequence(), Ok(vec![mapping(json!({"id": 1}))]));
    }

    #[test]
    fn test_de_raw_payload_untagged() {
        let actual = serde_json::from_str::<RawPayload>(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(actual.kind(), PayloadKind::Sequence);

        let actual = serde_json::from_str::<RawPayload>(r#"{"id": 1}"#).unwrap();
        assert_eq!(Value::from(actual), json!({"id": 1}));

        assert!(serde_json::from_str::<RawPayload>(r#"[1, 2]"#).is_err());
    }
}
