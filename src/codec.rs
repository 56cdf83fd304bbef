//! Canonical serialization of fault trees.
//!
//! # Serial Schema
//!
//! The canonical map representation (field names and types are normative):
//!
//! ```text
//! code:    string              (required)
//! message: string              (optional)
//! details: map<string,string>  (optional)
//! cause:   list<Error>         (optional, recursively the same schema)
//! ```
//!
//! Minimal instance: `{"code":"x"}`. `cause` is always plural in the serial
//! form; a single cause is a one-element list.
//!
//! # Contract
//!
//! - `code` is always emitted; the other fields only when present. An
//!   explicitly set empty `details` map or `cause` list is present and is
//!   emitted as an empty map/list - presence round-trips exactly.
//! - Fields are emitted in the canonical order `code, message, details,
//!   cause` (serde_json's `preserve_order` feature keeps it), so snapshot
//!   tests see deterministic output. Readers accept any order.
//! - Unknown fields are ignored on decode, so producers can add
//!   informational fields without breaking older consumers.
//! - Round-trip law: `decode(&encode(&f)) == Ok(f)` for every valid fault.
//!
//! # Failure Reporting
//!
//! Decode failures carry a [`CausePath`] - the sequence of cause indices
//! from the root to the malformed node - so a deeply nested problem is
//! pinpointed without re-parsing. The innermost structured reason is
//! propagated as-is.
//!
//! # Depth
//!
//! Decoding rejects nesting beyond [`MAX_CAUSE_DEPTH`] before descending,
//! which also bounds the codec's own recursion. Encoding operates on
//! constructed faults, whose depth the builder already bounds. The serde
//! `Deserialize` implementation rides on the format's recursion limit
//! (serde_json's default is 128, matching [`MAX_CAUSE_DEPTH`]).

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::fault::{Fault, MAX_CAUSE_DEPTH};

/// Positional indicator for decode failures: cause indices from the root
/// down to the node that failed. Empty means the root itself.
///
/// Inline capacity of 4 covers realistic cause trees without allocating.
pub type CausePath = SmallVec<[usize; 4]>;

/// Deserialization failure.
///
/// Every variant that points at a node carries the [`CausePath`] to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// `code` is absent or not a string.
    MissingCode {
        /// Path to the node missing its code.
        path: CausePath,
    },
    /// `code` is present but empty.
    EmptyCode {
        /// Path to the node with the empty code.
        path: CausePath,
    },
    /// A field is present but has the wrong shape.
    MalformedField {
        /// The offending field name.
        field: &'static str,
        /// What the field was expected to be.
        expected: &'static str,
        /// Path to the node carrying the field.
        path: CausePath,
    },
    /// The node (root or `cause` element) is not a map.
    NotAMap {
        /// Path to the non-map node.
        path: CausePath,
    },
    /// Nesting exceeds [`MAX_CAUSE_DEPTH`].
    TooDeep {
        /// Depth at which the bound was crossed.
        depth: usize,
    },
    /// The input text is not valid JSON at all.
    Syntax {
        /// The parser's message.
        message: String,
    },
}

/// Renders a cause path as `the root value` or `cause[1].cause[0]`.
struct PathDisplay<'a>(&'a [usize]);

impl fmt::Display for PathDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("the root value");
        }
        for (position, index) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "cause[{index}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCode { path } => {
                write!(f, "missing or non-string `code` at {}", PathDisplay(path))
            }
            Self::EmptyCode { path } => {
                write!(f, "empty `code` at {}", PathDisplay(path))
            }
            Self::MalformedField {
                field,
                expected,
                path,
            } => {
                write!(
                    f,
                    "`{field}` at {} must be {expected}",
                    PathDisplay(path)
                )
            }
            Self::NotAMap { path } => {
                write!(f, "{} is not a map", PathDisplay(path))
            }
            Self::TooDeep { depth } => write!(
                f,
                "cause nesting depth {depth} exceeds the maximum of {MAX_CAUSE_DEPTH}"
            ),
            Self::Syntax { message } => write!(f, "invalid JSON: {message}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Serialize a fault to the canonical map representation.
pub fn encode(fault: &Fault) -> Value {
    let mut map = Map::new();
    map.insert("code".to_owned(), Value::String(fault.code().to_owned()));
    if let Some(message) = fault.message() {
        map.insert("message".to_owned(), Value::String(message.to_owned()));
    }
    if let Some(details) = fault.details() {
        let mut entries = Map::new();
        for (key, value) in details {
            entries.insert(key.clone(), Value::String(value.clone()));
        }
        map.insert("details".to_owned(), Value::Object(entries));
    }
    if let Some(cause) = fault.cause() {
        map.insert(
            "cause".to_owned(),
            Value::Array(cause.iter().map(encode).collect()),
        );
    }
    Value::Object(map)
}

/// Serialize a fault to a compact JSON string in canonical field order.
pub fn encode_string(fault: &Fault) -> String {
    encode(fault).to_string()
}

/// Parse the canonical map representation into a fault.
///
/// # Errors
///
/// See [`DecodeError`]. A malformed nested cause invalidates the whole
/// parse; the error names the innermost reason and the path to it.
pub fn decode(value: &Value) -> Result<Fault, DecodeError> {
    let mut path = CausePath::new();
    decode_at(value, &mut path, 1)
}

/// Parse a JSON string into a fault.
///
/// # Errors
///
/// [`DecodeError::Syntax`] when the text is not JSON; otherwise as
/// [`decode`].
pub fn decode_str(text: &str) -> Result<Fault, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(|error| DecodeError::Syntax {
        message: error.to_string(),
    })?;
    decode(&value)
}

fn decode_at(value: &Value, path: &mut CausePath, depth: usize) -> Result<Fault, DecodeError> {
    if depth > MAX_CAUSE_DEPTH {
        return Err(DecodeError::TooDeep { depth });
    }

    let map = match value.as_object() {
        Some(map) => map,
        None => return Err(DecodeError::NotAMap { path: path.clone() }),
    };

    let code = match map.get("code") {
        Some(Value::String(code)) => code,
        _ => return Err(DecodeError::MissingCode { path: path.clone() }),
    };
    if code.is_empty() {
        return Err(DecodeError::EmptyCode { path: path.clone() });
    }

    let message = match map.get("message") {
        None => None,
        Some(Value::String(message)) => Some(message.clone()),
        Some(_) => {
            return Err(DecodeError::MalformedField {
                field: "message",
                expected: "a string",
                path: path.clone(),
            });
        }
    };

    let details = match map.get("details") {
        None => None,
        Some(Value::Object(entries)) => {
            let mut details = BTreeMap::new();
            for (key, entry) in entries {
                match entry {
                    Value::String(text) => {
                        details.insert(key.clone(), text.clone());
                    }
                    _ => {
                        return Err(DecodeError::MalformedField {
                            field: "details",
                            expected: "a flat string-to-string map",
                            path: path.clone(),
                        });
                    }
                }
            }
            Some(details)
        }
        Some(_) => {
            return Err(DecodeError::MalformedField {
                field: "details",
                expected: "a flat string-to-string map",
                path: path.clone(),
            });
        }
    };

    let cause = match map.get("cause") {
        None => None,
        Some(Value::Array(items)) => {
            let mut cause = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push(index);
                // An error here carries the full path; no pop on the way out
                let parsed = decode_at(item, path, depth + 1)?;
                path.pop();
                cause.push(parsed);
            }
            Some(cause)
        }
        Some(_) => {
            return Err(DecodeError::MalformedField {
                field: "cause",
                expected: "a sequence of error maps",
                path: path.clone(),
            });
        }
    };

    // Unknown fields in `map` are deliberately ignored
    Ok(Fault::from_parts(code.clone(), message, details, cause))
}

impl Serialize for Fault {
    /// Canonical field order, presence-preserving; composes with any serde
    /// format and with structured-logging layers.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = 1
            + usize::from(self.message().is_some())
            + usize::from(self.details().is_some())
            + usize::from(self.cause().is_some());
        let mut map = serializer.serialize_map(Some(fields))?;
        map.serialize_entry("code", self.code())?;
        if let Some(message) = self.message() {
            map.serialize_entry("message", message)?;
        }
        if let Some(details) = self.details() {
            map.serialize_entry("details", details)?;
        }
        if let Some(cause) = self.cause() {
            map.serialize_entry("cause", cause)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Fault {
    /// Unknown-field-tolerant map visitor enforcing the non-empty code rule.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FaultVisitor;

        impl<'de> Visitor<'de> for FaultVisitor {
            type Value = Fault;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an error map with a non-empty `code` field")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Fault, A::Error> {
                let mut code: Option<String> = None;
                let mut message: Option<String> = None;
                let mut details: Option<BTreeMap<String, String>> = None;
                let mut cause: Option<Vec<Fault>> = None;

                while let Some(key) = access.next_key::<String>()? {
                    match key.as_str() {
                        "code" => {
                            if code.is_some() {
                                return Err(de::Error::duplicate_field("code"));
                            }
                            code = Some(access.next_value()?);
                        }
                        "message" => {
                            if message.is_some() {
                                return Err(de::Error::duplicate_field("message"));
                            }
                            message = Some(access.next_value()?);
                        }
                        "details" => {
                            if details.is_some() {
                                return Err(de::Error::duplicate_field("details"));
                            }
                            details = Some(access.next_value()?);
                        }
                        "cause" => {
                            if cause.is_some() {
                                return Err(de::Error::duplicate_field("cause"));
                            }
                            cause = Some(access.next_value()?);
                        }
                        _ => {
                            // Forward compatibility: unknown fields are dropped
                            let _ = access.next_value::<IgnoredAny>()?;
                        }
                    }
                }

                let code = code.ok_or_else(|| de::Error::missing_field("code"))?;
                if code.is_empty() {
                    return Err(de::Error::invalid_value(
                        de::Unexpected::Str(""),
                        &"a non-empty error code",
                    ));
                }

                Ok(Fault::from_parts(code, message, details, cause))
            }
        }

        deserializer.deserialize_map(FaultVisitor)
    }
}
