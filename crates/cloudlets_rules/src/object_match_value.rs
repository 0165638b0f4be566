//! The structured (`objectMatchValue`) forms a match criterion can carry.
//!
//! The concrete shape is discriminated by a `type` tag nested inside the
//! payload, and the set of legal shapes depends on the enclosing cloudlet:
//! ALB and AS accept all three, the remaining cloudlets only `simple` and
//! `object`. Resolution happens through a data-driven dispatch table so that
//! supporting another shape stays a one-line change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::{self, Validate, ValidationErrors};

/// The shapes an `objectMatchValue` can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Named object match with per-value options.
    Object,
    /// Inclusive integer range.
    Range,
    /// Plain list of strings.
    Simple,
}

impl ValueShape {
    /// The wire `type` tag for this shape.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Range => "range",
            Self::Simple => "simple",
        }
    }
}

/// A resolved `objectMatchValue`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectMatchValue {
    /// `{"type": "object", ...}`
    Object(ObjectMatchValueObject),
    /// `{"type": "range", ...}`
    Range(ObjectMatchValueRange),
    /// `{"type": "simple", ...}`
    Simple(ObjectMatchValueSimple),
}

impl ObjectMatchValue {
    /// The shape of this value.
    #[must_use]
    pub const fn shape(&self) -> ValueShape {
        match self {
            Self::Object(_) => ValueShape::Object,
            Self::Range(_) => ValueShape::Range,
            Self::Simple(_) => ValueShape::Simple,
        }
    }
}

/// An object match value of type `object`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMatchValueObject {
    /// Name of the matched object (header name, cookie name, ...). Required.
    pub name: String,
    /// Wire `type` tag; must be `object`.
    #[serde(rename = "type")]
    pub value_type: String,
    /// Whether `name` is compared case sensitively.
    pub name_case_sensitive: bool,
    /// Whether `name` may contain wildcards.
    pub name_has_wildcard: bool,
    /// Value options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
}

impl ObjectMatchValueObject {
    /// Wire `type` tag for this shape.
    pub const TYPE: &'static str = "object";
}

/// An object match value of type `simple`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMatchValueSimple {
    /// Wire `type` tag; must be `simple`.
    #[serde(rename = "type")]
    pub value_type: String,
    /// The list of values to compare against.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<String>,
}

impl ObjectMatchValueSimple {
    /// Wire `type` tag for this shape.
    pub const TYPE: &'static str = "simple";
}

/// An object match value of type `range`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMatchValueRange {
    /// Wire `type` tag; must be `range`.
    #[serde(rename = "type")]
    pub value_type: String,
    /// Inclusive `[low, high]` bounds.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<i64>,
}

impl ObjectMatchValueRange {
    /// Wire `type` tag for this shape.
    pub const TYPE: &'static str = "range";
}

/// Value options for [`ObjectMatchValueObject`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// The values to compare against.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<String>,
    /// Whether the values may contain wildcards.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub value_has_wildcard: bool,
    /// Whether the values are compared case sensitively.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub value_case_sensitive: bool,
    /// Whether the values are URL-escaped.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub value_escaped: bool,
}

type ShapeDecoder = fn(Value) -> serde_json::Result<ObjectMatchValue>;

/// Dispatch table mapping the inner `type` tag to its typed decoder.
static SHAPE_HANDLERS: &[(ValueShape, ShapeDecoder)] = &[
    (ValueShape::Object, |raw| {
        serde_json::from_value::<ObjectMatchValueObject>(raw).map(ObjectMatchValue::Object)
    }),
    (ValueShape::Range, |raw| {
        serde_json::from_value::<ObjectMatchValueRange>(raw).map(ObjectMatchValue::Range)
    }),
    (ValueShape::Simple, |raw| {
        serde_json::from_value::<ObjectMatchValueSimple>(raw).map(ObjectMatchValue::Simple)
    }),
];

/// Resolves a raw `objectMatchValue` into the concrete shape legal for the
/// enclosing cloudlet. Returns the bare failure message; the caller adds its
/// criteria context.
pub(crate) fn resolve(raw: Value, allowed: &[ValueShape]) -> Result<ObjectMatchValue, String> {
    let tag = {
        let map = raw.as_object().ok_or_else(|| {
            format!(
                "structure of objectMatchValue should be 'map', but was '{}'",
                json_type_name(&raw)
            )
        })?;
        let tag = map
            .get("type")
            .ok_or_else(|| "objectMatchValue should contain 'type' field".to_string())?;
        tag.as_str()
            .ok_or_else(|| "'type' should be a string".to_string())?
            .to_string()
    };

    let decode = SHAPE_HANDLERS
        .iter()
        .find_map(|&(shape, decode)| (shape.tag() == tag && allowed.contains(&shape)).then_some(decode))
        .ok_or_else(|| format!("objectMatchValue has unexpected type: '{tag}'"))?;

    decode(raw).map_err(|err| err.to_string())
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

fn tag_violation(value: &str, expected: &str) -> Option<String> {
    (!value.is_empty() && value != expected)
        .then(|| format!("value '{value}' is invalid. Must be: '{expected}'"))
}

impl Validate for ObjectMatchValueObject {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "Name",
            validate::not_blank(Some(&self.name)).or_else(|| validate::length(Some(&self.name), 0, 8192)),
        );
        errors.check(
            "Type",
            validate::not_blank(Some(&self.value_type))
                .or_else(|| tag_violation(&self.value_type, Self::TYPE)),
        );
        errors.into_result()
    }
}

impl Validate for ObjectMatchValueSimple {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("Type", tag_violation(&self.value_type, Self::TYPE));
        errors.into_result()
    }
}

impl Validate for ObjectMatchValueRange {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("Type", tag_violation(&self.value_type, Self::TYPE));
        errors.into_result()
    }
}
