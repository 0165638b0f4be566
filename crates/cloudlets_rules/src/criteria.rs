//! Match criteria, generic over the cloudlet they belong to.
//!
//! All cloudlets share one criterion shape; what differs per cloudlet is the
//! set of legal `matchType` values and which `objectMatchValue` shapes may
//! appear. That scope is captured by a sealed marker type so the shared
//! decode and validation logic is written once.

use std::fmt;
use std::marker::PhantomData;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::object_match_value::{self, ObjectMatchValue, ValueShape};
use crate::validate::{self, Validate, ValidationErrors};

/// `matchOperator` value for substring comparison.
pub const MATCH_OPERATOR_CONTAINS: &str = "contains";
/// `matchOperator` value for presence checks.
pub const MATCH_OPERATOR_EXISTS: &str = "exists";
/// `matchOperator` value for exact comparison.
pub const MATCH_OPERATOR_EQUALS: &str = "equals";

/// `checkIPs` value selecting the connecting IP.
pub const CHECK_IPS_CONNECTING_IP: &str = "CONNECTING_IP";
/// `checkIPs` value selecting the X-Forwarded-For headers.
pub const CHECK_IPS_XFF_HEADERS: &str = "XFF_HEADERS";
/// `checkIPs` value selecting both.
pub const CHECK_IPS_CONNECTING_IP_XFF_HEADERS: &str = "CONNECTING_IP XFF_HEADERS";

mod sealed {
    pub trait Sealed {}
}

/// Per-cloudlet criteria scope: decode label, legal object-match-value shapes
/// and legal `matchType` values.
///
/// The set of cloudlet types is fixed by the upstream API, so the trait is
/// sealed.
pub trait CriteriaScope:
    sealed::Sealed + Copy + Clone + fmt::Debug + PartialEq + Default
{
    /// Criteria name used in decode error context, e.g. `MatchCriteriaER`.
    const NAME: &'static str;
    /// Object-match-value shapes accepted by this cloudlet.
    const VALUE_SHAPES: &'static [ValueShape];
    /// Legal `matchType` values.
    const MATCH_TYPES: &'static [&'static str];
    /// Whether `matchType` must be present.
    const MATCH_TYPE_REQUIRED: bool;
    /// Enumerated-value hint rendered in `matchType` violations, upstream
    /// wording preserved.
    const MATCH_TYPE_HINT: &'static str;
}

/// Scope marker for Application Load Balancer (ALB) criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alb;

/// Scope marker for API Prioritization (AP) criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ap;

/// Scope marker for Application Segmentation (AS) criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct As;

/// Scope marker for Phased Release (PR aka CD) criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pr;

/// Scope marker for Edge Redirector (ER) criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Er;

/// Scope marker for Forward Rewrite (FR) criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fr;

/// Scope marker for Request Control (RC aka IG) criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rc;

/// Scope marker for Visitor Prioritization (VP) criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vp;

impl sealed::Sealed for Alb {}
impl sealed::Sealed for Ap {}
impl sealed::Sealed for As {}
impl sealed::Sealed for Pr {}
impl sealed::Sealed for Er {}
impl sealed::Sealed for Fr {}
impl sealed::Sealed for Rc {}
impl sealed::Sealed for Vp {}

const ALL_SHAPES: &[ValueShape] = &[ValueShape::Object, ValueShape::Range, ValueShape::Simple];
const SIMPLE_OBJECT: &[ValueShape] = &[ValueShape::Object, ValueShape::Simple];

impl CriteriaScope for Alb {
    const NAME: &'static str = "MatchCriteriaALB";
    const VALUE_SHAPES: &'static [ValueShape] = ALL_SHAPES;
    const MATCH_TYPES: &'static [&'static str] = &[
        "clientip",
        "continent",
        "cookie",
        "countrycode",
        "deviceCharacteristics",
        "extension",
        "header",
        "hostname",
        "method",
        "path",
        "protocol",
        "proxy",
        "query",
        "regioncode",
        "range",
    ];
    const MATCH_TYPE_REQUIRED: bool = false;
    const MATCH_TYPE_HINT: &'static str = "'clientip', 'continent', 'cookie', 'countrycode', \
        'deviceCharacteristics', 'extension', 'header', 'hostname', 'method', 'path', \
        'protocol', 'proxy', 'query', 'regioncode', 'range' or '' (empty)";
}

impl CriteriaScope for Ap {
    const NAME: &'static str = "MatchCriteriaAP";
    const VALUE_SHAPES: &'static [ValueShape] = SIMPLE_OBJECT;
    const MATCH_TYPES: &'static [&'static str] = &[
        "header",
        "hostname",
        "path",
        "extension",
        "query",
        "cookie",
        "deviceCharacteristics",
        "clientip",
        "continent",
        "countrycode",
        "regioncode",
        "protocol",
        "method",
        "proxy",
    ];
    const MATCH_TYPE_REQUIRED: bool = false;
    const MATCH_TYPE_HINT: &'static str = "'header', 'hostname', 'path', 'extension', 'query', \
        'cookie', 'deviceCharacteristics', 'clientip', 'continent', 'countrycode', 'regioncode', \
        'protocol', 'method', 'proxy'";
}

impl CriteriaScope for As {
    const NAME: &'static str = "MatchCriteriaAS";
    const VALUE_SHAPES: &'static [ValueShape] = ALL_SHAPES;
    const MATCH_TYPES: &'static [&'static str] = &[
        "header",
        "hostname",
        "path",
        "extension",
        "query",
        "range",
        "regex",
        "cookie",
        "deviceCharacteristics",
        "clientip",
        "continent",
        "countrycode",
        "regioncode",
        "protocol",
        "method",
        "proxy",
    ];
    const MATCH_TYPE_REQUIRED: bool = false;
    const MATCH_TYPE_HINT: &'static str = "'header', 'hostname', 'path', 'extension', 'query', \
        'range', 'regex', 'cookie', 'deviceCharacteristics', 'clientip', 'continent', \
        'countrycode', 'regioncode', 'protocol', 'method', 'proxy'";
}

impl CriteriaScope for Pr {
    const NAME: &'static str = "MatchCriteriaPR";
    const VALUE_SHAPES: &'static [ValueShape] = SIMPLE_OBJECT;
    const MATCH_TYPES: &'static [&'static str] = Ap::MATCH_TYPES;
    const MATCH_TYPE_REQUIRED: bool = false;
    const MATCH_TYPE_HINT: &'static str = Ap::MATCH_TYPE_HINT;
}

impl CriteriaScope for Er {
    const NAME: &'static str = "MatchCriteriaER";
    const VALUE_SHAPES: &'static [ValueShape] = SIMPLE_OBJECT;
    const MATCH_TYPES: &'static [&'static str] = &[
        "header",
        "hostname",
        "path",
        "extension",
        "query",
        "regex",
        "cookie",
        "deviceCharacteristics",
        "clientip",
        "continent",
        "countrycode",
        "regioncode",
        "protocol",
        "method",
        "proxy",
    ];
    const MATCH_TYPE_REQUIRED: bool = false;
    const MATCH_TYPE_HINT: &'static str = "'header', 'hostname', 'path', 'extension', 'query', \
        'regex', 'cookie', 'deviceCharacteristics', 'clientip', 'continent', 'countrycode', \
        'regioncode', 'protocol', 'method', 'proxy' or '' (empty)";
}

impl CriteriaScope for Fr {
    const NAME: &'static str = "MatchCriteriaFR";
    const VALUE_SHAPES: &'static [ValueShape] = SIMPLE_OBJECT;
    const MATCH_TYPES: &'static [&'static str] = Er::MATCH_TYPES;
    const MATCH_TYPE_REQUIRED: bool = true;
    const MATCH_TYPE_HINT: &'static str = "'header', 'hostname', 'path', 'extension', 'query', \
        'regex', 'cookie', 'deviceCharacteristics', 'clientip', 'continent', 'countrycode', \
        'regioncode', 'protocol', 'method', 'proxy'";
}

impl CriteriaScope for Rc {
    const NAME: &'static str = "MatchCriteriaRC";
    const VALUE_SHAPES: &'static [ValueShape] = SIMPLE_OBJECT;
    const MATCH_TYPES: &'static [&'static str] = Ap::MATCH_TYPES;
    const MATCH_TYPE_REQUIRED: bool = true;
    const MATCH_TYPE_HINT: &'static str = Ap::MATCH_TYPE_HINT;
}

impl CriteriaScope for Vp {
    const NAME: &'static str = "MatchCriteriaVP";
    const VALUE_SHAPES: &'static [ValueShape] = SIMPLE_OBJECT;
    const MATCH_TYPES: &'static [&'static str] = Ap::MATCH_TYPES;
    const MATCH_TYPE_REQUIRED: bool = false;
    const MATCH_TYPE_HINT: &'static str = Ap::MATCH_TYPE_HINT;
}

/// One condition within a match rule.
///
/// Exactly one of `match_value` / `object_match_value` may be set; validation
/// enforces the pairing. Which object-match-value shapes are legal depends on
/// the cloudlet scope `K`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", bound(serialize = ""))]
pub struct MatchCriteria<K: CriteriaScope> {
    /// What this criterion compares (`header`, `path`, `method`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
    /// Plain string comparison value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_value: Option<String>,
    /// `contains`, `exists` or `equals`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_operator: Option<String>,
    /// Whether the comparison is case sensitive.
    pub case_sensitive: bool,
    /// Inverts the criterion.
    pub negate: bool,
    /// Which request IPs the comparison inspects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_ips: Option<String>,
    /// Structured comparison value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_match_value: Option<ObjectMatchValue>,
    #[serde(skip)]
    _scope: PhantomData<K>,
}

/// Match criteria for the Application Load Balancer (ALB) cloudlet; accepts
/// the `object`, `range` and `simple` value shapes.
pub type MatchCriteriaAlb = MatchCriteria<Alb>;
/// Match criteria for the API Prioritization (AP) cloudlet; accepts the
/// `object` and `simple` value shapes.
pub type MatchCriteriaAp = MatchCriteria<Ap>;
/// Match criteria for the Application Segmentation (AS) cloudlet; accepts the
/// `object`, `range` and `simple` value shapes.
pub type MatchCriteriaAs = MatchCriteria<As>;
/// Match criteria for the Phased Release (PR aka CD) cloudlet; accepts the
/// `object` and `simple` value shapes.
pub type MatchCriteriaPr = MatchCriteria<Pr>;
/// Match criteria for the Edge Redirector (ER) cloudlet; accepts the `object`
/// and `simple` value shapes.
pub type MatchCriteriaEr = MatchCriteria<Er>;
/// Match criteria for the Forward Rewrite (FR) cloudlet; accepts the `object`
/// and `simple` value shapes.
pub type MatchCriteriaFr = MatchCriteria<Fr>;
/// Match criteria for the Request Control (RC aka IG) cloudlet; accepts the
/// `object` and `simple` value shapes.
pub type MatchCriteriaRc = MatchCriteria<Rc>;
/// Match criteria for the Visitor Prioritization (VP) cloudlet; accepts the
/// `object` and `simple` value shapes.
pub type MatchCriteriaVp = MatchCriteria<Vp>;

impl<K: CriteriaScope> MatchCriteria<K> {
    /// Creates an empty criterion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `matchType`.
    #[must_use]
    pub fn with_match_type(mut self, value: impl Into<String>) -> Self {
        self.match_type = Some(value.into());
        self
    }

    /// Sets the plain `matchValue`.
    #[must_use]
    pub fn with_match_value(mut self, value: impl Into<String>) -> Self {
        self.match_value = Some(value.into());
        self
    }

    /// Sets `matchOperator`.
    #[must_use]
    pub fn with_match_operator(mut self, value: impl Into<String>) -> Self {
        self.match_operator = Some(value.into());
        self
    }

    /// Sets `checkIPs`.
    #[must_use]
    pub fn with_check_ips(mut self, value: impl Into<String>) -> Self {
        self.check_ips = Some(value.into());
        self
    }

    /// Sets the structured `objectMatchValue`.
    #[must_use]
    pub fn with_object_match_value(mut self, value: ObjectMatchValue) -> Self {
        self.object_match_value = Some(value);
        self
    }

    /// Sets the `caseSensitive` flag.
    #[must_use]
    pub const fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// Sets the `negate` flag.
    #[must_use]
    pub const fn negate(mut self, yes: bool) -> Self {
        self.negate = yes;
        self
    }
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawCriteria {
    match_type: Option<String>,
    match_value: Option<String>,
    match_operator: Option<String>,
    case_sensitive: bool,
    negate: bool,
    check_ips: Option<String>,
    object_match_value: Option<Value>,
}

impl<'de, K: CriteriaScope> Deserialize<'de> for MatchCriteria<K> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawCriteria::deserialize(deserializer)
            .map_err(|err| D::Error::custom(format!("unmarshalling {}: {err}", K::NAME)))?;

        let object_match_value = match raw.object_match_value {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                object_match_value::resolve(value, K::VALUE_SHAPES)
                    .map_err(|reason| D::Error::custom(format!("unmarshalling {}: {reason}", K::NAME)))?,
            ),
        };

        Ok(Self {
            match_type: raw.match_type,
            match_value: raw.match_value,
            match_operator: raw.match_operator,
            case_sensitive: raw.case_sensitive,
            negate: raw.negate,
            check_ips: raw.check_ips,
            object_match_value,
            _scope: PhantomData,
        })
    }
}

const fn shape_hint(shapes: &[ValueShape]) -> &'static str {
    if shapes.len() == 3 {
        "'simple', 'range' or 'object'"
    } else {
        "'simple' or 'object'"
    }
}

impl<K: CriteriaScope> Validate for MatchCriteria<K> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let match_type = self.match_type.as_deref().unwrap_or_default();
        let match_type_violation = if K::MATCH_TYPE_REQUIRED && match_type.is_empty() {
            Some("cannot be blank".to_string())
        } else if !match_type.is_empty() && !K::MATCH_TYPES.contains(&match_type) {
            Some(format!(
                "value '{match_type}' is invalid. Must be one of: {}",
                K::MATCH_TYPE_HINT
            ))
        } else {
            None
        };
        errors.check("MatchType", match_type_violation);

        let value_blank = self.match_value.as_deref().map_or(true, str::is_empty);
        let object_set = self.object_match_value.is_some();
        errors.check(
            "MatchValue",
            validate::length(self.match_value.as_deref(), 1, 8192)
                .or_else(|| {
                    (!object_set && value_blank)
                        .then(|| "cannot be blank when ObjectMatchValue is blank".to_string())
                })
                .or_else(|| {
                    (object_set && !value_blank)
                        .then(|| "must be blank when ObjectMatchValue is set".to_string())
                }),
        );

        let operator = self.match_operator.as_deref().unwrap_or_default();
        errors.check(
            "MatchOperator",
            (!operator.is_empty()
                && ![
                    MATCH_OPERATOR_CONTAINS,
                    MATCH_OPERATOR_EXISTS,
                    MATCH_OPERATOR_EQUALS,
                ]
                .contains(&operator))
            .then(|| {
                format!(
                    "value '{operator}' is invalid. Must be one of: 'contains', 'exists', \
                     'equals' or '' (empty)"
                )
            }),
        );

        let check_ips = self.check_ips.as_deref().unwrap_or_default();
        errors.check(
            "CheckIPs",
            (!check_ips.is_empty()
                && ![
                    CHECK_IPS_CONNECTING_IP,
                    CHECK_IPS_XFF_HEADERS,
                    CHECK_IPS_CONNECTING_IP_XFF_HEADERS,
                ]
                .contains(&check_ips))
            .then(|| {
                format!(
                    "value '{check_ips}' is invalid. Must be one of: 'CONNECTING_IP', \
                     'XFF_HEADERS', 'CONNECTING_IP XFF_HEADERS' or '' (empty)"
                )
            }),
        );

        let object_violation = if !object_set && value_blank {
            Some("cannot be blank when MatchValue is blank".to_string())
        } else if object_set && !value_blank {
            Some("must be blank when MatchValue is set".to_string())
        } else {
            self.object_match_value
                .as_ref()
                .map(ObjectMatchValue::shape)
                .filter(|shape| !K::VALUE_SHAPES.contains(shape))
                .map(|shape| {
                    format!(
                        "type '{}' is invalid. Must be one of: {}",
                        shape.tag(),
                        shape_hint(K::VALUE_SHAPES)
                    )
                })
        };
        errors.check("ObjectMatchValue", object_violation);

        errors.into_result()
    }
}
