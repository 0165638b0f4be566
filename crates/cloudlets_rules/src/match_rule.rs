//! Match rules, one variant per cloudlet type.
//!
//! A policy version carries an ordered array of rules whose concrete shape is
//! discriminated by the `type` field of each array element. Decoding is a
//! two-level tagged-union resolution: the outer tag selects the rule variant,
//! then each criterion's `objectMatchValue` tag selects the value shape (see
//! [`crate::criteria`]).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::criteria::{
    CriteriaScope, MatchCriteria, MatchCriteriaAlb, MatchCriteriaAp, MatchCriteriaAs,
    MatchCriteriaEr, MatchCriteriaFr, MatchCriteriaPr, MatchCriteriaRc, MatchCriteriaVp,
};
use crate::validate::{self, Validate, ValidationErrors};

/// `allowDeny` value admitting the request.
pub const ALLOW_DENY_ALLOW: &str = "allow";
/// `allowDeny` value denying the request.
pub const ALLOW_DENY_DENY: &str = "deny";
/// `allowDeny` value denying the request with a branded response.
pub const ALLOW_DENY_DENY_BRANDED: &str = "denybranded";

/// The only published match rule format.
pub const MATCH_RULE_FORMAT_1_0: &str = "1.0";

/// An Application Load Balancer (ALB) match rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchRuleAlb {
    /// Rule name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Wire tag; must be `albMatchRule`.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub rule_type: String,
    /// Start of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub start: i64,
    /// End of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub end: i64,
    /// Rule id assigned by the service.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub id: i64,
    /// Ordered match criteria.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub matches: Vec<MatchCriteriaAlb>,
    /// URL the rule matches on, shorthand for a path criterion.
    #[serde(rename = "matchURL", skip_serializing_if = "Option::is_none")]
    pub match_url: Option<String>,
    /// Whether the rule applies unconditionally.
    pub matches_always: bool,
    /// Where matching requests are forwarded.
    #[serde(deserialize_with = "crate::ser::null_as_default")]
    pub forward_settings: ForwardSettingsAlb,
    /// Disabled rules are skipped during evaluation.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub disabled: bool,
}

/// Forward settings for an ALB rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForwardSettingsAlb {
    /// Conditional origin the request is forwarded to.
    pub origin_id: String,
}

/// An API Prioritization (AP) match rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchRuleAp {
    /// Rule name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Wire tag; must be `apMatchRule`.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub rule_type: String,
    /// Start of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub start: i64,
    /// End of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub end: i64,
    /// Rule id assigned by the service.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub id: i64,
    /// Ordered match criteria.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub matches: Vec<MatchCriteriaAp>,
    /// URL the rule matches on.
    #[serde(rename = "matchURL", skip_serializing_if = "Option::is_none")]
    pub match_url: Option<String>,
    /// Share of matching requests served at normal priority, in percent.
    /// `-1` serves the alternate response to everyone.
    pub pass_through_percent: Option<f64>,
    /// Disabled rules are skipped during evaluation.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub disabled: bool,
}

/// An Application Segmentation (AS) match rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchRuleAs {
    /// Rule name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Wire tag; must be `asMatchRule`.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub rule_type: String,
    /// Start of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub start: i64,
    /// End of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub end: i64,
    /// Rule id assigned by the service.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub id: i64,
    /// Ordered match criteria.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub matches: Vec<MatchCriteriaAs>,
    /// URL the rule matches on.
    #[serde(rename = "matchURL", skip_serializing_if = "Option::is_none")]
    pub match_url: Option<String>,
    /// Where matching requests are forwarded.
    #[serde(deserialize_with = "crate::ser::null_as_default")]
    pub forward_settings: ForwardSettingsAs,
    /// Disabled rules are skipped during evaluation.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub disabled: bool,
}

/// Forward settings for an AS rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForwardSettingsAs {
    /// Path and query string the request is rewritten to.
    #[serde(rename = "pathAndQS", skip_serializing_if = "Option::is_none")]
    pub path_and_qs: Option<String>,
    /// Whether the incoming query string is kept on the rewrite.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub use_incoming_query_string: bool,
    /// Origin the request is forwarded to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,
}

/// A Phased Release (PR aka CD) match rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchRulePr {
    /// Rule name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Wire tag; must be `cdMatchRule`.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub rule_type: String,
    /// Start of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub start: i64,
    /// End of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub end: i64,
    /// Rule id assigned by the service.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub id: i64,
    /// Ordered match criteria.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub matches: Vec<MatchCriteriaPr>,
    /// URL the rule matches on.
    #[serde(rename = "matchURL", skip_serializing_if = "Option::is_none")]
    pub match_url: Option<String>,
    /// Where matching requests are forwarded and at which rollout percentage.
    #[serde(deserialize_with = "crate::ser::null_as_default")]
    pub forward_settings: ForwardSettingsPr,
    /// Disabled rules are skipped during evaluation.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub disabled: bool,
    /// Whether the rule applies unconditionally.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub matches_always: bool,
}

/// Forward settings for a PR rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForwardSettingsPr {
    /// Origin the request is forwarded to.
    pub origin_id: String,
    /// Share of matching requests sent to the origin, in percent (1-100).
    pub percent: i64,
}

/// An Edge Redirector (ER) match rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchRuleEr {
    /// Rule name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Wire tag; must be `erMatchRule`.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub rule_type: String,
    /// Start of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub start: i64,
    /// End of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub end: i64,
    /// Rule id assigned by the service.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub id: i64,
    /// Ordered match criteria.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub matches: Vec<MatchCriteriaEr>,
    /// How the redirect rewrites the URL: `none`, `copy_scheme_hostname` or
    /// `relative_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_relative_url: Option<String>,
    /// Redirect status code: 301, 302, 303, 307 or 308.
    pub status_code: i64,
    /// Where matching requests are redirected to.
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
    /// URL the rule matches on.
    #[serde(rename = "matchURL", skip_serializing_if = "Option::is_none")]
    pub match_url: Option<String>,
    /// Whether the incoming query string is kept on the redirect.
    pub use_incoming_query_string: bool,
    /// Whether the incoming scheme and host are kept on the redirect.
    pub use_incoming_scheme_and_host: bool,
    /// Disabled rules are skipped during evaluation.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub disabled: bool,
}

/// A Forward Rewrite (FR) match rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchRuleFr {
    /// Rule name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Wire tag; must be `frMatchRule`.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub rule_type: String,
    /// Start of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub start: i64,
    /// End of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub end: i64,
    /// Rule id assigned by the service.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub id: i64,
    /// Ordered match criteria.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub matches: Vec<MatchCriteriaFr>,
    /// URL the rule matches on.
    #[serde(rename = "matchURL", skip_serializing_if = "Option::is_none")]
    pub match_url: Option<String>,
    /// How matching requests are rewritten.
    #[serde(deserialize_with = "crate::ser::null_as_default")]
    pub forward_settings: ForwardSettingsFr,
    /// Disabled rules are skipped during evaluation.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub disabled: bool,
}

/// Forward settings for an FR rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForwardSettingsFr {
    /// Path and query string the request is rewritten to.
    #[serde(rename = "pathAndQS", skip_serializing_if = "Option::is_none")]
    pub path_and_qs: Option<String>,
    /// Whether the incoming query string is kept on the rewrite.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub use_incoming_query_string: bool,
    /// Origin the request is forwarded to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,
}

/// A Request Control (RC aka IG) match rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchRuleRc {
    /// Rule name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Wire tag; must be `igMatchRule`.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub rule_type: String,
    /// Start of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub start: i64,
    /// End of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub end: i64,
    /// Rule id assigned by the service.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub id: i64,
    /// Ordered match criteria; must be empty when `matches_always` is set.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub matches: Vec<MatchCriteriaRc>,
    /// Whether the rule applies unconditionally.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub matches_always: bool,
    /// Decision for matching requests: `allow`, `deny` or `denybranded`.
    pub allow_deny: String,
    /// Disabled rules are skipped during evaluation.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub disabled: bool,
}

/// A Visitor Prioritization (VP) match rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchRuleVp {
    /// Rule name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Wire tag; must be `vpMatchRule`.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub rule_type: String,
    /// Start of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub start: i64,
    /// End of the activation window, seconds since epoch.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub end: i64,
    /// Rule id assigned by the service.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub id: i64,
    /// Ordered match criteria.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub matches: Vec<MatchCriteriaVp>,
    /// URL the rule matches on.
    #[serde(rename = "matchURL", skip_serializing_if = "Option::is_none")]
    pub match_url: Option<String>,
    /// Share of matching visitors sent straight to the site, in percent.
    /// `-1` sends everyone to the waiting room.
    pub pass_through_percent: Option<f64>,
    /// Disabled rules are skipped during evaluation.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub disabled: bool,
}

impl MatchRuleAlb {
    /// Wire `type` tag for ALB rules.
    pub const TYPE: &'static str = "albMatchRule";

    /// Creates an empty rule with the `type` tag preset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rule_type: Self::TYPE.to_string(),
            ..Self::default()
        }
    }
}

impl MatchRuleAp {
    /// Wire `type` tag for AP rules.
    pub const TYPE: &'static str = "apMatchRule";

    /// Creates an empty rule with the `type` tag preset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rule_type: Self::TYPE.to_string(),
            ..Self::default()
        }
    }
}

impl MatchRuleAs {
    /// Wire `type` tag for AS rules.
    pub const TYPE: &'static str = "asMatchRule";

    /// Creates an empty rule with the `type` tag preset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rule_type: Self::TYPE.to_string(),
            ..Self::default()
        }
    }
}

impl MatchRulePr {
    /// Wire `type` tag for PR rules.
    pub const TYPE: &'static str = "cdMatchRule";

    /// Creates an empty rule with the `type` tag preset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rule_type: Self::TYPE.to_string(),
            ..Self::default()
        }
    }
}

impl MatchRuleEr {
    /// Wire `type` tag for ER rules.
    pub const TYPE: &'static str = "erMatchRule";

    /// Creates an empty rule with the `type` tag preset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rule_type: Self::TYPE.to_string(),
            ..Self::default()
        }
    }
}

impl MatchRuleFr {
    /// Wire `type` tag for FR rules.
    pub const TYPE: &'static str = "frMatchRule";

    /// Creates an empty rule with the `type` tag preset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rule_type: Self::TYPE.to_string(),
            ..Self::default()
        }
    }
}

impl MatchRuleRc {
    /// Wire `type` tag for RC rules.
    pub const TYPE: &'static str = "igMatchRule";

    /// Creates an empty rule with the `type` tag preset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rule_type: Self::TYPE.to_string(),
            ..Self::default()
        }
    }
}

impl MatchRuleVp {
    /// Wire `type` tag for VP rules.
    pub const TYPE: &'static str = "vpMatchRule";

    /// Creates an empty rule with the `type` tag preset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rule_type: Self::TYPE.to_string(),
            ..Self::default()
        }
    }
}

/// A single match rule, resolved to its cloudlet-specific variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatchRule {
    /// Application Load Balancer rule (`albMatchRule`).
    Alb(MatchRuleAlb),
    /// API Prioritization rule (`apMatchRule`).
    Ap(MatchRuleAp),
    /// Application Segmentation rule (`asMatchRule`).
    As(MatchRuleAs),
    /// Phased Release rule (`cdMatchRule`).
    Pr(MatchRulePr),
    /// Edge Redirector rule (`erMatchRule`).
    Er(MatchRuleEr),
    /// Forward Rewrite rule (`frMatchRule`).
    Fr(MatchRuleFr),
    /// Request Control rule (`igMatchRule`).
    Rc(MatchRuleRc),
    /// Visitor Prioritization rule (`vpMatchRule`).
    Vp(MatchRuleVp),
}

impl MatchRule {
    /// The wire `type` tag of this rule's cloudlet.
    #[must_use]
    pub const fn cloudlet_type(&self) -> &'static str {
        match self {
            Self::Alb(_) => MatchRuleAlb::TYPE,
            Self::Ap(_) => MatchRuleAp::TYPE,
            Self::As(_) => MatchRuleAs::TYPE,
            Self::Pr(_) => MatchRulePr::TYPE,
            Self::Er(_) => MatchRuleEr::TYPE,
            Self::Fr(_) => MatchRuleFr::TYPE,
            Self::Rc(_) => MatchRuleRc::TYPE,
            Self::Vp(_) => MatchRuleVp::TYPE,
        }
    }

    /// The rule's name, when set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Alb(rule) => rule.name.as_deref(),
            Self::Ap(rule) => rule.name.as_deref(),
            Self::As(rule) => rule.name.as_deref(),
            Self::Pr(rule) => rule.name.as_deref(),
            Self::Er(rule) => rule.name.as_deref(),
            Self::Fr(rule) => rule.name.as_deref(),
            Self::Rc(rule) => rule.name.as_deref(),
            Self::Vp(rule) => rule.name.as_deref(),
        }
    }

    /// Whether the rule is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        match self {
            Self::Alb(rule) => rule.disabled,
            Self::Ap(rule) => rule.disabled,
            Self::As(rule) => rule.disabled,
            Self::Pr(rule) => rule.disabled,
            Self::Er(rule) => rule.disabled,
            Self::Fr(rule) => rule.disabled,
            Self::Rc(rule) => rule.disabled,
            Self::Vp(rule) => rule.disabled,
        }
    }

    /// Number of match criteria carried by the rule.
    #[must_use]
    pub fn criteria_count(&self) -> usize {
        match self {
            Self::Alb(rule) => rule.matches.len(),
            Self::Ap(rule) => rule.matches.len(),
            Self::As(rule) => rule.matches.len(),
            Self::Pr(rule) => rule.matches.len(),
            Self::Er(rule) => rule.matches.len(),
            Self::Fr(rule) => rule.matches.len(),
            Self::Rc(rule) => rule.matches.len(),
            Self::Vp(rule) => rule.matches.len(),
        }
    }
}

type RuleDecoder = fn(Value) -> serde_json::Result<MatchRule>;

/// Dispatch table mapping the `type` tag to its typed decoder. Data-driven so
/// that an additional cloudlet type is a one-line change.
static RULE_HANDLERS: &[(&str, RuleDecoder)] = &[
    (MatchRuleAlb::TYPE, |raw| {
        serde_json::from_value::<MatchRuleAlb>(raw).map(MatchRule::Alb)
    }),
    (MatchRuleAp::TYPE, |raw| {
        serde_json::from_value::<MatchRuleAp>(raw).map(MatchRule::Ap)
    }),
    (MatchRuleAs::TYPE, |raw| {
        serde_json::from_value::<MatchRuleAs>(raw).map(MatchRule::As)
    }),
    (MatchRulePr::TYPE, |raw| {
        serde_json::from_value::<MatchRulePr>(raw).map(MatchRule::Pr)
    }),
    (MatchRuleEr::TYPE, |raw| {
        serde_json::from_value::<MatchRuleEr>(raw).map(MatchRule::Er)
    }),
    (MatchRuleFr::TYPE, |raw| {
        serde_json::from_value::<MatchRuleFr>(raw).map(MatchRule::Fr)
    }),
    (MatchRuleRc::TYPE, |raw| {
        serde_json::from_value::<MatchRuleRc>(raw).map(MatchRule::Rc)
    }),
    (MatchRuleVp::TYPE, |raw| {
        serde_json::from_value::<MatchRuleVp>(raw).map(MatchRule::Vp)
    }),
];

/// Resolves one decoded rule entry into its concrete variant. Returns the
/// bare failure message; callers add the `unmarshalling MatchRules` context.
fn decode_rule(entry: Map<String, Value>) -> Result<MatchRule, String> {
    let tag_value = entry
        .get("type")
        .ok_or_else(|| "match rule entry should contain 'type' field".to_string())?;
    let tag = tag_value
        .as_str()
        .ok_or_else(|| "'type' field on match rule entry should be a string".to_string())?;
    let decode = RULE_HANDLERS
        .iter()
        .find_map(|&(candidate, decode)| (candidate == tag).then_some(decode))
        .ok_or_else(|| format!("unsupported match rule type: {tag}"))?;
    decode(Value::Object(entry)).map_err(|err| err.to_string())
}

impl<'de> Deserialize<'de> for MatchRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entry = Map::<String, Value>::deserialize(deserializer)
            .map_err(|err| D::Error::custom(format!("unmarshalling MatchRules: {err}")))?;
        decode_rule(entry)
            .map_err(|reason| D::Error::custom(format!("unmarshalling MatchRules: {reason}")))
    }
}

/// An ordered, heterogeneous collection of match rules.
///
/// Array order is the service's evaluation order and survives decode/encode
/// round trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchRules(pub Vec<MatchRule>);

impl<'de> Deserialize<'de> for MatchRules {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<Map<String, Value>>::deserialize(deserializer)
            .map_err(|err| D::Error::custom(format!("unmarshalling MatchRules: {err}")))?;
        let mut rules = Vec::with_capacity(entries.len());
        for entry in entries {
            let rule = decode_rule(entry)
                .map_err(|reason| D::Error::custom(format!("unmarshalling MatchRules: {reason}")))?;
            rules.push(rule);
        }
        Ok(Self(rules))
    }
}

impl std::ops::Deref for MatchRules {
    type Target = Vec<MatchRule>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for MatchRules {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<MatchRule>> for MatchRules {
    fn from(rules: Vec<MatchRule>) -> Self {
        Self(rules)
    }
}

impl FromIterator<MatchRule> for MatchRules {
    fn from_iter<I: IntoIterator<Item = MatchRule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for MatchRules {
    type Item = MatchRule;
    type IntoIter = std::vec::IntoIter<MatchRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatchRules {
    type Item = &'a MatchRule;
    type IntoIter = std::slice::Iter<'a, MatchRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn type_violation(value: &str, expected: &str) -> Option<String> {
    if value.is_empty() {
        return Some("cannot be blank".to_string());
    }
    (value != expected).then(|| format!("value '{value}' is invalid. Must be: '{expected}'"))
}

fn pass_through_percent_violation(value: Option<f64>) -> Option<String> {
    let Some(percent) = value else {
        return Some("cannot be blank".to_string());
    };
    if percent < -1.0 {
        return Some("must be no less than -1".to_string());
    }
    if percent > 100.0 {
        return Some("must be no greater than 100".to_string());
    }
    None
}

fn check_common(
    errors: &mut ValidationErrors,
    rule_type: &str,
    expected: &str,
    name: Option<&str>,
    start: i64,
    end: i64,
    match_url: Option<&str>,
) {
    errors.check("Type", type_violation(rule_type, expected));
    errors.check("Name", validate::length(name, 0, 8192));
    errors.check("Start", validate::at_least(start, 0));
    errors.check("End", validate::at_least(end, 0));
    errors.check("MatchURL", validate::length(match_url, 0, 8192));
}

fn check_matches<K: CriteriaScope>(errors: &mut ValidationErrors, matches: &[MatchCriteria<K>]) {
    for (index, criteria) in matches.iter().enumerate() {
        errors.merge(&format!("Matches[{index}]"), criteria.validate());
    }
}

impl Validate for MatchRuleAlb {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(
            &mut errors,
            &self.rule_type,
            Self::TYPE,
            self.name.as_deref(),
            self.start,
            self.end,
            self.match_url.as_deref(),
        );
        errors.check(
            "ForwardSettings.OriginID",
            validate::not_blank(Some(&self.forward_settings.origin_id))
                .or_else(|| validate::length(Some(&self.forward_settings.origin_id), 0, 8192)),
        );
        check_matches(&mut errors, &self.matches);
        errors.into_result()
    }
}

impl Validate for MatchRuleAp {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(
            &mut errors,
            &self.rule_type,
            Self::TYPE,
            self.name.as_deref(),
            self.start,
            self.end,
            self.match_url.as_deref(),
        );
        errors.check(
            "PassThroughPercent",
            pass_through_percent_violation(self.pass_through_percent),
        );
        check_matches(&mut errors, &self.matches);
        errors.into_result()
    }
}

impl Validate for MatchRuleAs {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(
            &mut errors,
            &self.rule_type,
            Self::TYPE,
            self.name.as_deref(),
            self.start,
            self.end,
            self.match_url.as_deref(),
        );
        if self.forward_settings == ForwardSettingsAs::default() {
            errors.check("ForwardSettings", Some("cannot be blank".to_string()));
        }
        errors.check(
            "ForwardSettings.PathAndQS",
            validate::length(self.forward_settings.path_and_qs.as_deref(), 1, 8192),
        );
        errors.check(
            "ForwardSettings.OriginID",
            validate::length(self.forward_settings.origin_id.as_deref(), 0, 8192),
        );
        check_matches(&mut errors, &self.matches);
        errors.into_result()
    }
}

impl Validate for MatchRulePr {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(
            &mut errors,
            &self.rule_type,
            Self::TYPE,
            self.name.as_deref(),
            self.start,
            self.end,
            self.match_url.as_deref(),
        );
        if self.forward_settings == ForwardSettingsPr::default() {
            errors.check("ForwardSettings", Some("cannot be blank".to_string()));
        }
        errors.check(
            "ForwardSettings.OriginID",
            validate::not_blank(Some(&self.forward_settings.origin_id))
                .or_else(|| validate::length(Some(&self.forward_settings.origin_id), 0, 8192)),
        );
        errors.check(
            "ForwardSettings.Percent",
            validate::nonzero(self.forward_settings.percent)
                .or_else(|| validate::at_least(self.forward_settings.percent, 1))
                .or_else(|| validate::at_most(self.forward_settings.percent, 100)),
        );
        check_matches(&mut errors, &self.matches);
        errors.into_result()
    }
}

impl Validate for MatchRuleEr {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(
            &mut errors,
            &self.rule_type,
            Self::TYPE,
            self.name.as_deref(),
            self.start,
            self.end,
            self.match_url.as_deref(),
        );
        errors.check(
            "RedirectURL",
            validate::not_blank(Some(&self.redirect_url))
                .or_else(|| validate::length(Some(&self.redirect_url), 1, 8192)),
        );
        let use_relative_url = self.use_relative_url.as_deref().unwrap_or_default();
        errors.check(
            "UseRelativeURL",
            (!use_relative_url.is_empty()
                && !["none", "copy_scheme_hostname", "relative_url"].contains(&use_relative_url))
            .then(|| {
                format!(
                    "value '{use_relative_url}' is invalid. Must be one of: 'none', \
                     'copy_scheme_hostname', 'relative_url' or '' (empty)"
                )
            }),
        );
        errors.check(
            "StatusCode",
            validate::nonzero(self.status_code).or_else(|| {
                (![301, 302, 303, 307, 308].contains(&self.status_code)).then(|| {
                    format!(
                        "value '{}' is invalid. Must be one of: 301, 302, 303, 307 or 308",
                        self.status_code
                    )
                })
            }),
        );
        check_matches(&mut errors, &self.matches);
        errors.into_result()
    }
}

impl Validate for MatchRuleFr {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(
            &mut errors,
            &self.rule_type,
            Self::TYPE,
            self.name.as_deref(),
            self.start,
            self.end,
            self.match_url.as_deref(),
        );
        if self.forward_settings == ForwardSettingsFr::default() {
            errors.check("ForwardSettings", Some("cannot be blank".to_string()));
        }
        errors.check(
            "ForwardSettings.PathAndQS",
            validate::length(self.forward_settings.path_and_qs.as_deref(), 1, 8192),
        );
        errors.check(
            "ForwardSettings.OriginID",
            validate::length(self.forward_settings.origin_id.as_deref(), 0, 8192),
        );
        check_matches(&mut errors, &self.matches);
        errors.into_result()
    }
}

impl Validate for MatchRuleRc {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(
            &mut errors,
            &self.rule_type,
            Self::TYPE,
            self.name.as_deref(),
            self.start,
            self.end,
            None,
        );
        errors.check(
            "AllowDeny",
            validate::not_blank(Some(&self.allow_deny)).or_else(|| {
                (![ALLOW_DENY_ALLOW, ALLOW_DENY_DENY, ALLOW_DENY_DENY_BRANDED]
                    .contains(&self.allow_deny.as_str()))
                .then(|| {
                    format!(
                        "value '{}' is invalid. Must be one of: 'allow', 'deny' or 'denybranded'",
                        self.allow_deny
                    )
                })
            }),
        );
        if self.matches_always && !self.matches.is_empty() {
            errors.check(
                "Matches",
                Some("must be blank when 'matchesAlways' is set".to_string()),
            );
        } else {
            check_matches(&mut errors, &self.matches);
        }
        errors.into_result()
    }
}

impl Validate for MatchRuleVp {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(
            &mut errors,
            &self.rule_type,
            Self::TYPE,
            self.name.as_deref(),
            self.start,
            self.end,
            self.match_url.as_deref(),
        );
        errors.check(
            "PassThroughPercent",
            pass_through_percent_violation(self.pass_through_percent),
        );
        check_matches(&mut errors, &self.matches);
        errors.into_result()
    }
}

impl Validate for MatchRule {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::Alb(rule) => rule.validate(),
            Self::Ap(rule) => rule.validate(),
            Self::As(rule) => rule.validate(),
            Self::Pr(rule) => rule.validate(),
            Self::Er(rule) => rule.validate(),
            Self::Fr(rule) => rule.validate(),
            Self::Rc(rule) => rule.validate(),
            Self::Vp(rule) => rule.validate(),
        }
    }
}

impl Validate for MatchRules {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.0.len() > 5000 {
            errors.check(
                "MatchRules",
                Some("the length must be no more than 5000".to_string()),
            );
        }
        for (index, rule) in self.0.iter().enumerate() {
            errors.merge(&format!("MatchRules[{index}]"), rule.validate());
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::MatchCriteriaAlb;
    use crate::object_match_value::{
        ObjectMatchValue, ObjectMatchValueRange, ObjectMatchValueSimple,
    };
    use serde_json::json;

    fn decode(raw: Value) -> Result<MatchRules, serde_json::Error> {
        serde_json::from_value(raw)
    }

    #[test]
    fn decodes_alb_rule_with_all_value_shapes() {
        let rules = decode(json!([
            {
                "type": "albMatchRule",
                "end": 0,
                "forwardSettings": {"originId": "alb_test_krk_dc1_only"},
                "id": 0,
                "matchURL": null,
                "matches": [
                    {
                        "caseSensitive": false,
                        "matchOperator": "equals",
                        "matchType": "protocol",
                        "matchValue": "https",
                        "negate": false
                    },
                    {
                        "caseSensitive": false,
                        "matchOperator": "equals",
                        "matchType": "range",
                        "negate": false,
                        "objectMatchValue": {"type": "range", "value": [1, 50]}
                    },
                    {
                        "caseSensitive": false,
                        "matchOperator": "equals",
                        "matchType": "method",
                        "negate": false,
                        "objectMatchValue": {"type": "simple", "value": ["GET"]}
                    }
                ],
                "name": "Rule3",
                "start": 0
            }
        ]))
        .unwrap();

        assert_eq!(rules.len(), 1);
        let MatchRule::Alb(rule) = &rules[0] else {
            panic!("expected an ALB rule");
        };
        assert_eq!(rule.name.as_deref(), Some("Rule3"));
        assert_eq!(rule.forward_settings.origin_id, "alb_test_krk_dc1_only");
        assert_eq!(rule.match_url, None);
        assert_eq!(rule.matches.len(), 3);
        assert_eq!(rule.matches[0].match_value.as_deref(), Some("https"));
        assert!(rule.matches[0].object_match_value.is_none());
        assert_eq!(
            rule.matches[1].object_match_value,
            Some(ObjectMatchValue::Range(ObjectMatchValueRange {
                value_type: "range".to_string(),
                value: vec![1, 50],
            }))
        );
        assert_eq!(
            rule.matches[2].object_match_value,
            Some(ObjectMatchValue::Simple(ObjectMatchValueSimple {
                value_type: "simple".to_string(),
                value: vec!["GET".to_string()],
            }))
        );
    }

    #[test]
    fn decodes_every_rule_kind() {
        let rules = decode(json!([
            {"type": "albMatchRule", "forwardSettings": {"originId": "alb1"}},
            {"type": "apMatchRule", "passThroughPercent": 50.0},
            {"type": "asMatchRule", "forwardSettings": {"originId": "origin"}},
            {"type": "cdMatchRule", "forwardSettings": {"originId": "origin", "percent": 10}},
            {"type": "erMatchRule", "redirectURL": "/new", "statusCode": 301},
            {"type": "frMatchRule", "forwardSettings": {"pathAndQS": "/next"}},
            {"type": "igMatchRule", "allowDeny": "allow", "matchesAlways": true},
            {"type": "vpMatchRule", "passThroughPercent": -1.0}
        ]))
        .unwrap();

        let tags: Vec<&str> = rules.iter().map(MatchRule::cloudlet_type).collect();
        assert_eq!(
            tags,
            vec![
                "albMatchRule",
                "apMatchRule",
                "asMatchRule",
                "cdMatchRule",
                "erMatchRule",
                "frMatchRule",
                "igMatchRule",
                "vpMatchRule"
            ]
        );
    }

    #[test]
    fn element_order_is_preserved() {
        let rules = decode(json!([
            {"type": "erMatchRule", "name": "first", "redirectURL": "/a", "statusCode": 301},
            {"type": "erMatchRule", "name": "second", "redirectURL": "/b", "statusCode": 302},
            {"type": "igMatchRule", "name": "third", "allowDeny": "deny"}
        ]))
        .unwrap();
        let names: Vec<_> = rules.iter().map(|rule| rule.name().unwrap()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn missing_type_field_is_rejected() {
        let err = decode(json!([{"name": "rule"}])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unmarshalling MatchRules: match rule entry should contain 'type' field"
        );
    }

    #[test]
    fn non_string_type_field_is_rejected() {
        let err = decode(json!([{"type": 7}])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unmarshalling MatchRules: 'type' field on match rule entry should be a string"
        );
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let err = decode(json!([{"type": "abcMatchRule"}])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unmarshalling MatchRules: unsupported match rule type: abcMatchRule"
        );
    }

    #[test]
    fn inner_criteria_error_keeps_both_contexts() {
        let err = decode(json!([
            {
                "type": "albMatchRule",
                "matches": [
                    {"matchType": "hostname", "objectMatchValue": {"type": "foo"}}
                ]
            }
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unmarshalling MatchRules: unmarshalling MatchCriteriaALB: objectMatchValue has \
             unexpected type: 'foo'"
        );
    }

    #[test]
    fn range_value_rejected_for_simple_object_cloudlets() {
        for tag in ["apMatchRule", "cdMatchRule", "erMatchRule", "frMatchRule", "igMatchRule", "vpMatchRule"] {
            let err = decode(json!([
                {"type": tag, "matches": [{"objectMatchValue": {"type": "range", "value": [1, 2]}}]}
            ]))
            .unwrap_err();
            assert!(
                err.to_string()
                    .ends_with("objectMatchValue has unexpected type: 'range'"),
                "unexpected error for {tag}: {err}"
            );
        }

        for tag in ["albMatchRule", "asMatchRule"] {
            assert!(
                decode(json!([
                    {"type": tag, "matches": [{"objectMatchValue": {"type": "range", "value": [1, 2]}}]}
                ]))
                .is_ok(),
                "range should decode for {tag}"
            );
        }
    }

    #[test]
    fn single_rule_decodes_through_the_same_dispatch() {
        let rule: MatchRule = serde_json::from_value(json!({
            "type": "erMatchRule",
            "redirectURL": "/new",
            "statusCode": 301
        }))
        .unwrap();
        assert_eq!(rule.cloudlet_type(), "erMatchRule");

        let err = serde_json::from_value::<MatchRule>(json!({"type": "nope"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unmarshalling MatchRules: unsupported match rule type: nope"
        );
    }

    #[test]
    fn round_trip_preserves_all_rule_kinds() {
        let original = decode(json!([
            {
                "type": "albMatchRule",
                "name": "alb",
                "start": 10,
                "end": 20,
                "matchesAlways": true,
                "forwardSettings": {"originId": "alb1"},
                "matches": [
                    {"matchType": "range", "matchOperator": "equals",
                     "objectMatchValue": {"type": "range", "value": [1, 50]}}
                ]
            },
            {"type": "apMatchRule", "passThroughPercent": 50.5},
            {
                "type": "asMatchRule",
                "forwardSettings": {"pathAndQS": "/p", "originId": "o"},
                "matches": [
                    {"matchType": "method", "matchOperator": "equals",
                     "objectMatchValue": {"type": "simple", "value": ["GET", "POST"]}}
                ]
            },
            {"type": "cdMatchRule", "forwardSettings": {"originId": "o", "percent": 99}},
            {
                "type": "erMatchRule",
                "redirectURL": "/r",
                "statusCode": 307,
                "useRelativeUrl": "copy_scheme_hostname",
                "useIncomingQueryString": true,
                "matches": [
                    {"matchType": "header", "matchOperator": "equals",
                     "objectMatchValue": {
                         "type": "object", "name": "ER",
                         "options": {"value": ["text/html*"], "valueHasWildcard": true}
                     }}
                ]
            },
            {"type": "frMatchRule", "forwardSettings": {"originId": "fr"}},
            {"type": "igMatchRule", "allowDeny": "denybranded",
             "matches": [{"matchType": "method", "matchValue": "POST"}]},
            {"type": "vpMatchRule", "passThroughPercent": -1.0, "disabled": true}
        ]))
        .unwrap();

        let encoded = serde_json::to_value(&original).unwrap();
        let reparsed: MatchRules = serde_json::from_value(encoded).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn minimal_alb_rule_decodes_and_validates() {
        let rules = decode(json!([
            {
                "type": "albMatchRule",
                "forwardSettings": {"originId": "alb1"},
                "matches": [
                    {"matchType": "protocol", "matchValue": "https", "matchOperator": "equals"}
                ]
            }
        ]))
        .unwrap();

        let MatchRule::Alb(rule) = &rules[0] else {
            panic!("expected an ALB rule");
        };
        assert_eq!(rule.forward_settings.origin_id, "alb1");
        assert_eq!(rule.matches[0].match_value.as_deref(), Some("https"));
        assert!(rule.matches[0].object_match_value.is_none());
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn alb_requires_matching_type_tag() {
        let mut rule = MatchRuleAlb::new();
        rule.forward_settings.origin_id = "alb1".to_string();
        assert!(rule.validate().is_ok());

        rule.rule_type = "erMatchRule".to_string();
        let errors = rule.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Type: value 'erMatchRule' is invalid. Must be: 'albMatchRule'"
        );

        rule.rule_type = String::new();
        let errors = rule.validate().unwrap_err();
        assert_eq!(errors.to_string(), "Type: cannot be blank");
    }

    #[test]
    fn alb_requires_forward_origin() {
        let rule = MatchRuleAlb::new();
        let errors = rule.validate().unwrap_err();
        assert_eq!(errors.to_string(), "ForwardSettings.OriginID: cannot be blank");
    }

    #[test]
    fn negative_window_bounds_are_rejected() {
        let mut rule = MatchRuleAlb::new();
        rule.forward_settings.origin_id = "alb1".to_string();
        rule.start = -2;
        rule.end = -1;
        let errors = rule.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Start: must be no less than 0\nEnd: must be no less than 0"
        );
    }

    #[test]
    fn er_status_code_must_be_a_redirect_code() {
        let mut rule = MatchRuleEr::new();
        rule.redirect_url = "/next".to_string();
        rule.status_code = 404;
        let errors = rule.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "StatusCode: value '404' is invalid. Must be one of: 301, 302, 303, 307 or 308"
        );

        rule.status_code = 301;
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn er_use_relative_url_is_enumerated() {
        let mut rule = MatchRuleEr::new();
        rule.redirect_url = "/next".to_string();
        rule.status_code = 302;
        rule.use_relative_url = Some("absolute".to_string());
        let errors = rule.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "UseRelativeURL: value 'absolute' is invalid. Must be one of: 'none', \
             'copy_scheme_hostname', 'relative_url' or '' (empty)"
        );

        rule.use_relative_url = Some("relative_url".to_string());
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn pr_percent_bounds() {
        let mut rule = MatchRulePr::new();
        rule.forward_settings.origin_id = "origin".to_string();

        rule.forward_settings.percent = 0;
        let errors = rule.validate().unwrap_err();
        assert_eq!(errors.to_string(), "ForwardSettings.Percent: cannot be blank");

        rule.forward_settings.percent = 101;
        let errors = rule.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "ForwardSettings.Percent: must be no greater than 100"
        );

        rule.forward_settings.percent = 100;
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn ap_pass_through_percent_bounds() {
        let mut rule = MatchRuleAp::new();
        let errors = rule.validate().unwrap_err();
        assert_eq!(errors.to_string(), "PassThroughPercent: cannot be blank");

        rule.pass_through_percent = Some(-1.5);
        let errors = rule.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "PassThroughPercent: must be no less than -1"
        );

        rule.pass_through_percent = Some(100.1);
        let errors = rule.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "PassThroughPercent: must be no greater than 100"
        );

        rule.pass_through_percent = Some(-1.0);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn rc_matches_must_be_blank_when_matches_always() {
        let mut rule = MatchRuleRc::new();
        rule.allow_deny = "allow".to_string();
        rule.matches_always = true;
        rule.matches
            .push(crate::criteria::MatchCriteriaRc::new().with_match_type("method").with_match_value("GET"));
        let errors = rule.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Matches: must be blank when 'matchesAlways' is set"
        );

        rule.matches.clear();
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn rc_allow_deny_is_enumerated() {
        let mut rule = MatchRuleRc::new();
        rule.matches_always = true;
        let errors = rule.validate().unwrap_err();
        assert_eq!(errors.to_string(), "AllowDeny: cannot be blank");

        rule.allow_deny = "block".to_string();
        let errors = rule.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "AllowDeny: value 'block' is invalid. Must be one of: 'allow', 'deny' or 'denybranded'"
        );
    }

    #[test]
    fn criteria_violations_are_indexed() {
        let mut rule = MatchRuleAlb::new();
        rule.forward_settings.origin_id = "alb1".to_string();
        rule.matches.push(
            MatchCriteriaAlb::new()
                .with_match_type("protocol")
                .with_match_value("https"),
        );
        rule.matches.push(MatchCriteriaAlb::new().with_match_type("method"));
        let errors = rule.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Matches[1].MatchValue: cannot be blank when ObjectMatchValue is blank\n\
             Matches[1].ObjectMatchValue: cannot be blank when MatchValue is blank"
        );
    }

    #[test]
    fn rules_collection_aggregates_per_index() {
        let rules = MatchRules(vec![
            MatchRule::Er(MatchRuleEr {
                redirect_url: "/next".to_string(),
                status_code: 301,
                ..MatchRuleEr::new()
            }),
            MatchRule::Rc(MatchRuleRc::new()),
        ]);
        let errors = rules.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "MatchRules[1].AllowDeny: cannot be blank"
        );
    }

    #[test]
    fn serialization_keeps_wire_field_names() {
        let rule = MatchRule::Er(MatchRuleEr {
            name: Some("redirect".to_string()),
            redirect_url: "/new".to_string(),
            status_code: 301,
            match_url: Some("/old".to_string()),
            ..MatchRuleEr::new()
        });
        assert_eq!(
            serde_json::to_value(rule).unwrap(),
            json!({
                "name": "redirect",
                "type": "erMatchRule",
                "redirectURL": "/new",
                "statusCode": 301,
                "matchURL": "/old",
                "useIncomingQueryString": false,
                "useIncomingSchemeAndHost": false
            })
        );
    }
}
