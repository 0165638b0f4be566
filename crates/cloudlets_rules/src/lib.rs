//! Cloudlets match-rule model for the Akamai Cloudlets v2 API.
//!
//! This crate provides:
//! - The 8-variant match rule family (ALB, AP, AS, PR, ER, FR, RC, VP)
//! - Two-level tagged-union decoding of rule sets and object match values
//! - Client-side validation with aggregated, field-keyed violations
//!
//! # Example
//!
//! ```rust
//! use cloudlets_rules::{MatchRule, MatchRules, Validate};
//!
//! let raw = r#"[
//!     {
//!         "type": "albMatchRule",
//!         "forwardSettings": {"originId": "alb1"},
//!         "matches": [
//!             {"matchType": "protocol", "matchValue": "https", "matchOperator": "equals"}
//!         ]
//!     }
//! ]"#;
//!
//! let rules: MatchRules = serde_json::from_str(raw).unwrap();
//! assert!(matches!(rules[0], MatchRule::Alb(_)));
//! assert!(rules.validate().is_ok());
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod criteria;
pub mod match_rule;
pub mod object_match_value;
mod ser;
pub mod validate;

pub use criteria::{
    CriteriaScope, MatchCriteria, MatchCriteriaAlb, MatchCriteriaAp, MatchCriteriaAs,
    MatchCriteriaEr, MatchCriteriaFr, MatchCriteriaPr, MatchCriteriaRc, MatchCriteriaVp,
};
pub use match_rule::{
    ForwardSettingsAlb, ForwardSettingsAs, ForwardSettingsFr, ForwardSettingsPr, MatchRule,
    MatchRuleAlb, MatchRuleAp, MatchRuleAs, MatchRuleEr, MatchRuleFr, MatchRulePr, MatchRuleRc,
    MatchRuleVp, MatchRules,
};
pub use object_match_value::{
    ObjectMatchValue, ObjectMatchValueObject, ObjectMatchValueRange, ObjectMatchValueSimple,
    Options, ValueShape,
};
pub use validate::{Validate, ValidationErrors, Violation};
