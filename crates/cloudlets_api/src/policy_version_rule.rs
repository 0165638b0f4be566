//! Single-rule operations within a policy version.
//!
//! These endpoints return one match rule; the response resolves through the
//! same tagged-union dispatch as a full rule set.

use cloudlets_rules::validate::{self, Validate, ValidationErrors};
use cloudlets_rules::MatchRule;
use reqwest::{Method, StatusCode};
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};

const OP_GET_POLICY_VERSION_RULE: &str = "get policy version rule";
const OP_CREATE_POLICY_VERSION_RULE: &str = "create policy version rule";
const OP_UPDATE_POLICY_VERSION_RULE: &str = "update policy version rule";

/// Parameters for [`Client::get_policy_version_rule`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetPolicyVersionRuleRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Version number.
    pub version: i64,
    /// Rule identifier assigned by the service.
    pub aka_rule_id: String,
}

/// Parameters for [`Client::create_policy_version_rule`]. Only one rule can
/// be added at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePolicyVersionRuleRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Version number.
    pub version: i64,
    /// Position the rule is inserted at; appended when zero.
    pub index: i64,
    /// The rule to add.
    pub rule: MatchRule,
}

/// Parameters for [`Client::update_policy_version_rule`]. Set the rule's
/// `disabled` flag to keep it from being evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePolicyVersionRuleRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Version number.
    pub version: i64,
    /// Rule identifier assigned by the service.
    pub aka_rule_id: String,
    /// The new rule content.
    pub rule: MatchRule,
}

impl Validate for GetPolicyVersionRuleRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "Version",
            validate::nonzero(self.version).or_else(|| validate::at_least(self.version, 1)),
        );
        errors.check("AkaRuleID", validate::not_blank(Some(&self.aka_rule_id)));
        errors.check("PolicyID", validate::nonzero(self.policy_id));
        errors.into_result()
    }
}

impl Validate for CreatePolicyVersionRuleRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "Version",
            validate::nonzero(self.version).or_else(|| validate::at_least(self.version, 1)),
        );
        errors.check("PolicyID", validate::nonzero(self.policy_id));
        errors.check("Index", validate::at_least(self.index, 0));
        errors.into_result()
    }
}

impl Validate for UpdatePolicyVersionRuleRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "Version",
            validate::nonzero(self.version).or_else(|| validate::at_least(self.version, 1)),
        );
        errors.check("AkaRuleID", validate::not_blank(Some(&self.aka_rule_id)));
        errors.check("PolicyID", validate::nonzero(self.policy_id));
        errors.into_result()
    }
}

impl Client {
    /// Returns one rule of a policy version.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-policy-version-rule>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn get_policy_version_rule(
        &self,
        params: GetPolicyVersionRuleRequest,
    ) -> Result<MatchRule> {
        debug!("GetPolicyVersionRule");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_GET_POLICY_VERSION_RULE,
            errors,
        })?;

        let url = self.endpoint(
            OP_GET_POLICY_VERSION_RULE,
            &format!(
                "/cloudlets/api/v2/policies/{}/versions/{}/rules/{}",
                params.policy_id, params.version, params.aka_rule_id
            ),
        )?;
        self.get_json(OP_GET_POLICY_VERSION_RULE, url, StatusCode::OK)
            .await
    }

    /// Adds one rule to an existing policy version.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/post-policy-version-rules>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn create_policy_version_rule(
        &self,
        params: CreatePolicyVersionRuleRequest,
    ) -> Result<MatchRule> {
        debug!("CreatePolicyVersionRule");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_CREATE_POLICY_VERSION_RULE,
            errors,
        })?;

        let mut url = self.endpoint(
            OP_CREATE_POLICY_VERSION_RULE,
            &format!(
                "/cloudlets/api/v2/policies/{}/versions/{}/rules",
                params.policy_id, params.version
            ),
        )?;
        if params.index > 0 {
            url.query_pairs_mut()
                .append_pair("index", &params.index.to_string());
        }
        self.send_json(
            OP_CREATE_POLICY_VERSION_RULE,
            Method::POST,
            url,
            &params.rule,
            StatusCode::OK,
        )
        .await
    }

    /// Updates one rule of an existing policy version.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/put-policy-version-rule>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn update_policy_version_rule(
        &self,
        params: UpdatePolicyVersionRuleRequest,
    ) -> Result<MatchRule> {
        debug!("UpdatePolicyVersionRule");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_UPDATE_POLICY_VERSION_RULE,
            errors,
        })?;

        let url = self.endpoint(
            OP_UPDATE_POLICY_VERSION_RULE,
            &format!(
                "/cloudlets/api/v2/policies/{}/versions/{}/rules/{}",
                params.policy_id, params.version, params.aka_rule_id
            ),
        )?;
        self.send_json(
            OP_UPDATE_POLICY_VERSION_RULE,
            Method::PUT,
            url,
            &params.rule,
            StatusCode::OK,
        )
        .await
    }
}
