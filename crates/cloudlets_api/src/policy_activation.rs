//! Policy version activations.

use std::fmt;

use cloudlets_rules::validate::{self, Validate, ValidationErrors};
use reqwest::{Method, StatusCode};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::policy::PolicyActivation;

const OP_LIST_POLICY_ACTIVATIONS: &str = "list policy activations";
const OP_ACTIVATE_POLICY_VERSION: &str = "activate policy version";

/// Network a policy version is activated on.
///
/// The API spells the value differently per endpoint (`staging`/`prod` in
/// queries and request bodies, `STAGING`/`PRODUCTION` in some responses);
/// decoding accepts every published spelling, encoding always emits the
/// query form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyActivationNetwork {
    /// The staging network.
    Staging,
    /// The production network.
    Production,
}

impl PolicyActivationNetwork {
    /// The spelling used in query parameters and request bodies.
    #[must_use]
    pub const fn as_query_param(self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "prod",
        }
    }
}

impl fmt::Display for PolicyActivationNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_param())
    }
}

impl Serialize for PolicyActivationNetwork {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_query_param())
    }
}

impl<'de> Deserialize<'de> for PolicyActivationNetwork {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "STAGING" | "staging" => Ok(Self::Staging),
            "PRODUCTION" | "production" | "prod" => Ok(Self::Production),
            other => Err(D::Error::custom(format!(
                "cannot unmarshal PolicyActivationNetwork: \"{other}\""
            ))),
        }
    }
}

/// Parameters for [`Client::list_policy_activations`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPolicyActivationsRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Restricts the listing to one network.
    pub network: Option<PolicyActivationNetwork>,
    /// Restricts the listing to one property.
    pub property_name: Option<String>,
}

/// Parameters for [`Client::activate_policy_version`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatePolicyVersionRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Version to activate.
    pub version: i64,
    /// Whether the API should return before the activation completes.
    pub run_async: bool,
    /// The activation request body.
    pub activation: PolicyVersionActivation,
}

/// Body content of a policy version activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyVersionActivation {
    /// Network to activate on.
    pub network: PolicyActivationNetwork,
    /// Properties the activation additionally applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_property_names: Vec<String>,
}

impl Validate for ListPolicyActivationsRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("PolicyID", validate::nonzero(self.policy_id));
        errors.into_result()
    }
}

impl Validate for ActivatePolicyVersionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("PolicyID", validate::nonzero(self.policy_id));
        errors.check("Version", validate::nonzero(self.version));
        errors.check(
            "RequestBody.AdditionalPropertyNames",
            self.activation
                .additional_property_names
                .is_empty()
                .then(|| "cannot be blank".to_string()),
        );
        errors.into_result()
    }
}

impl Client {
    /// Returns the complete activation history for the selected policy in
    /// reverse chronological order.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-policy-activations>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn list_policy_activations(
        &self,
        params: ListPolicyActivationsRequest,
    ) -> Result<Vec<PolicyActivation>> {
        debug!("ListPolicyActivations");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_LIST_POLICY_ACTIVATIONS,
            errors,
        })?;

        let mut url = self.endpoint(
            OP_LIST_POLICY_ACTIVATIONS,
            &format!("/cloudlets/api/v2/policies/{}/activations", params.policy_id),
        )?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(network) = params.network {
                query.append_pair("network", network.as_query_param());
            }
            if let Some(property_name) = &params.property_name {
                query.append_pair("propertyName", property_name);
            }
        }
        self.get_json(OP_LIST_POLICY_ACTIVATIONS, url, StatusCode::OK)
            .await
    }

    /// Activates the selected policy version.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/post-policy-version-activations>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn activate_policy_version(
        &self,
        params: ActivatePolicyVersionRequest,
    ) -> Result<Vec<PolicyActivation>> {
        debug!("ActivatePolicyVersion");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_ACTIVATE_POLICY_VERSION,
            errors,
        })?;

        let mut url = self.endpoint(
            OP_ACTIVATE_POLICY_VERSION,
            &format!(
                "/cloudlets/api/v2/policies/{}/versions/{}/activations",
                params.policy_id, params.version
            ),
        )?;
        url.query_pairs_mut()
            .append_pair("async", &params.run_async.to_string());
        self.send_json(
            OP_ACTIVATE_POLICY_VERSION,
            Method::POST,
            url,
            &params.activation,
            StatusCode::OK,
        )
        .await
    }
}
