//! Properties associated with a policy.

use std::collections::HashMap;

use cloudlets_rules::validate::{self, Validate, ValidationErrors};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::policy_activation::PolicyActivationNetwork;

const OP_GET_POLICY_PROPERTIES: &str = "get policy properties";
const OP_DELETE_POLICY_PROPERTY: &str = "delete policy property";

/// Parameters for [`Client::get_policy_properties`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetPolicyPropertiesRequest {
    /// Policy identifier.
    pub policy_id: i64,
}

/// A property associated with a policy, keyed by property name in the
/// response map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyProperty {
    /// Group the property belongs to.
    pub group_id: i64,
    /// Property identifier.
    pub id: i64,
    /// Property name.
    pub name: String,
    /// Status on the newest property version.
    pub newest_version: NetworkStatus,
    /// Status on the production network.
    pub production: NetworkStatus,
    /// Status on the staging network.
    pub staging: NetworkStatus,
}

/// Per-network activation status of an associated property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkStatus {
    /// User who requested the activation.
    pub activated_by: String,
    /// Activation timestamp.
    pub activation_date: String,
    /// Activated property version.
    pub version: i64,
    /// Origins referenced by the activated rules, keyed by origin id.
    #[serde(deserialize_with = "crate::ser::null_as_default")]
    pub cloudlets_origins: HashMap<String, CloudletsOrigin>,
    /// Policies referenced by the property version.
    #[serde(deserialize_with = "crate::ser::null_as_default")]
    pub referenced_policies: Vec<String>,
}

/// An origin referenced from an activated property version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CloudletsOrigin {
    /// Origin identifier.
    #[serde(rename = "id")]
    pub origin_id: String,
    /// Hostname the origin resolves to.
    pub hostname: String,
    /// Origin type.
    #[serde(rename = "type")]
    pub origin_type: String,
    /// Configuration checksum.
    pub checksum: String,
    /// Free-text description.
    pub description: String,
}

/// Parameters for [`Client::delete_policy_property`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletePolicyPropertyRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Property identifier.
    pub property_id: i64,
    /// Network to remove the association from.
    pub network: Option<PolicyActivationNetwork>,
}

impl Validate for DeletePolicyPropertyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("PolicyID", validate::nonzero(self.policy_id));
        errors.check("PropertyID", validate::nonzero(self.property_id));
        errors.into_result()
    }
}

impl Client {
    /// Gets all properties associated with a policy, keyed by property name.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-policy-properties>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the request fails or the API rejects it.
    pub async fn get_policy_properties(
        &self,
        params: GetPolicyPropertiesRequest,
    ) -> Result<HashMap<String, PolicyProperty>> {
        debug!("GetPolicyProperties");

        let url = self.endpoint(
            OP_GET_POLICY_PROPERTIES,
            &format!("/cloudlets/api/v2/policies/{}/properties", params.policy_id),
        )?;
        self.get_json(OP_GET_POLICY_PROPERTIES, url, StatusCode::OK)
            .await
    }

    /// Removes a property from a policy's associated-properties list.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn delete_policy_property(&self, params: DeletePolicyPropertyRequest) -> Result<()> {
        debug!("DeletePolicyProperty");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_DELETE_POLICY_PROPERTY,
            errors,
        })?;

        let mut url = self.endpoint(
            OP_DELETE_POLICY_PROPERTY,
            &format!(
                "/cloudlets/api/v2/policies/{}/properties/{}",
                params.policy_id, params.property_id
            ),
        )?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("async", "true");
            if let Some(network) = params.network {
                query.append_pair("network", network.as_query_param());
            }
        }
        self.delete_empty(OP_DELETE_POLICY_PROPERTY, url, StatusCode::NO_CONTENT)
            .await
    }
}
