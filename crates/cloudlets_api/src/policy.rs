//! Policies.

use cloudlets_rules::validate::{self, Validate, ValidationErrors};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::policy_activation::PolicyActivationNetwork;

const OP_LIST_POLICIES: &str = "list policies";
const OP_GET_POLICY: &str = "get policy";
const OP_CREATE_POLICY: &str = "create policy";
const OP_REMOVE_POLICY: &str = "remove policy";
const OP_UPDATE_POLICY: &str = "update policy";

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-z_A-Z0-9]+$").expect("name pattern is valid"));
static PROPERTY_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_A-Z0-9.\-]+$").expect("property name pattern is valid"));

fn matches_pattern(value: Option<&str>, pattern: &Regex) -> Option<String> {
    let value = value.unwrap_or_default();
    (!value.is_empty() && !pattern.is_match(value)).then(|| "must be in a valid format".to_string())
}

/// A policy, as returned by the read and write operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Policy {
    /// Resource location path.
    pub location: String,
    /// Policy identifier.
    pub policy_id: i64,
    /// Group the policy belongs to.
    pub group_id: i64,
    /// Policy name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// User who created the policy.
    pub created_by: String,
    /// Creation timestamp, epoch milliseconds.
    pub create_date: f64,
    /// User who last modified the policy.
    pub last_modified_by: String,
    /// Last modification timestamp, epoch milliseconds.
    pub last_modified_date: f64,
    /// Activation history.
    #[serde(deserialize_with = "crate::ser::null_as_default")]
    pub activations: Vec<PolicyActivation>,
    /// Numeric cloudlet identifier (0-13).
    pub cloudlet_id: i64,
    /// Two-letter cloudlet code.
    pub cloudlet_code: String,
    /// API version the policy was created with.
    pub api_version: String,
    /// Whether the policy is deleted.
    pub deleted: bool,
}

/// One entry of a policy's activation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyActivation {
    /// API version the activation was requested with.
    #[serde(default)]
    pub api_version: String,
    /// Network the activation targets.
    pub network: PolicyActivationNetwork,
    /// The activated policy version.
    #[serde(default)]
    pub policy_info: PolicyInfo,
    /// The property the policy is attached to.
    #[serde(default)]
    pub property_info: PropertyInfo,
}

/// Policy side of an activation history entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyInfo {
    /// Policy identifier.
    pub policy_id: i64,
    /// Policy name.
    pub name: String,
    /// Activated version.
    pub version: i64,
    /// Activation status.
    pub status: Option<PolicyActivationStatus>,
    /// Additional status detail, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
    /// User who requested the activation.
    pub activated_by: String,
    /// Activation timestamp, epoch milliseconds.
    pub activation_date: i64,
}

/// Property side of an activation history entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyInfo {
    /// Property name.
    pub name: String,
    /// Property version the policy rides on.
    pub version: i64,
    /// Group the property belongs to.
    pub group_id: i64,
    /// Activation status.
    pub status: Option<PolicyActivationStatus>,
    /// User who requested the activation.
    pub activated_by: String,
    /// Activation timestamp, epoch milliseconds.
    pub activation_date: i64,
}

/// Status of a policy activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyActivationStatus {
    /// Currently active.
    Active,
    /// Deactivated after having been active.
    Deactivated,
    /// Not active.
    Inactive,
    /// Activation in progress.
    Pending,
    /// Activation failed.
    Failed,
}

/// Parameters for [`Client::list_policies`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPoliciesRequest {
    /// Restricts the listing to one cloudlet type.
    pub cloudlet_id: Option<i64>,
    /// Whether deleted policies are included.
    pub include_deleted: bool,
    /// Listing offset.
    pub offset: i64,
    /// Page size; the service default applies when unset.
    pub page_size: Option<i64>,
}

/// Parameters for [`Client::get_policy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetPolicyRequest {
    /// Policy identifier.
    pub policy_id: i64,
}

/// Parameters for [`Client::create_policy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyRequest {
    /// Policy name; letters, digits and underscores only.
    pub name: String,
    /// Numeric cloudlet identifier (0-13).
    pub cloudlet_id: i64,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Property to associate the policy with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    /// Group to create the policy in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
}

/// Body of [`Client::update_policy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicy {
    /// New policy name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New associated property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    /// New group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    /// Marks the policy deleted.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub deleted: bool,
}

/// Parameters for [`Client::update_policy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePolicyRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// The fields to update.
    pub policy: UpdatePolicy,
}

/// Parameters for [`Client::remove_policy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovePolicyRequest {
    /// Policy identifier.
    pub policy_id: i64,
}

impl Validate for CreatePolicyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "Name",
            validate::not_blank(Some(&self.name))
                .or_else(|| validate::length(Some(&self.name), 0, 64))
                .or_else(|| matches_pattern(Some(&self.name), &NAME_PATTERN)),
        );
        errors.check(
            "PropertyName",
            matches_pattern(self.property_name.as_deref(), &PROPERTY_NAME_PATTERN),
        );
        errors.check(
            "CloudletID",
            validate::at_least(self.cloudlet_id, 0)
                .or_else(|| validate::at_most(self.cloudlet_id, 13)),
        );
        errors.check(
            "Description",
            validate::length(self.description.as_deref(), 0, 255),
        );
        errors.into_result()
    }
}

impl Validate for UpdatePolicyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "Name",
            validate::length(self.policy.name.as_deref(), 0, 64)
                .or_else(|| matches_pattern(self.policy.name.as_deref(), &NAME_PATTERN)),
        );
        errors.check(
            "Description",
            validate::length(self.policy.description.as_deref(), 0, 255),
        );
        errors.check(
            "PropertyName",
            matches_pattern(self.policy.property_name.as_deref(), &PROPERTY_NAME_PATTERN),
        );
        errors.into_result()
    }
}

impl Client {
    /// Lists policies visible to the current account.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-policies>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the request fails or the API rejects it.
    pub async fn list_policies(&self, params: ListPoliciesRequest) -> Result<Vec<Policy>> {
        debug!("ListPolicies");

        let mut url = self.endpoint(OP_LIST_POLICIES, "/cloudlets/api/v2/policies")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(cloudlet_id) = params.cloudlet_id {
                query.append_pair("cloudletId", &cloudlet_id.to_string());
            }
            if let Some(page_size) = params.page_size {
                query.append_pair("pageSize", &page_size.to_string());
            }
            query.append_pair("offset", &params.offset.to_string());
            query.append_pair("includeDeleted", &params.include_deleted.to_string());
        }
        self.get_json(OP_LIST_POLICIES, url, StatusCode::OK).await
    }

    /// Gets a policy by its identifier.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-policy>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the request fails or the API rejects it.
    pub async fn get_policy(&self, params: GetPolicyRequest) -> Result<Policy> {
        debug!("GetPolicy");

        let url = self.endpoint(
            OP_GET_POLICY,
            &format!("/cloudlets/api/v2/policies/{}", params.policy_id),
        )?;
        self.get_json(OP_GET_POLICY, url, StatusCode::OK).await
    }

    /// Creates a policy.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/post-policy>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn create_policy(&self, params: CreatePolicyRequest) -> Result<Policy> {
        debug!("CreatePolicy");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_CREATE_POLICY,
            errors,
        })?;

        let url = self.endpoint(OP_CREATE_POLICY, "/cloudlets/api/v2/policies")?;
        self.send_json(OP_CREATE_POLICY, Method::POST, url, &params, StatusCode::CREATED)
            .await
    }

    /// Removes a policy.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/delete-policy>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the request fails or the API rejects it.
    pub async fn remove_policy(&self, params: RemovePolicyRequest) -> Result<()> {
        debug!("RemovePolicy");

        let url = self.endpoint(
            OP_REMOVE_POLICY,
            &format!("/cloudlets/api/v2/policies/{}", params.policy_id),
        )?;
        self.delete_empty(OP_REMOVE_POLICY, url, StatusCode::NO_CONTENT)
            .await
    }

    /// Updates a policy.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/put-policy>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn update_policy(&self, params: UpdatePolicyRequest) -> Result<Policy> {
        debug!("UpdatePolicy");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_UPDATE_POLICY,
            errors,
        })?;

        let url = self.endpoint(
            OP_UPDATE_POLICY,
            &format!("/cloudlets/api/v2/policies/{}", params.policy_id),
        )?;
        self.send_json(OP_UPDATE_POLICY, Method::PUT, url, &params.policy, StatusCode::OK)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testutil::client_for;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_policies_sends_paging_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cloudlets/api/v2/policies"))
            .and(query_param("cloudletId", "0"))
            .and(query_param("offset", "0"))
            .and(query_param("pageSize", "100"))
            .and(query_param("includeDeleted", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "location": "/cloudlets/api/v2/policies/1234",
                    "policyId": 1234,
                    "groupId": 40498,
                    "name": "er_policy",
                    "description": null,
                    "createdBy": "jsmith",
                    "createDate": 1607498520000.0,
                    "lastModifiedBy": "jsmith",
                    "lastModifiedDate": 1607498520000.0,
                    "activations": null,
                    "cloudletId": 0,
                    "cloudletCode": "ER",
                    "apiVersion": "2.0",
                    "deleted": false
                }
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let policies = client
            .list_policies(ListPoliciesRequest {
                cloudlet_id: Some(0),
                page_size: Some(100),
                ..ListPoliciesRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].cloudlet_code, "ER");
        assert_eq!(policies[0].description, None);
        assert!(policies[0].activations.is_empty());
    }

    #[tokio::test]
    async fn create_policy_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cloudlets/api/v2/policies"))
            .and(body_json(json!({"name": "er_policy", "cloudletId": 0})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "location": "/cloudlets/api/v2/policies/1234",
                "policyId": 1234,
                "groupId": 40498,
                "name": "er_policy",
                "createdBy": "jsmith",
                "createDate": 1607498520000.0,
                "lastModifiedBy": "jsmith",
                "lastModifiedDate": 1607498520000.0,
                "cloudletId": 0,
                "cloudletCode": "ER",
                "apiVersion": "2.0",
                "deleted": false
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let policy = client
            .create_policy(CreatePolicyRequest {
                name: "er_policy".to_string(),
                cloudlet_id: 0,
                ..CreatePolicyRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(policy.policy_id, 1234);
    }

    #[tokio::test]
    async fn create_policy_rejects_bad_name_and_cloudlet() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let err = client
            .create_policy(CreatePolicyRequest {
                name: "not a valid name".to_string(),
                cloudlet_id: 14,
                ..CreatePolicyRequest::default()
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "create policy: struct validation:\n\
             Name: must be in a valid format\n\
             CloudletID: must be no greater than 13"
        );
    }

    #[tokio::test]
    async fn remove_policy_expects_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/cloudlets/api/v2/policies/1234"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client
            .remove_policy(RemovePolicyRequest { policy_id: 1234 })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn update_policy_puts_only_changed_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/cloudlets/api/v2/policies/1234"))
            .and(body_json(json!({"description": "updated"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": "/cloudlets/api/v2/policies/1234",
                "policyId": 1234,
                "groupId": 40498,
                "name": "er_policy",
                "description": "updated",
                "createdBy": "jsmith",
                "createDate": 1607498520000.0,
                "lastModifiedBy": "jsmith",
                "lastModifiedDate": 1607499000000.0,
                "cloudletId": 0,
                "cloudletCode": "ER",
                "apiVersion": "2.0",
                "deleted": false
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let policy = client
            .update_policy(UpdatePolicyRequest {
                policy_id: 1234,
                policy: UpdatePolicy {
                    description: Some("updated".to_string()),
                    ..UpdatePolicy::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(policy.description.as_deref(), Some("updated"));
    }
}
