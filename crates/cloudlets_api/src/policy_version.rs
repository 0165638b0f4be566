//! Policy versions and their match-rule payloads.

use cloudlets_rules::validate::{self, Validate, ValidationErrors};
use cloudlets_rules::{match_rule, MatchRules};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::policy::PolicyActivation;

const OP_LIST_POLICY_VERSIONS: &str = "list policy versions";
const OP_GET_POLICY_VERSION: &str = "get policy versions";
const OP_CREATE_POLICY_VERSION: &str = "create policy versions";
const OP_DELETE_POLICY_VERSION: &str = "delete policy versions";
const OP_UPDATE_POLICY_VERSION: &str = "update policy versions";

/// A warning attached to a policy or load balancer version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Warning {
    /// Detailed explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// JSON pointer to the offending location.
    #[serde(rename = "jsonPointer", skip_serializing_if = "Option::is_none")]
    pub json_pointer: Option<String>,
    /// HTTP-style status, when present.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub status: i64,
    /// Short, human-readable summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Warning type URI.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub warning_type: Option<String>,
}

impl Validate for Warning {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("Detail", validate::not_blank(self.detail.as_deref()));
        errors.check(
            "JSONPointer",
            validate::length(self.json_pointer.as_deref(), 0, 128),
        );
        errors.check("Title", validate::not_blank(self.title.as_deref()));
        errors.check("Type", validate::not_blank(self.warning_type.as_deref()));
        errors.into_result()
    }
}

/// A policy version, as returned by the read and write operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyVersion {
    /// Resource location path.
    pub location: String,
    /// Revision identifier.
    pub revision_id: i64,
    /// Policy identifier.
    pub policy_id: i64,
    /// Version number.
    pub version: i64,
    /// Free-text description.
    pub description: Option<String>,
    /// User who created the version.
    pub created_by: String,
    /// Creation timestamp, epoch milliseconds.
    pub create_date: i64,
    /// User who last modified the version.
    pub last_modified_by: String,
    /// Last modification timestamp, epoch milliseconds.
    pub last_modified_date: i64,
    /// Whether the rules are locked against modification.
    pub rules_locked: bool,
    /// Activation history.
    #[serde(deserialize_with = "crate::ser::null_as_default")]
    pub activations: Vec<PolicyActivation>,
    /// The version's ordered match rules.
    #[serde(deserialize_with = "crate::ser::null_as_default")]
    pub match_rules: MatchRules,
    /// Match rule format, currently always `1.0`.
    pub match_rule_format: String,
    /// Whether the version is deleted.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub deleted: bool,
    /// Validation warnings reported by the service.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub warnings: Vec<Warning>,
}

/// Parameters for [`Client::list_policy_versions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPolicyVersionsRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Whether match rules are included in the listing.
    pub include_rules: bool,
    /// Whether deleted versions are included.
    pub include_deleted: bool,
    /// Whether activation history is included.
    pub include_activations: bool,
    /// Listing offset.
    pub offset: i64,
    /// Page size; the service default applies when unset.
    pub page_size: Option<i64>,
}

/// Parameters for [`Client::get_policy_version`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetPolicyVersionRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Version number.
    pub version: i64,
    /// Whether match rules are omitted from the response.
    pub omit_rules: bool,
}

/// Body of [`Client::create_policy_version`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyVersion {
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Match rule format; only `1.0` is published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_rule_format: Option<String>,
    /// The version's ordered match rules.
    pub match_rules: MatchRules,
}

/// Parameters for [`Client::create_policy_version`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatePolicyVersionRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// The version to create.
    pub version: CreatePolicyVersion,
}

/// Body of [`Client::update_policy_version`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyVersion {
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Match rule format; only `1.0` is published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_rule_format: Option<String>,
    /// The version's ordered match rules.
    pub match_rules: MatchRules,
    /// Marks the version deleted.
    pub deleted: bool,
}

/// Parameters for [`Client::update_policy_version`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePolicyVersionRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Version number.
    pub version: i64,
    /// The fields to update.
    pub update: UpdatePolicyVersion,
}

/// Parameters for [`Client::delete_policy_version`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletePolicyVersionRequest {
    /// Policy identifier.
    pub policy_id: i64,
    /// Version number.
    pub version: i64,
}

fn match_rule_format_violation(value: Option<&str>) -> Option<String> {
    let value = value.unwrap_or_default();
    (!value.is_empty() && value != match_rule::MATCH_RULE_FORMAT_1_0).then(|| {
        format!("value '{value}' is invalid. Must be one of: '1.0' or '' (empty)")
    })
}

fn check_rules_payload(
    errors: &mut ValidationErrors,
    description: Option<&str>,
    match_rule_format: Option<&str>,
    match_rules: &MatchRules,
) {
    errors.check("Description", validate::length(description, 0, 255));
    errors.check(
        "MatchRuleFormat",
        match_rule_format_violation(match_rule_format),
    );
    errors.extend(match_rules.validate());
}

impl Validate for ListPolicyVersionsRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("PolicyID", validate::nonzero(self.policy_id));
        errors.check("Offset", validate::at_least(self.offset, 0));
        errors.into_result()
    }
}

impl Validate for CreatePolicyVersionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_rules_payload(
            &mut errors,
            self.version.description.as_deref(),
            self.version.match_rule_format.as_deref(),
            &self.version.match_rules,
        );
        errors.into_result()
    }
}

impl Validate for UpdatePolicyVersionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_rules_payload(
            &mut errors,
            self.update.description.as_deref(),
            self.update.match_rule_format.as_deref(),
            &self.update.match_rules,
        );
        errors.into_result()
    }
}

impl Client {
    /// Lists policy versions by policy identifier.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-policy-versions>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn list_policy_versions(
        &self,
        params: ListPolicyVersionsRequest,
    ) -> Result<Vec<PolicyVersion>> {
        debug!("ListPolicyVersions");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_LIST_POLICY_VERSIONS,
            errors,
        })?;

        let mut url = self.endpoint(
            OP_LIST_POLICY_VERSIONS,
            &format!("/cloudlets/api/v2/policies/{}/versions", params.policy_id),
        )?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("offset", &params.offset.to_string());
            query.append_pair("includeRules", &params.include_rules.to_string());
            query.append_pair("includeDeleted", &params.include_deleted.to_string());
            query.append_pair(
                "includeActivations",
                &params.include_activations.to_string(),
            );
            if let Some(page_size) = params.page_size {
                query.append_pair("pageSize", &page_size.to_string());
            }
        }
        self.get_json(OP_LIST_POLICY_VERSIONS, url, StatusCode::OK)
            .await
    }

    /// Gets a policy version by policy identifier and version number.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-policy-version>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the request fails or the API rejects it.
    pub async fn get_policy_version(
        &self,
        params: GetPolicyVersionRequest,
    ) -> Result<PolicyVersion> {
        debug!("GetPolicyVersion");

        let mut url = self.endpoint(
            OP_GET_POLICY_VERSION,
            &format!(
                "/cloudlets/api/v2/policies/{}/versions/{}",
                params.policy_id, params.version
            ),
        )?;
        url.query_pairs_mut()
            .append_pair("omitRules", &params.omit_rules.to_string());
        self.get_json(OP_GET_POLICY_VERSION, url, StatusCode::OK)
            .await
    }

    /// Creates a policy version.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/post-policy-versions>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn create_policy_version(
        &self,
        params: CreatePolicyVersionRequest,
    ) -> Result<PolicyVersion> {
        debug!("CreatePolicyVersion");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_CREATE_POLICY_VERSION,
            errors,
        })?;

        let url = self.endpoint(
            OP_CREATE_POLICY_VERSION,
            &format!("/cloudlets/api/v2/policies/{}/versions", params.policy_id),
        )?;
        self.send_json(
            OP_CREATE_POLICY_VERSION,
            Method::POST,
            url,
            &params.version,
            StatusCode::CREATED,
        )
        .await
    }

    /// Deletes a policy version.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/delete-policy-version>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the request fails or the API rejects it.
    pub async fn delete_policy_version(&self, params: DeletePolicyVersionRequest) -> Result<()> {
        debug!("DeletePolicyVersion");

        let url = self.endpoint(
            OP_DELETE_POLICY_VERSION,
            &format!(
                "/cloudlets/api/v2/policies/{}/versions/{}",
                params.policy_id, params.version
            ),
        )?;
        self.delete_empty(OP_DELETE_POLICY_VERSION, url, StatusCode::NO_CONTENT)
            .await
    }

    /// Updates a policy version.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/put-policy-version>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn update_policy_version(
        &self,
        params: UpdatePolicyVersionRequest,
    ) -> Result<PolicyVersion> {
        debug!("UpdatePolicyVersion");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_UPDATE_POLICY_VERSION,
            errors,
        })?;

        let url = self.endpoint(
            OP_UPDATE_POLICY_VERSION,
            &format!(
                "/cloudlets/api/v2/policies/{}/versions/{}",
                params.policy_id, params.version
            ),
        )?;
        self.send_json(
            OP_UPDATE_POLICY_VERSION,
            Method::PUT,
            url,
            &params.update,
            StatusCode::OK,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testutil::client_for;
    use cloudlets_rules::{MatchRule, MatchRuleEr};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_policy_version_resolves_match_rules() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cloudlets/api/v2/policies/1234/versions/2"))
            .and(query_param("omitRules", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": "/cloudlets/api/v2/policies/1234/versions/2",
                "revisionId": 4815971,
                "policyId": 1234,
                "version": 2,
                "description": "redirects",
                "createdBy": "jsmith",
                "createDate": 1607522782282_i64,
                "lastModifiedBy": "jsmith",
                "lastModifiedDate": 1607522782282_i64,
                "rulesLocked": false,
                "activations": null,
                "matchRules": [
                    {
                        "type": "erMatchRule",
                        "name": "redirect images",
                        "redirectURL": "/images/index.html",
                        "statusCode": 301,
                        "useIncomingQueryString": false,
                        "useIncomingSchemeAndHost": false,
                        "matches": [
                            {"matchType": "path", "matchValue": "/images", "matchOperator": "equals",
                             "caseSensitive": false, "negate": false}
                        ]
                    }
                ],
                "matchRuleFormat": "1.0",
                "warnings": [
                    {
                        "detail": "Start time is very old, possibly invalid: 1 (1970-01-01T00:00:01Z)",
                        "jsonPointer": "/matchRules/0",
                        "title": "Invalid Result Value",
                        "type": "/cloudlets/error-types/invalid-result-value"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let version = client
            .get_policy_version(GetPolicyVersionRequest {
                policy_id: 1234,
                version: 2,
                omit_rules: false,
            })
            .await
            .unwrap();

        assert_eq!(version.match_rule_format, "1.0");
        assert_eq!(version.match_rules.len(), 1);
        let MatchRule::Er(rule) = &version.match_rules[0] else {
            panic!("expected an ER rule");
        };
        assert_eq!(rule.redirect_url, "/images/index.html");
        assert_eq!(version.warnings.len(), 1);
        assert_eq!(version.warnings[0].json_pointer.as_deref(), Some("/matchRules/0"));
    }

    #[tokio::test]
    async fn list_policy_versions_sends_all_flags() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cloudlets/api/v2/policies/1234/versions"))
            .and(query_param("offset", "0"))
            .and(query_param("includeRules", "true"))
            .and(query_param("includeDeleted", "false"))
            .and(query_param("includeActivations", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let versions = client
            .list_policy_versions(ListPolicyVersionsRequest {
                policy_id: 1234,
                include_rules: true,
                include_activations: true,
                ..ListPolicyVersionsRequest::default()
            })
            .await
            .unwrap();
        assert!(versions.is_empty());
    }

    #[tokio::test]
    async fn list_policy_versions_requires_policy_id() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let err = client
            .list_policy_versions(ListPolicyVersionsRequest::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "list policy versions: struct validation:\nPolicyID: cannot be blank"
        );
    }

    #[tokio::test]
    async fn create_policy_version_posts_match_rules() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cloudlets/api/v2/policies/1234/versions"))
            .and(body_json(json!({
                "description": "redirects",
                "matchRules": [
                    {
                        "type": "erMatchRule",
                        "redirectURL": "/new",
                        "statusCode": 301,
                        "useIncomingQueryString": false,
                        "useIncomingSchemeAndHost": false
                    }
                ]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "location": "/cloudlets/api/v2/policies/1234/versions/3",
                "revisionId": 4815972,
                "policyId": 1234,
                "version": 3,
                "createdBy": "jsmith",
                "createDate": 1607522782282_i64,
                "lastModifiedBy": "jsmith",
                "lastModifiedDate": 1607522782282_i64,
                "rulesLocked": false,
                "matchRules": null,
                "matchRuleFormat": "1.0"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let rule = MatchRuleEr {
            redirect_url: "/new".to_string(),
            status_code: 301,
            ..MatchRuleEr::new()
        };
        let version = client
            .create_policy_version(CreatePolicyVersionRequest {
                policy_id: 1234,
                version: CreatePolicyVersion {
                    description: Some("redirects".to_string()),
                    match_rule_format: None,
                    match_rules: MatchRules(vec![MatchRule::Er(rule)]),
                },
            })
            .await
            .unwrap();
        assert_eq!(version.version, 3);
        assert!(version.match_rules.is_empty());
    }

    #[tokio::test]
    async fn create_policy_version_validates_rules_and_format() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let err = client
            .create_policy_version(CreatePolicyVersionRequest {
                policy_id: 1234,
                version: CreatePolicyVersion {
                    description: None,
                    match_rule_format: Some("2.0".to_string()),
                    match_rules: MatchRules(vec![MatchRule::Er(MatchRuleEr::new())]),
                },
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "create policy versions: struct validation:\n\
             MatchRuleFormat: value '2.0' is invalid. Must be one of: '1.0' or '' (empty)\n\
             MatchRules[0].RedirectURL: cannot be blank\n\
             MatchRules[0].StatusCode: cannot be blank"
        );
    }

    #[tokio::test]
    async fn delete_policy_version_expects_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/cloudlets/api/v2/policies/1234/versions/3"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client
            .delete_policy_version(DeletePolicyVersionRequest {
                policy_id: 1234,
                version: 3,
            })
            .await
            .is_ok());
    }
}
