//! Load balancer (ALB origin) version activations.

use std::fmt;

use cloudlets_rules::validate::{self, Validate, ValidationErrors};
use reqwest::{Method, StatusCode};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};

const OP_LIST_LB_ACTIVATIONS: &str = "list load balancer activations";
const OP_ACTIVATE_LB_VERSION: &str = "activate load balancer version";

/// Network a load balancer version is activated on.
///
/// Request bodies spell the value `STAGING`/`PRODUCTION` while the listing
/// query uses `staging`/`prod`; decoding accepts both spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBalancerActivationNetwork {
    /// The staging network.
    Staging,
    /// The production network.
    Production,
}

impl LoadBalancerActivationNetwork {
    /// The spelling used in request bodies and responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Staging => "STAGING",
            Self::Production => "PRODUCTION",
        }
    }

    /// The spelling used in the listing query parameter.
    #[must_use]
    pub const fn as_query_param(self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "prod",
        }
    }
}

impl fmt::Display for LoadBalancerActivationNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LoadBalancerActivationNetwork {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LoadBalancerActivationNetwork {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "STAGING" | "staging" => Ok(Self::Staging),
            "PRODUCTION" | "production" | "prod" => Ok(Self::Production),
            other => Err(D::Error::custom(format!(
                "cannot unmarshal LoadBalancerActivationNetwork: \"{other}\""
            ))),
        }
    }
}

/// Status of a load balancer activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadBalancerActivationStatus {
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

/// A single load balancer version activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerActivation {
    /// User who requested the activation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_by: Option<String>,
    /// Activation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_date: Option<String>,
    /// Network the activation targets.
    pub network: LoadBalancerActivationNetwork,
    /// Origin the activation belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,
    /// Activation status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LoadBalancerActivationStatus>,
    /// Whether this was a dry run.
    #[serde(default, rename = "dryrun", skip_serializing_if = "crate::ser::is_false")]
    pub dry_run: bool,
    /// Activated version.
    pub version: i64,
}

/// Parameters for [`Client::list_load_balancer_activations`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListLoadBalancerActivationsRequest {
    /// Origin identifier.
    pub origin_id: String,
    /// Restricts the listing to one network.
    pub network: Option<LoadBalancerActivationNetwork>,
    /// Whether only the most recent activation per network is returned.
    pub latest_only: bool,
    /// Page size; the service default applies when unset.
    pub page_size: Option<i64>,
    /// Page number.
    pub page: Option<i64>,
}

/// Parameters for [`Client::activate_load_balancer_version`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateLoadBalancerVersionRequest {
    /// Origin identifier.
    pub origin_id: String,
    /// Whether the API should return before the activation completes.
    pub run_async: bool,
    /// The activation request body.
    pub activation: LoadBalancerVersionActivation,
}

/// Body content of a load balancer version activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerVersionActivation {
    /// Network to activate on.
    pub network: LoadBalancerActivationNetwork,
    /// Whether to only simulate the activation.
    #[serde(default, rename = "dryrun", skip_serializing_if = "crate::ser::is_false")]
    pub dry_run: bool,
    /// Version to activate.
    pub version: i64,
}

impl Validate for ListLoadBalancerActivationsRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("OriginID", validate::not_blank(Some(&self.origin_id)));
        errors.into_result()
    }
}

impl Validate for ActivateLoadBalancerVersionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("OriginID", validate::not_blank(Some(&self.origin_id)));
        errors.check(
            "Params.Version",
            validate::at_least(self.activation.version, 0),
        );
        errors.into_result()
    }
}

impl Client {
    /// Fetches activations, most recent first.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-origin-activations>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn list_load_balancer_activations(
        &self,
        params: ListLoadBalancerActivationsRequest,
    ) -> Result<Vec<LoadBalancerActivation>> {
        debug!("ListLoadBalancerActivations");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_LIST_LB_ACTIVATIONS,
            errors,
        })?;

        let mut url = self.endpoint(
            OP_LIST_LB_ACTIVATIONS,
            &format!("/cloudlets/api/v2/origins/{}/activations", params.origin_id),
        )?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(network) = params.network {
                query.append_pair("network", network.as_query_param());
            }
            if let Some(page_size) = params.page_size {
                query.append_pair("pageSize", &page_size.to_string());
            }
            if let Some(page) = params.page {
                query.append_pair("page", &page.to_string());
            }
            if params.latest_only {
                query.append_pair("latestOnly", "true");
            }
        }
        self.get_json(OP_LIST_LB_ACTIVATIONS, url, StatusCode::OK)
            .await
    }

    /// Activates a load balancer version.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/post-origin-activations>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn activate_load_balancer_version(
        &self,
        params: ActivateLoadBalancerVersionRequest,
    ) -> Result<LoadBalancerActivation> {
        debug!("ActivateLoadBalancerVersion");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_ACTIVATE_LB_VERSION,
            errors,
        })?;

        let mut url = self.endpoint(
            OP_ACTIVATE_LB_VERSION,
            &format!("/cloudlets/api/v2/origins/{}/activations", params.origin_id),
        )?;
        url.query_pairs_mut()
            .append_pair("async", &params.run_async.to_string());
        self.send_json(
            OP_ACTIVATE_LB_VERSION,
            Method::POST,
            url,
            &params.activation,
            StatusCode::OK,
        )
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
    async fn list_activations_uses_lowercase_network_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cloudlets/api/v2/origins/alb_krk/activations"))
            .and(query_param("network", "prod"))
            .and(query_param("latestOnly", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "activatedBy": "jsmith",
                    "activatedDate": "2021-09-01T10:00:00.000Z",
                    "network": "PRODUCTION",
                    "originId": "alb_krk",
                    "status": "active",
                    "version": 2
                }
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let activations = client
            .list_load_balancer_activations(ListLoadBalancerActivationsRequest {
                origin_id: "alb_krk".to_string(),
                network: Some(LoadBalancerActivationNetwork::Production),
                latest_only: true,
                ..ListLoadBalancerActivationsRequest::default()
            })
            .await
            .unwrap();

        assert_eq!(activations.len(), 1);
        assert_eq!(
            activations[0].network,
            LoadBalancerActivationNetwork::Production
        );
        assert_eq!(
            activations[0].status,
            Some(LoadBalancerActivationStatus::Active)
        );
    }

    #[tokio::test]
    async fn activate_posts_uppercase_network_in_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cloudlets/api/v2/origins/alb_krk/activations"))
            .and(query_param("async", "false"))
            .and(body_json(json!({"network": "STAGING", "version": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "activatedBy": "jsmith",
                "network": "STAGING",
                "originId": "alb_krk",
                "status": "pending",
                "version": 2
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let activation = client
            .activate_load_balancer_version(ActivateLoadBalancerVersionRequest {
                origin_id: "alb_krk".to_string(),
                run_async: false,
                activation: LoadBalancerVersionActivation {
                    network: LoadBalancerActivationNetwork::Staging,
                    dry_run: false,
                    version: 2,
                },
            })
            .await
            .unwrap();
        assert_eq!(activation.status, Some(LoadBalancerActivationStatus::Pending));
    }

    #[tokio::test]
    async fn activate_requires_origin_id() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let err = client
            .activate_load_balancer_version(ActivateLoadBalancerVersionRequest {
                origin_id: String::new(),
                run_async: false,
                activation: LoadBalancerVersionActivation {
                    network: LoadBalancerActivationNetwork::Staging,
                    dry_run: false,
                    version: 2,
                },
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "activate load balancer version: struct validation:\nOriginID: cannot be blank"
        );
    }
}
