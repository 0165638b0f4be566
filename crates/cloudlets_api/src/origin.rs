//! Origins (conditional origins referenced by cloudlets policies).

use cloudlets_rules::validate::{self, Validate, ValidationErrors};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};

const OP_LIST_ORIGINS: &str = "list origins";
const OP_GET_ORIGIN: &str = "get origin";
const OP_CREATE_ORIGIN: &str = "create origin";
const OP_UPDATE_ORIGIN: &str = "update origin";

/// Origin type filter for [`Client::list_origins`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginType {
    /// Customer origins.
    #[serde(rename = "CUSTOMER")]
    Customer,
    /// Application Load Balancer logical origins.
    #[serde(rename = "APPLICATION_LOAD_BALANCER")]
    ApplicationLoadBalancer,
    /// NetStorage origins.
    #[serde(rename = "NETSTORAGE")]
    NetStorage,
}

impl OriginType {
    /// The wire spelling of this origin type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::ApplicationLoadBalancer => "APPLICATION_LOAD_BALANCER",
            Self::NetStorage => "NETSTORAGE",
        }
    }
}

/// An origin configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Origin {
    /// Origin identifier.
    pub origin_id: String,
    /// Free-text description.
    pub description: String,
    /// Whether the origin is served through Akamai.
    pub akamaized: bool,
    /// Configuration checksum.
    pub checksum: String,
    /// Origin type (`CUSTOMER`, `APPLICATION_LOAD_BALANCER`, `NETSTORAGE`).
    #[serde(rename = "type")]
    pub origin_type: String,
}

/// An origin as returned by [`Client::list_origins`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginResponse {
    /// Hostname the origin resolves to.
    pub hostname: String,
    /// The origin itself.
    #[serde(flatten)]
    pub origin: Origin,
}

/// Parameters for [`Client::list_origins`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOriginsRequest {
    /// Restricts the listing to one origin type; `None` lists all types.
    pub origin_type: Option<OriginType>,
}

/// Parameters for [`Client::get_origin`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOriginRequest {
    /// Origin identifier.
    pub origin_id: String,
}

/// Parameters for [`Client::create_origin`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOriginRequest {
    /// Origin identifier.
    pub origin_id: String,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Parameters for [`Client::update_origin`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOriginRequest {
    /// Origin identifier.
    pub origin_id: String,
    /// New description.
    pub description: Option<String>,
}

#[derive(Serialize)]
struct DescriptionBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl Validate for CreateOriginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "OriginID",
            validate::not_blank(Some(&self.origin_id))
                .or_else(|| validate::length(Some(&self.origin_id), 2, 63)),
        );
        errors.check(
            "Description",
            validate::length(self.description.as_deref(), 0, 255),
        );
        errors.into_result()
    }
}

impl Validate for UpdateOriginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "OriginID",
            validate::not_blank(Some(&self.origin_id))
                .or_else(|| validate::length(Some(&self.origin_id), 2, 63)),
        );
        errors.check(
            "Description",
            validate::length(self.description.as_deref(), 0, 255),
        );
        errors.into_result()
    }
}

impl Client {
    /// Lists all origins of the requested type for the current account.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-origins>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the request fails or the API rejects it.
    pub async fn list_origins(&self, params: ListOriginsRequest) -> Result<Vec<OriginResponse>> {
        debug!("ListOrigins");

        let mut url = self.endpoint(OP_LIST_ORIGINS, "/cloudlets/api/v2/origins")?;
        if let Some(origin_type) = params.origin_type {
            url.query_pairs_mut().append_pair("type", origin_type.as_str());
        }
        self.get_json(OP_LIST_ORIGINS, url, StatusCode::OK).await
    }

    /// Gets a specific origin by its identifier. Only available for the
    /// `APPLICATION_LOAD_BALANCER` origin type.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-origin>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the request fails or the API rejects it.
    pub async fn get_origin(&self, params: GetOriginRequest) -> Result<Origin> {
        debug!("GetOrigin");

        let url = self.endpoint(
            OP_GET_ORIGIN,
            &format!("/cloudlets/api/v2/origins/{}", params.origin_id),
        )?;
        self.get_json(OP_GET_ORIGIN, url, StatusCode::OK).await
    }

    /// Creates configuration for an origin. Only available for the
    /// `APPLICATION_LOAD_BALANCER` origin type.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/post-origin>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn create_origin(&self, params: CreateOriginRequest) -> Result<Origin> {
        debug!("CreateOrigin");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_CREATE_ORIGIN,
            errors,
        })?;

        let url = self.endpoint(OP_CREATE_ORIGIN, "/cloudlets/api/v2/origins")?;
        self.send_json(OP_CREATE_ORIGIN, Method::POST, url, &params, StatusCode::CREATED)
            .await
    }

    /// Updates configuration for an origin. Only available for the
    /// `APPLICATION_LOAD_BALANCER` origin type.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/put-origin>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn update_origin(&self, params: UpdateOriginRequest) -> Result<Origin> {
        debug!("UpdateOrigin");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_UPDATE_ORIGIN,
            errors,
        })?;

        let url = self.endpoint(
            OP_UPDATE_ORIGIN,
            &format!("/cloudlets/api/v2/origins/{}", params.origin_id),
        )?;
        let body = DescriptionBody {
            description: params.description.as_deref(),
        };
        self.send_json(OP_UPDATE_ORIGIN, Method::PUT, url, &body, StatusCode::OK)
            .await
    }
}
