//! Load balancer (ALB origin) versions.

use std::collections::HashMap;

use chrono::DateTime;
use cloudlets_rules::validate::{self, Validate, ValidationErrors};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::policy_version::Warning;

const OP_CREATE_LB_VERSION: &str = "create origin version";
const OP_GET_LB_VERSION: &str = "get origin version";
const OP_UPDATE_LB_VERSION: &str = "update origin version";
const OP_LIST_LB_VERSIONS: &str = "list origin versions";

/// `balancingType` value for weighted load balancing.
pub const BALANCING_TYPE_WEIGHTED: &str = "WEIGHTED";
/// `balancingType` value for performance-based load balancing.
pub const BALANCING_TYPE_PERFORMANCE: &str = "PERFORMANCE";

/// A data center behind an Application Load Balancer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataCenter {
    /// City the data center is located in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Whether the cloud server host header is overridden.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub cloud_server_host_header_override: bool,
    /// Whether the data center is a cloud service.
    pub cloud_service: bool,
    /// Continent code: `AF`, `AS`, `EU`, `NA`, `OC`, `OT` or `SA`.
    pub continent: String,
    /// Two-letter country code.
    pub country: String,
    /// Hostname of the data center.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Latitude, degrees.
    pub latitude: Option<f64>,
    /// Hosts probed for liveness.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub liveness_hosts: Vec<String>,
    /// Longitude, degrees.
    pub longitude: Option<f64>,
    /// Origin backing this data center.
    pub origin_id: String,
    /// Share of traffic routed here, in percent.
    pub percent: Option<f64>,
    /// State or province, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_or_province: Option<String>,
}

/// Liveness probing settings of a load balancer version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LivenessSettings {
    /// Host header sent with probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
    /// Additional probe headers.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub additional_headers: HashMap<String, String>,
    /// Probe interval, seconds.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub interval: i64,
    /// Probe path; required for HTTP and HTTPS probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Whether the peer certificate is verified.
    #[serde(skip_serializing_if = "crate::ser::is_false")]
    pub peer_certificate_verification: bool,
    /// Probe port.
    pub port: i64,
    /// Probe protocol: `HTTP`, `HTTPS`, `TCP` or `TCPS`.
    pub protocol: String,
    /// Request payload; required for TCP and TCPS probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_string: Option<String>,
    /// Expected response payload; required for TCP and TCPS probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_string: Option<String>,
    /// Whether a 3xx response counts as failure.
    #[serde(rename = "status3xxFailure", skip_serializing_if = "crate::ser::is_false")]
    pub status_3xx_failure: bool,
    /// Whether a 4xx response counts as failure.
    #[serde(rename = "status4xxFailure", skip_serializing_if = "crate::ser::is_false")]
    pub status_4xx_failure: bool,
    /// Whether a 5xx response counts as failure.
    #[serde(rename = "status5xxFailure", skip_serializing_if = "crate::ser::is_false")]
    pub status_5xx_failure: bool,
    /// Probe timeout, seconds.
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub timeout: f64,
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::float_cmp)]
fn is_zero_f64(value: &f64) -> bool {
    *value == 0.0
}

/// A load balancer version: traffic split plus liveness configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadBalancerVersion {
    /// `WEIGHTED` or `PERFORMANCE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balancing_type: Option<String>,
    /// User who created the version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Creation timestamp, RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    /// The traffic split across data centers.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub data_centers: Vec<DataCenter>,
    /// Whether the version is deleted.
    pub deleted: bool,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the version can still be modified.
    pub immutable: bool,
    /// User who last modified the version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    /// Last modification timestamp, RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
    /// Liveness probing settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liveness_settings: Option<LivenessSettings>,
    /// Origin the version belongs to.
    #[serde(rename = "originID", skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,
    /// Version number.
    #[serde(skip_serializing_if = "crate::ser::is_zero")]
    pub version: i64,
    /// Validation warnings reported by the service.
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::ser::null_as_default"
    )]
    pub warnings: Vec<Warning>,
}

/// Parameters for [`Client::create_load_balancer_version`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateLoadBalancerVersionRequest {
    /// Origin identifier.
    pub origin_id: String,
    /// The version to create.
    pub version: LoadBalancerVersion,
}

/// Parameters for [`Client::get_load_balancer_version`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetLoadBalancerVersionRequest {
    /// Origin identifier.
    pub origin_id: String,
    /// Version number.
    pub version: i64,
    /// Whether the service validates the version while fetching it.
    pub should_validate: bool,
}

/// Parameters for [`Client::update_load_balancer_version`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateLoadBalancerVersionRequest {
    /// Origin identifier.
    pub origin_id: String,
    /// Version number.
    pub version: i64,
    /// Whether the service validates the version while updating it.
    pub should_validate: bool,
    /// The new version content.
    pub update: LoadBalancerVersion,
}

/// Parameters for [`Client::list_load_balancer_versions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListLoadBalancerVersionsRequest {
    /// Origin identifier.
    pub origin_id: String,
}

fn rfc3339_violation(value: Option<&str>) -> Option<String> {
    let value = value.unwrap_or_default();
    (!value.is_empty() && DateTime::parse_from_rfc3339(value).is_err())
        .then(|| "must be a valid date".to_string())
}

impl Validate for DataCenter {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "Continent",
            validate::not_blank(Some(&self.continent)).or_else(|| {
                (!["AF", "AS", "EU", "NA", "OC", "OT", "SA"].contains(&self.continent.as_str()))
                    .then(|| {
                        format!(
                            "value '{}' is invalid. Must be one of: 'AF', 'AS', 'EU', 'NA', \
                             'OC', 'OT' or 'SA'",
                            self.continent
                        )
                    })
            }),
        );
        errors.check(
            "Country",
            validate::not_blank(Some(&self.country))
                .or_else(|| validate::length(Some(&self.country), 2, 2)),
        );
        errors.check("Hostname", validate::length(self.hostname.as_deref(), 0, 256));
        errors.check(
            "Latitude",
            validate::not_nil(self.latitude.as_ref()).or_else(|| {
                self.latitude.and_then(|latitude| {
                    validate::at_least_f64(latitude, -180.0)
                        .or_else(|| validate::at_most_f64(latitude, 180.0))
                })
            }),
        );
        errors.check(
            "Longitude",
            validate::not_nil(self.longitude.as_ref()).or_else(|| {
                self.longitude.and_then(|longitude| {
                    validate::at_least_f64(longitude, -180.0)
                        .or_else(|| validate::at_most_f64(longitude, 180.0))
                })
            }),
        );
        errors.check(
            "OriginID",
            validate::not_blank(Some(&self.origin_id))
                .or_else(|| validate::length(Some(&self.origin_id), 1, 128)),
        );
        errors.check(
            "Percent",
            validate::not_nil(self.percent.as_ref()).or_else(|| {
                self.percent.and_then(|percent| {
                    validate::at_least_f64(percent, 0.0)
                        .or_else(|| validate::at_most_f64(percent, 100.0))
                })
            }),
        );
        errors.into_result()
    }
}

impl Validate for LivenessSettings {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "HostHeader",
            validate::length(self.host_header.as_deref(), 1, 256),
        );
        let mut header_names: Vec<&String> = self.additional_headers.keys().collect();
        header_names.sort();
        for name in header_names {
            if name.eq_ignore_ascii_case("host") {
                errors.check(
                    &format!("AdditionalHeaders.{name}"),
                    validate::length(self.additional_headers.get(name).map(String::as_str), 1, 256),
                );
            }
        }
        errors.check(
            "Interval",
            validate::at_least(self.interval, 10).or_else(|| validate::at_most(self.interval, 3600)),
        );
        let http_probe = self.protocol == "HTTP" || self.protocol == "HTTPS";
        errors.check(
            "Path",
            http_probe
                .then(|| {
                    validate::not_blank(self.path.as_deref())
                        .or_else(|| validate::length(self.path.as_deref(), 1, 256))
                })
                .flatten(),
        );
        errors.check(
            "Port",
            validate::nonzero(self.port)
                .or_else(|| validate::at_least(self.port, 1))
                .or_else(|| validate::at_most(self.port, 65535)),
        );
        errors.check(
            "Protocol",
            validate::not_blank(Some(&self.protocol)).or_else(|| {
                (!["HTTP", "HTTPS", "TCP", "TCPS"].contains(&self.protocol.as_str())).then(|| {
                    format!(
                        "value '{}' is invalid. Must be one of: 'HTTP', 'HTTPS', 'TCP' or 'TCPS'",
                        self.protocol
                    )
                })
            }),
        );
        let tcp_probe = self.protocol == "TCP" || self.protocol == "TCPS";
        errors.check(
            "RequestString",
            tcp_probe
                .then(|| validate::not_blank(self.request_string.as_deref()))
                .flatten(),
        );
        errors.check(
            "ResponseString",
            tcp_probe
                .then(|| validate::not_blank(self.response_string.as_deref()))
                .flatten(),
        );
        errors.check(
            "Timeout",
            validate::at_least_f64(self.timeout, 0.001)
                .or_else(|| validate::at_most_f64(self.timeout, 60.0)),
        );
        errors.into_result()
    }
}

impl Validate for LoadBalancerVersion {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let balancing_type = self.balancing_type.as_deref().unwrap_or_default();
        errors.check(
            "BalancingType",
            (!balancing_type.is_empty()
                && ![BALANCING_TYPE_WEIGHTED, BALANCING_TYPE_PERFORMANCE]
                    .contains(&balancing_type))
            .then(|| {
                format!(
                    "value '{balancing_type}' is invalid. Must be one of: 'WEIGHTED', \
                     'PERFORMANCE' or '' (empty)"
                )
            }),
        );
        errors.check("CreatedDate", rfc3339_violation(self.created_date.as_deref()));
        errors.check(
            "DataCenters",
            validate::length_of(self.data_centers.len(), 1, 199),
        );
        for (index, data_center) in self.data_centers.iter().enumerate() {
            errors.merge(&format!("DataCenters[{index}]"), data_center.validate());
        }
        errors.check(
            "LastModifiedDate",
            rfc3339_violation(self.last_modified_date.as_deref()),
        );
        if let Some(liveness_settings) = &self.liveness_settings {
            errors.merge("LivenessSettings", liveness_settings.validate());
        }
        errors.check(
            "OriginID",
            validate::length(self.origin_id.as_deref(), 2, 62),
        );
        errors.check("Version", validate::at_least(self.version, 0));
        for (index, warning) in self.warnings.iter().enumerate() {
            errors.merge(&format!("Warnings[{index}]"), warning.validate());
        }
        errors.into_result()
    }
}

impl Validate for CreateLoadBalancerVersionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("OriginID", validate::length(Some(&self.origin_id), 2, 62));
        errors.merge("LoadBalancerVersion", self.version.validate());
        errors.into_result()
    }
}

impl Validate for GetLoadBalancerVersionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("OriginID", validate::length(Some(&self.origin_id), 2, 62));
        errors.check("Version", validate::at_least(self.version, 0));
        errors.into_result()
    }
}

impl Validate for UpdateLoadBalancerVersionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("OriginID", validate::length(Some(&self.origin_id), 2, 62));
        errors.check("Version", validate::at_least(self.version, 0));
        errors.merge("LoadBalancerVersion", self.update.validate());
        errors.into_result()
    }
}

impl Validate for ListLoadBalancerVersionsRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "OriginID",
            validate::not_blank(Some(&self.origin_id))
                .or_else(|| validate::length(Some(&self.origin_id), 2, 62)),
        );
        errors.into_result()
    }
}

impl Client {
    /// Creates a load balancer version.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/post-origin-versions>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn create_load_balancer_version(
        &self,
        params: CreateLoadBalancerVersionRequest,
    ) -> Result<LoadBalancerVersion> {
        debug!("CreateLoadBalancerVersion");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_CREATE_LB_VERSION,
            errors,
        })?;

        let url = self.endpoint(
            OP_CREATE_LB_VERSION,
            &format!("/cloudlets/api/v2/origins/{}/versions", params.origin_id),
        )?;
        self.send_json(
            OP_CREATE_LB_VERSION,
            Method::POST,
            url,
            &params.version,
            StatusCode::CREATED,
        )
        .await
    }

    /// Gets a load balancer version by origin identifier and version number.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-origin-version>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn get_load_balancer_version(
        &self,
        params: GetLoadBalancerVersionRequest,
    ) -> Result<LoadBalancerVersion> {
        debug!("GetLoadBalancerVersion");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_GET_LB_VERSION,
            errors,
        })?;

        let mut url = self.endpoint(
            OP_GET_LB_VERSION,
            &format!(
                "/cloudlets/api/v2/origins/{}/versions/{}",
                params.origin_id, params.version
            ),
        )?;
        if params.should_validate {
            url.query_pairs_mut().append_pair("validate", "true");
        }
        self.get_json(OP_GET_LB_VERSION, url, StatusCode::OK).await
    }

    /// Updates a load balancer version.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/put-origin-version>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn update_load_balancer_version(
        &self,
        params: UpdateLoadBalancerVersionRequest,
    ) -> Result<LoadBalancerVersion> {
        debug!("UpdateLoadBalancerVersion");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_UPDATE_LB_VERSION,
            errors,
        })?;

        let mut url = self.endpoint(
            OP_UPDATE_LB_VERSION,
            &format!(
                "/cloudlets/api/v2/origins/{}/versions/{}",
                params.origin_id, params.version
            ),
        )?;
        if params.should_validate {
            url.query_pairs_mut().append_pair("validate", "true");
        }
        self.send_json(
            OP_UPDATE_LB_VERSION,
            Method::PUT,
            url,
            &params.update,
            StatusCode::OK,
        )
        .await
    }

    /// Lists all versions of an `APPLICATION_LOAD_BALANCER` origin.
    ///
    /// See: <https://techdocs.akamai.com/cloudlets/v2/reference/get-origin-versions>
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the parameters are invalid, the request
    /// fails or the API rejects it.
    pub async fn list_load_balancer_versions(
        &self,
        params: ListLoadBalancerVersionsRequest,
    ) -> Result<Vec<LoadBalancerVersion>> {
        debug!("ListLoadBalancerVersions");

        params.validate().map_err(|errors| Error::Validation {
            op: OP_LIST_LB_VERSIONS,
            errors,
        })?;

        let mut url = self.endpoint(
            OP_LIST_LB_VERSIONS,
            &format!("/cloudlets/api/v2/origins/{}/versions", params.origin_id),
        )?;
        url.query_pairs_mut().append_pair("includeModel", "true");
        self.get_json(OP_LIST_LB_VERSIONS, url, StatusCode::OK).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testutil::client_for;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn valid_data_center() -> DataCenter {
        DataCenter {
            continent: "EU".to_string(),
            country: "PL".to_string(),
            latitude: Some(50.06),
            longitude: Some(19.94),
            origin_id: "alb_krk".to_string(),
            percent: Some(100.0),
            ..DataCenter::default()
        }
    }

    #[test]
    fn data_center_validation_matrix() {
        assert!(valid_data_center().validate().is_ok());

        let mut missing_coordinates = valid_data_center();
        missing_coordinates.latitude = None;
        missing_coordinates.longitude = None;
        let errors = missing_coordinates.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Latitude: is required\nLongitude: is required"
        );

        let mut bad_continent = valid_data_center();
        bad_continent.continent = "XX".to_string();
        let errors = bad_continent.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Continent: value 'XX' is invalid. Must be one of: 'AF', 'AS', 'EU', 'NA', 'OC', \
             'OT' or 'SA'"
        );

        let mut bad_percent = valid_data_center();
        bad_percent.percent = Some(101.0);
        let errors = bad_percent.validate().unwrap_err();
        assert_eq!(errors.to_string(), "Percent: must be no greater than 100");
    }

    #[test]
    fn liveness_settings_require_path_for_http_probes() {
        let settings = LivenessSettings {
            port: 1234,
            protocol: "HTTP".to_string(),
            ..LivenessSettings::default()
        };
        let errors = settings.validate().unwrap_err();
        assert_eq!(errors.to_string(), "Path: cannot be blank");

        let settings = LivenessSettings {
            port: 1234,
            protocol: "TCP".to_string(),
            request_string: Some("ping".to_string()),
            response_string: Some("pong".to_string()),
            ..LivenessSettings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn version_validates_nested_data_centers() {
        let mut version = LoadBalancerVersion {
            balancing_type: Some("WEIGHTED".to_string()),
            data_centers: vec![valid_data_center()],
            ..LoadBalancerVersion::default()
        };
        assert!(version.validate().is_ok());

        version.data_centers[0].origin_id = String::new();
        let errors = version.validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "DataCenters[0].OriginID: cannot be blank"
        );

        version.created_date = Some("not-a-date".to_string());
        let errors = version.validate().unwrap_err();
        assert!(errors.to_string().contains("CreatedDate: must be a valid date"));
    }

    #[tokio::test]
    async fn get_version_appends_validate_flag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cloudlets/api/v2/origins/alb_krk/versions/2"))
            .and(query_param("validate", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "balancingType": "WEIGHTED",
                "createdBy": "jsmith",
                "createdDate": "2021-09-01T10:00:00.000Z",
                "dataCenters": null,
                "deleted": false,
                "immutable": false,
                "originID": "alb_krk",
                "version": 2
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let version = client
            .get_load_balancer_version(GetLoadBalancerVersionRequest {
                origin_id: "alb_krk".to_string(),
                version: 2,
                should_validate: true,
            })
            .await
            .unwrap();
        assert_eq!(version.balancing_type.as_deref(), Some("WEIGHTED"));
        assert!(version.data_centers.is_empty());
    }

    #[tokio::test]
    async fn list_versions_always_includes_model() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cloudlets/api/v2/origins/alb_krk/versions"))
            .and(query_param("includeModel", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let versions = client
            .list_load_balancer_versions(ListLoadBalancerVersionsRequest {
                origin_id: "alb_krk".to_string(),
            })
            .await
            .unwrap();
        assert!(versions.is_empty());
    }

    #[tokio::test]
    async fn create_version_rejects_invalid_nested_content() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let mut data_center = valid_data_center();
        data_center.country = "P".to_string();
        let err = client
            .create_load_balancer_version(CreateLoadBalancerVersionRequest {
                origin_id: "alb_krk".to_string(),
                version: LoadBalancerVersion {
                    data_centers: vec![data_center],
                    ..LoadBalancerVersion::default()
                },
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "create origin version: struct validation:\n\
             LoadBalancerVersion.DataCenters[0].Country: the length must be exactly 2"
        );
    }
}
