//! Typed REST client for the Akamai Cloudlets v2 API.
//!
//! This crate provides:
//! - A thin [`Client`] session over `reqwest` (one exchange per operation)
//! - Typed request/response models for origins, load balancer versions and
//!   activations, policies, policy versions, activations, properties and
//!   per-version rules
//! - Pre-flight validation and Akamai's Problem-Details error envelope as
//!   typed errors
//!
//! Match-rule payloads come from the [`cloudlets_rules`] crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudlets_api::{Client, ClientConfig, GetPolicyRequest};
//!
//! let client = Client::new(ClientConfig {
//!     base_url: "https://akaa-xxxx.luna.akamaiapis.net".to_string(),
//!     ..ClientConfig::default()
//! })?;
//! let policy = client.get_policy(GetPolicyRequest { policy_id: 1234 }).await?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod error;
pub mod load_balancer_activation;
pub mod load_balancer_version;
pub mod origin;
pub mod policy;
pub mod policy_activation;
pub mod policy_property;
pub mod policy_version;
pub mod policy_version_rule;
mod ser;

pub use client::{Client, ClientConfig};
pub use error::{ApiError, Error, Result};
pub use load_balancer_activation::{
    ActivateLoadBalancerVersionRequest, ListLoadBalancerActivationsRequest,
    LoadBalancerActivation, LoadBalancerActivationNetwork, LoadBalancerActivationStatus,
    LoadBalancerVersionActivation,
};
pub use load_balancer_version::{
    CreateLoadBalancerVersionRequest, DataCenter, GetLoadBalancerVersionRequest,
    ListLoadBalancerVersionsRequest, LivenessSettings, LoadBalancerVersion,
    UpdateLoadBalancerVersionRequest,
};
pub use origin::{
    CreateOriginRequest, GetOriginRequest, ListOriginsRequest, Origin, OriginResponse, OriginType,
    UpdateOriginRequest,
};
pub use policy::{
    CreatePolicyRequest, GetPolicyRequest, ListPoliciesRequest, Policy, PolicyActivation,
    PolicyActivationStatus, PolicyInfo, PropertyInfo, RemovePolicyRequest, UpdatePolicy,
    UpdatePolicyRequest,
};
pub use policy_activation::{
    ActivatePolicyVersionRequest, ListPolicyActivationsRequest, PolicyActivationNetwork,
    PolicyVersionActivation,
};
pub use policy_property::{
    CloudletsOrigin, DeletePolicyPropertyRequest, GetPolicyPropertiesRequest, NetworkStatus,
    PolicyProperty,
};
pub use policy_version::{
    CreatePolicyVersion, CreatePolicyVersionRequest, DeletePolicyVersionRequest,
    GetPolicyVersionRequest, ListPolicyVersionsRequest, PolicyVersion, UpdatePolicyVersion,
    UpdatePolicyVersionRequest, Warning,
};
pub use policy_version_rule::{
    CreatePolicyVersionRuleRequest, GetPolicyVersionRuleRequest, UpdatePolicyVersionRuleRequest,
};
