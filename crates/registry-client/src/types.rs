//! Catalog wire types.
//!
//! Field names follow the Consul HTTP API (`PUT /v1/catalog/register`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status used for every fabricated health check.
pub const CHECK_STATUS_PASSING: &str = "passing";

/// One catalog registration request.
///
/// A registration always names a node. It may also carry a single service
/// and any number of health checks for that node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRegistration {
    #[serde(rename = "ID", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "Node")]
    pub node: String,

    #[serde(rename = "Address")]
    pub address: String,

    #[serde(rename = "NodeMeta", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_meta: BTreeMap<String, String>,

    #[serde(rename = "Service", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<AgentService>,

    #[serde(rename = "Checks", default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<HealthCheck>,
}

/// A service instance attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentService {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "Service")]
    pub service: String,

    #[serde(rename = "Port")]
    pub port: u16,

    #[serde(rename = "Meta", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

/// A health check attached to a node, optionally bound to one of its
/// services.
///
/// Empty `service_id`/`service_name` means a node-level check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    #[serde(rename = "Node")]
    pub node: String,

    #[serde(rename = "CheckID")]
    pub check_id: String,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Status")]
    pub status: String,

    #[serde(rename = "Output", default, skip_serializing_if = "String::is_empty")]
    pub output: String,

    #[serde(rename = "ServiceID", default)]
    pub service_id: String,

    #[serde(rename = "ServiceName", default)]
    pub service_name: String,
}
