//! Deterministic record construction from a node index.
//!
//! Names and addresses are pure functions of indices, so they are unique
//! within their parent scope by construction. Only the node ID and the
//! optional padding are random.

use crate::config::{AddressSpace, CatalogConfig};
use crate::error::RecordError;
use loadtest_generator::{random_hex, unique_id};
use registry_client::CHECK_STATUS_PASSING;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use uuid::Uuid;

/// Meta key holding padding blobs.
pub const BLOB_META_KEY: &str = "blob";

/// Minimum zero-padded widths of node, service and check names.
const NODE_NAME_MIN_WIDTH: usize = 5;
const SERVICE_NAME_MIN_WIDTH: usize = 5;
const CHECK_NAME_MIN_WIDTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub name: String,
    pub address: Ipv4Addr,
    pub id: Uuid,
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    pub port: u16,
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub id: String,
    pub name: String,
    pub status: String,
    /// Empty for node-level checks
    pub service_id: String,
    /// Empty for node-level checks
    pub service_name: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceWithChecks {
    pub service: ServiceRecord,
    pub checks: Vec<CheckRecord>,
}

/// A node and its full subtree, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecords {
    pub node: NodeRecord,
    pub services: Vec<ServiceWithChecks>,
}

/// Map a node index to its synthetic address.
///
/// Fails instead of wrapping when the index does not fit `space`; a wrapped
/// address would alias another node's.
pub fn derive_address(index: u64, space: AddressSpace) -> Result<Ipv4Addr, RecordError> {
    let overflow = || RecordError::AddressSpaceExhausted {
        index,
        span: space.span,
        octet_budget: space.octet_budget,
        capacity: space.capacity(),
    };

    let span = u64::from(space.span);
    if span == 0 || span > u64::from(AddressSpace::MAX_SPAN) {
        return Err(overflow());
    }

    let block = index / span;
    let host = index - block * span;
    if host >= span || block >= u64::from(space.octet_budget.min(AddressSpace::MAX_OCTET_BUDGET)) {
        return Err(overflow());
    }

    // block < 65536 and host < 256 after the checks above
    Ok(Ipv4Addr::new(
        10,
        (block / 256) as u8,
        (block % 256) as u8,
        host as u8,
    ))
}

/// Zero-padded width that fits every index in `0..count`, at least `min`.
pub fn index_width(count: u64, min: usize) -> usize {
    count.saturating_sub(1).to_string().len().max(min)
}

/// Service name for the `index`th service of a node.
pub fn service_name(index: u32, width: usize) -> String {
    format!("app-{index:0width$}")
}

/// Check name for the `index`th check of a service.
pub fn check_name(index: u32, width: usize) -> String {
    format!("chk-{index:0width$}")
}

/// Node-scoped check ID: check names repeat across services, IDs must not.
pub fn check_id(service: &str, index: u32, width: usize) -> String {
    format!("{service}:{}", check_name(index, width))
}

/// Builds the records for one node index.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    config: CatalogConfig,
    node_name_width: usize,
    service_name_width: usize,
    check_name_width: usize,
}

impl RecordBuilder {
    /// Validate `config` and create a builder.
    pub fn new(config: CatalogConfig) -> Result<Self, RecordError> {
        config.validate()?;

        let node_name_width = index_width(config.nodes, NODE_NAME_MIN_WIDTH);
        let service_name_width =
            index_width(u64::from(config.services_per_node), SERVICE_NAME_MIN_WIDTH);
        let check_name_width =
            index_width(u64::from(config.checks_per_service), CHECK_NAME_MIN_WIDTH);

        Ok(Self {
            config,
            node_name_width,
            service_name_width,
            check_name_width,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Zero-padded node name; the width covers the whole configured range
    /// so names sort lexically in index order.
    pub fn node_name(&self, index: u64) -> String {
        format!("client-{index:0width$}", width = self.node_name_width)
    }

    /// Service name, padded to cover `services_per_node`.
    pub fn service_name(&self, index: u32) -> String {
        service_name(index, self.service_name_width)
    }

    /// Check name, padded to cover `checks_per_service`.
    pub fn check_name(&self, index: u32) -> String {
        check_name(index, self.check_name_width)
    }

    pub fn address_for(&self, index: u64) -> Result<Ipv4Addr, RecordError> {
        derive_address(index, self.config.address_space)
    }

    /// Build a node and its services and checks.
    pub fn build_node(&self, index: u64) -> Result<NodeRecords, RecordError> {
        let name = self.node_name(index);
        let address = self.address_for(index)?;
        let node = NodeRecord {
            address,
            id: unique_id()?,
            meta: blob_meta(self.config.padding.node_meta_bytes)?,
            name,
        };

        let services = (0..self.config.services_per_node)
            .map(|svc_idx| self.build_service(svc_idx))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NodeRecords { node, services })
    }

    fn build_service(&self, svc_idx: u32) -> Result<ServiceWithChecks, RecordError> {
        let name = self.service_name(svc_idx);
        // Range checked by CatalogConfig::validate
        let port = (u32::from(self.config.base_port) + svc_idx) as u16;
        let service = ServiceRecord {
            id: name.clone(),
            name,
            port,
            meta: blob_meta(self.config.padding.service_meta_bytes)?,
        };

        let checks = (0..self.config.checks_per_service)
            .map(|chk_idx| self.build_check(&service, chk_idx))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ServiceWithChecks { service, checks })
    }

    fn build_check(&self, service: &ServiceRecord, chk_idx: u32) -> Result<CheckRecord, RecordError> {
        // The first check of every service stands alone as a node-level check
        let (service_id, service_name) = if chk_idx == 0 {
            (String::new(), String::new())
        } else {
            (service.id.clone(), service.name.clone())
        };

        Ok(CheckRecord {
            id: check_id(&service.id, chk_idx, self.check_name_width),
            name: self.check_name(chk_idx),
            status: CHECK_STATUS_PASSING.to_string(),
            service_id,
            service_name,
            output: padding(self.config.padding.check_output_bytes)?,
        })
    }
}

fn padding(size: usize) -> Result<String, RecordError> {
    if size == 0 {
        return Ok(String::new());
    }
    Ok(random_hex(size)?)
}

fn blob_meta(size: usize) -> Result<BTreeMap<String, String>, RecordError> {
    let mut meta = BTreeMap::new();
    if size > 0 {
        meta.insert(BLOB_META_KEY.to_string(), padding(size)?);
    }
    Ok(meta)
}
