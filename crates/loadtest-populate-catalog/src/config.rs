//! Immutable catalog scale configuration.

use crate::error::RecordError;

/// Synthetic IPv4 address space.
///
/// Node index `i` maps to block `a = i / span` and host `i - a * span`. The
/// block is spread over the second and third octets, so the address is
/// `10.<a / 256>.<a % 256>.<host>`. At most `span * octet_budget` nodes fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSpace {
    /// Hosts per block, 1..=256.
    pub span: u32,
    /// Number of blocks, 1..=65536.
    pub octet_budget: u32,
}

impl AddressSpace {
    pub const MAX_SPAN: u32 = 256;
    pub const MAX_OCTET_BUDGET: u32 = 256 * 256;

    /// Number of node indices that map to a distinct address.
    pub fn capacity(&self) -> u64 {
        u64::from(self.span) * u64::from(self.octet_budget)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.span == 0 || self.span > Self::MAX_SPAN {
            return Err(RecordError::InvalidConfig(format!(
                "address span must be in 1..={}, got {}",
                Self::MAX_SPAN,
                self.span
            )));
        }
        if self.octet_budget == 0 || self.octet_budget > Self::MAX_OCTET_BUDGET {
            return Err(RecordError::InvalidConfig(format!(
                "address octet budget must be in 1..={}, got {}",
                Self::MAX_OCTET_BUDGET,
                self.octet_budget
            )));
        }
        Ok(())
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self {
            span: 128,
            octet_budget: Self::MAX_OCTET_BUDGET,
        }
    }
}

/// Sizes of the random hex padding attached to each record. Zero disables
/// the padding field entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    /// `blob` entry in node meta
    pub node_meta_bytes: usize,
    /// `blob` entry in service meta
    pub service_meta_bytes: usize,
    /// Check output
    pub check_output_bytes: usize,
}

/// Shape and size of the fabricated catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub nodes: u64,
    pub services_per_node: u32,
    pub checks_per_service: u32,
    /// Port of service 0; service `s` listens on `base_port + s`.
    pub base_port: u16,
    pub address_space: AddressSpace,
    pub padding: Padding,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            nodes: 300_000,
            services_per_node: 10,
            checks_per_service: 3,
            base_port: 8080,
            address_space: AddressSpace::default(),
            padding: Padding::default(),
        }
    }
}

impl CatalogConfig {
    /// Check the configuration before any record is built.
    ///
    /// Rejects a node count the address space cannot hold, so an overflow
    /// is reported up front rather than part way through a run.
    pub fn validate(&self) -> Result<(), RecordError> {
        self.address_space.validate()?;

        let capacity = self.address_space.capacity();
        if self.nodes > capacity {
            return Err(RecordError::AddressSpaceExhausted {
                // First index that does not fit
                index: capacity,
                span: self.address_space.span,
                octet_budget: self.address_space.octet_budget,
                capacity,
            });
        }

        if self.services_per_node > 0 {
            let last_port = u64::from(self.base_port) + u64::from(self.services_per_node) - 1;
            if last_port > u64::from(u16::MAX) {
                return Err(RecordError::InvalidConfig(format!(
                    "base port {} with {} services per node overflows the port range",
                    self.base_port, self.services_per_node
                )));
            }
        }

        Ok(())
    }
}
