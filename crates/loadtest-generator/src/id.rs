//! Unique registration identifiers.

use crate::blob::fill_random;
use crate::error::BlobError;
use uuid::{Builder, Uuid};

/// Generate a random UUID v4 from the OS randomness source.
///
/// Unlike `Uuid::new_v4`, a randomness failure is returned instead of
/// panicking.
pub fn unique_id() -> Result<Uuid, BlobError> {
    let mut bytes = [0u8; 16];
    fill_random(&mut bytes)?;

    // Sets version (4) and variant (RFC 4122) bits
    Ok(Builder::from_random_bytes(bytes).into_uuid())
}
