//! Fixed-size random payloads.

use crate::error::BlobError;
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Fill `dst` from the OS randomness source.
pub(crate) fn fill_random(dst: &mut [u8]) -> Result<(), BlobError> {
    OsRng.try_fill_bytes(dst)?;
    Ok(())
}

/// Generate `size` cryptographically random bytes.
pub fn random_bytes(size: usize) -> Result<Vec<u8>, BlobError> {
    let mut buf = vec![0u8; size];
    fill_random(&mut buf)?;
    Ok(buf)
}

/// Generate a hex string of roughly `size` characters.
///
/// `size / 2` random bytes are drawn and hex-encoded, so an odd `size`
/// yields `size - 1` characters.
pub fn random_hex(size: usize) -> Result<String, BlobError> {
    let bytes = random_bytes(size / 2)?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length() {
        assert_eq!(random_bytes(0).unwrap().len(), 0);
        assert_eq!(random_bytes(400).unwrap().len(), 400);
        assert_eq!(random_bytes(400 * 1024).unwrap().len(), 400 * 1024);
    }

    #[test]
    fn test_random_bytes_not_repeated() {
        // 32 bytes of OS randomness colliding would mean a broken source
        let a = random_bytes(32).unwrap();
        let b = random_bytes(32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_hex_length_and_alphabet() {
        let value = random_hex(1024).unwrap();
        assert_eq!(value.len(), 1024);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));

        // Odd sizes round down
        assert_eq!(random_hex(501).unwrap().len(), 500);
        assert_eq!(random_hex(1).unwrap(), "");
    }
}
