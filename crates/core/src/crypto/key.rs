//! Encryption key loading.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::error::KeyError;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// A 32-byte field encryption key.
///
/// The bytes are wiped on drop and never appear in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    /// Wraps raw key bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Copies a key out of a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|_| KeyError::InvalidLength {
            expected: KEY_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(key))
    }

    /// Parses a hex-encoded key, as stored in configuration.
    ///
    /// Surrounding whitespace is ignored. An empty value is reported as
    /// [`KeyError::Missing`] so startup can say what is wrong.
    ///
    /// # Example
    ///
    /// ```
    /// use transposit_core::crypto::{EncryptionKey, KeyError};
    ///
    /// let hex = "00".repeat(32);
    /// assert!(EncryptionKey::from_hex(&hex).is_ok());
    /// assert_eq!(EncryptionKey::from_hex("").unwrap_err(), KeyError::Missing);
    /// ```
    pub fn from_hex(encoded: &str) -> Result<Self, KeyError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(KeyError::Missing);
        }

        let bytes = Zeroizing::new(hex::decode(encoded).map_err(|_| KeyError::InvalidHex)?);
        Self::from_slice(&bytes)
    }

    pub(crate) const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey([hidden])")
    }
}
