//! Field cipher error types.

use thiserror::Error;

/// Errors raised by a [`FieldCipher`](super::FieldCipher).
#[derive(Debug, Error)]
pub enum CipherError {
    /// The cipher could not produce an envelope.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// The envelope could not be turned back into plaintext.
    #[error("decryption failed: {0}")]
    Decryption(#[from] DecryptFailure),
}

impl CipherError {
    /// Returns true if this error came from the decrypt path.
    #[must_use]
    pub const fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }
}

/// Why an envelope failed to decrypt.
///
/// The variants never carry key material or plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptFailure {
    /// The stored text is not `iv_hex:ciphertext_hex`.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    /// Wrong key, or the envelope was altered after it was written.
    #[error("authentication failed")]
    Authentication,

    /// The decrypted bytes are not UTF-8.
    #[error("plaintext is not valid UTF-8")]
    InvalidUtf8,

    /// The decrypted text was expected to be a decimal number.
    #[error("plaintext is not a decimal number")]
    NotADecimal,
}

/// Errors raised while loading an [`EncryptionKey`](super::EncryptionKey).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// No key was configured.
    #[error("encryption key is missing")]
    Missing,

    /// The configured key is not hex.
    #[error("encryption key is not valid hex")]
    InvalidHex,

    /// The configured key decodes to the wrong number of bytes.
    #[error("encryption key must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required key length in bytes.
        expected: usize,
        /// Length of the decoded key.
        actual: usize,
    },
}
