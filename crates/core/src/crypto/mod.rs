//! Field-level encryption of sensitive column values.
//!
//! Every sensitive value (account and routing numbers, amounts, deposit
//! sources) is stored as a text envelope `iv_hex:ciphertext_hex`. Encoding
//! draws a fresh random IV each time, so equal plaintexts produce different
//! envelopes and the database cannot match on them.
//!
//! Callers hold a cipher as `Arc<dyn FieldCipher>`; it carries no mutable
//! state and is safe to share across tasks.

mod cipher;
mod envelope;
mod error;
mod key;

#[cfg(test)]
mod cipher_props;

use std::fmt;

use rust_decimal::Decimal;

pub use cipher::AesCbcCipher;
pub use envelope::{BLOCK_LEN, Envelope, IV_LEN, TAG_LEN};
pub use error::{CipherError, DecryptFailure, KeyError};
pub use key::{EncryptionKey, KEY_LEN};

/// Reversible encoding of a single text value.
pub trait FieldCipher: Send + Sync + fmt::Debug {
    /// Encrypts `plaintext` into an envelope string.
    fn encode(&self, plaintext: &str) -> Result<String, CipherError>;

    /// Decrypts an envelope string back to its plaintext.
    ///
    /// Fails with [`CipherError::Decryption`] for malformed input, a
    /// different key, or any alteration of the envelope.
    fn decode(&self, envelope: &str) -> Result<String, CipherError>;

    /// Encrypts a decimal using its canonical string form, scale included.
    fn encode_decimal(&self, value: Decimal) -> Result<String, CipherError> {
        self.encode(&value.to_string())
    }

    /// Decrypts an envelope and parses the plaintext as a decimal.
    fn decode_decimal(&self, envelope: &str) -> Result<Decimal, CipherError> {
        let plaintext = self.decode(envelope)?;
        plaintext
            .parse::<Decimal>()
            .map_err(|_| CipherError::Decryption(DecryptFailure::NotADecimal))
    }
}
