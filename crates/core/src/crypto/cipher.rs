//! AES-256-CBC field cipher with an HMAC-SHA256 tag.
//!
//! The ciphertext is PKCS#7 padded CBC under a random IV. A tag over
//! `iv || ciphertext` is appended to the ciphertext hex, keyed with a MAC key
//! derived from the encryption key. The tag is checked before any padding is
//! looked at, so a wrong key or an altered envelope is always rejected.

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use hmac::{Hmac, Mac};
use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

use super::envelope::{Envelope, IV_LEN, TAG_LEN};
use super::error::{CipherError, DecryptFailure};
use super::key::{EncryptionKey, KEY_LEN};
use super::FieldCipher;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

const MAC_KEY_LABEL: &[u8] = b"transposit.field-cipher.mac.v1";

/// The production [`FieldCipher`].
#[derive(Debug)]
pub struct AesCbcCipher {
    key: EncryptionKey,
    mac_key: EncryptionKey,
}

impl AesCbcCipher {
    /// Creates a cipher for the given key.
    #[must_use]
    pub fn new(key: EncryptionKey) -> Self {
        let mac_key = derive_mac_key(&key);
        Self { key, mac_key }
    }

    /// Encrypts raw bytes under a fresh random IV.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Envelope, CipherError> {
        let mut iv = [0u8; IV_LEN];
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|e| CipherError::Encryption(format!("random source unavailable: {e}")))?;

        let ciphertext = Aes256CbcEnc::new_from_slices(self.key.as_bytes(), &iv)
            .map_err(|_| CipherError::Encryption("invalid key or iv length".to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut mac = self
            .mac()
            .map_err(|_| CipherError::Encryption("invalid mac key length".to_string()))?;
        mac.update(&iv);
        mac.update(&ciphertext);

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&mac.finalize().into_bytes());

        Ok(Envelope::new(iv, ciphertext, tag))
    }

    /// Verifies and decrypts an envelope to raw bytes.
    pub fn open(&self, envelope: &Envelope) -> Result<Vec<u8>, CipherError> {
        let mut mac = self.mac().map_err(|_| DecryptFailure::Authentication)?;
        mac.update(envelope.iv());
        mac.update(envelope.ciphertext());
        mac.verify_slice(envelope.tag())
            .map_err(|_| DecryptFailure::Authentication)?;

        let plaintext = Aes256CbcDec::new_from_slices(self.key.as_bytes(), envelope.iv())
            .map_err(|_| DecryptFailure::Authentication)?
            .decrypt_padded_vec_mut::<Pkcs7>(envelope.ciphertext())
            .map_err(|_| DecryptFailure::Authentication)?;

        Ok(plaintext)
    }

    fn mac(&self) -> Result<HmacSha256, hmac::digest::InvalidLength> {
        <HmacSha256 as Mac>::new_from_slice(self.mac_key.as_bytes())
    }
}

impl FieldCipher for AesCbcCipher {
    fn encode(&self, plaintext: &str) -> Result<String, CipherError> {
        self.seal(plaintext.as_bytes()).map(|envelope| envelope.to_string())
    }

    fn decode(&self, envelope: &str) -> Result<String, CipherError> {
        let envelope: Envelope = envelope.parse()?;
        let plaintext = self.open(&envelope)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::Decryption(DecryptFailure::InvalidUtf8))
    }
}

fn derive_mac_key(key: &EncryptionKey) -> EncryptionKey {
    let digest = Sha256::new()
        .chain_update(MAC_KEY_LABEL)
        .chain_update(key.as_bytes())
        .finalize();
    let mut bytes = [0u8; KEY_LEN];
    bytes.copy_from_slice(&digest);
    EncryptionKey::from_bytes(bytes)
}
