//! The stored text form of an encrypted value.

use std::fmt;
use std::str::FromStr;

use super::error::DecryptFailure;

/// IV length in bytes (one AES block).
pub const IV_LEN: usize = 16;

/// AES block length in bytes.
pub const BLOCK_LEN: usize = 16;

/// HMAC-SHA256 tag length in bytes.
pub const TAG_LEN: usize = 32;

/// An encrypted field value.
///
/// Serialized as `iv_hex:ciphertext_hex` in lowercase hex, where the
/// ciphertext part carries the CBC ciphertext followed by its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
    tag: [u8; TAG_LEN],
}

impl Envelope {
    /// Builds an envelope from its parts.
    #[must_use]
    pub const fn new(iv: [u8; IV_LEN], ciphertext: Vec<u8>, tag: [u8; TAG_LEN]) -> Self {
        Self {
            iv,
            ciphertext,
            tag,
        }
    }

    /// The initialization vector.
    #[must_use]
    pub const fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// The padded CBC ciphertext, without the tag.
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// The authentication tag over `iv || ciphertext`.
    #[must_use]
    pub const fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}{}",
            hex::encode(self.iv),
            hex::encode(&self.ciphertext),
            hex::encode(self.tag)
        )
    }
}

impl FromStr for Envelope {
    type Err = DecryptFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (iv_hex, body_hex) = s
            .split_once(':')
            .ok_or(DecryptFailure::MalformedEnvelope("missing ':' separator"))?;

        let iv_bytes =
            hex::decode(iv_hex).map_err(|_| DecryptFailure::MalformedEnvelope("iv is not hex"))?;
        let iv: [u8; IV_LEN] = iv_bytes
            .as_slice()
            .try_into()
            .map_err(|_| DecryptFailure::MalformedEnvelope("iv must be 16 bytes"))?;

        let mut body = hex::decode(body_hex)
            .map_err(|_| DecryptFailure::MalformedEnvelope("ciphertext is not hex"))?;
        if body.len() < BLOCK_LEN + TAG_LEN || !(body.len() - TAG_LEN).is_multiple_of(BLOCK_LEN) {
            return Err(DecryptFailure::MalformedEnvelope(
                "ciphertext has an invalid length",
            ));
        }

        let tag_bytes = body.split_off(body.len() - TAG_LEN);
        let tag: [u8; TAG_LEN] = tag_bytes
            .as_slice()
            .try_into()
            .map_err(|_| DecryptFailure::MalformedEnvelope("tag must be 32 bytes"))?;

        Ok(Self::new(iv, body, tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> Envelope {
        Envelope::new([0x11; IV_LEN], vec![0x22; BLOCK_LEN * 2], [0x33; TAG_LEN])
    }

    #[test]
    fn test_display_layout() {
        let text = sample().to_string();
        let (iv, body) = text.split_once(':').unwrap();

        assert_eq!(iv, "11".repeat(IV_LEN));
        assert_eq!(body.len(), (BLOCK_LEN * 2 + TAG_LEN) * 2);
        assert!(body.starts_with(&"22".repeat(BLOCK_LEN * 2)));
        assert!(body.ends_with(&"33".repeat(TAG_LEN)));
    }

    #[test]
    fn test_parse_display_output() {
        let envelope = sample();
        let parsed: Envelope = envelope.to_string().parse().unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_parse_accepts_uppercase_hex() {
        let upper = sample().to_string().to_uppercase();
        assert_eq!(upper.parse::<Envelope>().unwrap(), sample());
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_separator("00112233445566778899aabbccddeeff")]
    #[case::iv_not_hex("zz:00")]
    #[case::iv_too_short("0011:00112233445566778899aabbccddeeff")]
    #[case::body_not_hex("00112233445566778899aabbccddeeff:xyz")]
    #[case::body_odd_length("00112233445566778899aabbccddeeff:abc")]
    #[case::body_empty("00112233445566778899aabbccddeeff:")]
    #[case::body_missing_tag("00112233445566778899aabbccddeeff:00112233445566778899aabbccddeeff")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Envelope>(),
            Err(DecryptFailure::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_parse_rejects_partial_block() {
        let text = format!(
            "{}:{}{}",
            "00".repeat(IV_LEN),
            "00".repeat(BLOCK_LEN + 3),
            "00".repeat(TAG_LEN)
        );
        assert!(matches!(
            text.parse::<Envelope>(),
            Err(DecryptFailure::MalformedEnvelope(_))
        ));
    }
}
