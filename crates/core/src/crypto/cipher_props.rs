//! Property-based tests for the field cipher.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{AesCbcCipher, CipherError, EncryptionKey, FieldCipher, KEY_LEN};

fn key_strategy() -> impl Strategy<Value = [u8; KEY_LEN]> {
    any::<[u8; KEY_LEN]>()
}

fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_round_trip(key in key_strategy(), plaintext in ".*") {
        let cipher = AesCbcCipher::new(EncryptionKey::from_bytes(key));
        let envelope = cipher.encode(&plaintext).unwrap();
        prop_assert_eq!(cipher.decode(&envelope).unwrap(), plaintext);
    }

    #[test]
    fn prop_encoding_is_randomized(key in key_strategy(), plaintext in ".*") {
        let cipher = AesCbcCipher::new(EncryptionKey::from_bytes(key));
        let first = cipher.encode(&plaintext).unwrap();
        let second = cipher.encode(&plaintext).unwrap();
        prop_assert_ne!(first, second);
    }

    #[test]
    fn prop_envelope_shape(key in key_strategy(), plaintext in ".*") {
        let cipher = AesCbcCipher::new(EncryptionKey::from_bytes(key));
        let envelope = cipher.encode(&plaintext).unwrap();

        let (iv, body) = envelope.split_once(':').unwrap();
        prop_assert_eq!(iv.len(), 32);
        prop_assert!(is_lower_hex(iv));
        prop_assert!(is_lower_hex(body));
        prop_assert!(!body.contains(':'));
    }

    #[test]
    fn prop_tampering_detected(
        key in key_strategy(),
        plaintext in ".{0,64}",
        position in any::<prop::sample::Index>(),
        replacement in 0u8..16,
    ) {
        let cipher = AesCbcCipher::new(EncryptionKey::from_bytes(key));
        let envelope = cipher.encode(&plaintext).unwrap();
        let separator = envelope.find(':').unwrap();

        let body_start = separator + 1;
        let index = body_start + position.index(envelope.len() - body_start);
        let digit = char::from_digit(u32::from(replacement), 16).unwrap();
        prop_assume!(envelope.as_bytes()[index] != digit as u8);

        let mut tampered = envelope.clone();
        tampered.replace_range(index..=index, &digit.to_string());

        let result = cipher.decode(&tampered);
        prop_assert!(matches!(result, Err(CipherError::Decryption(_))));
    }

    #[test]
    fn prop_wrong_key_rejected(
        key in key_strategy(),
        other in key_strategy(),
        plaintext in ".*",
    ) {
        prop_assume!(key != other);
        let writer = AesCbcCipher::new(EncryptionKey::from_bytes(key));
        let reader = AesCbcCipher::new(EncryptionKey::from_bytes(other));

        let envelope = writer.encode(&plaintext).unwrap();
        prop_assert!(matches!(reader.decode(&envelope), Err(CipherError::Decryption(_))));
    }

    #[test]
    fn prop_decimal_round_trip(key in key_strategy(), mantissa in any::<i64>(), scale in 0u32..=8) {
        let cipher = AesCbcCipher::new(EncryptionKey::from_bytes(key));
        let value = Decimal::new(mantissa, scale);

        let envelope = cipher.encode_decimal(value).unwrap();
        let decoded = cipher.decode_decimal(&envelope).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(decoded.scale(), value.scale());
    }
}
