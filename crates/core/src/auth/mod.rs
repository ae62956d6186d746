//! Password hashing with Argon2id.

mod password;

pub use password::{PasswordError, hash_password, spend_verification_time, verify_password};
