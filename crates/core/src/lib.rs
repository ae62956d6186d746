//! Core logic for Transposit.
//!
//! This crate contains pure logic with ZERO web or database dependencies.
//! The field cipher, input validation rules and in-memory filters live here.
//!
//! # Modules
//!
//! - `crypto` - Field-level encryption of sensitive column values
//! - `auth` - Password hashing
//! - `validation` - Input rules shared by the API and the repositories
//! - `filter` - Amount and date predicates applied after decryption

pub mod auth;
pub mod crypto;
pub mod filter;
pub mod validation;
