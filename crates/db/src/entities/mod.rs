//! `SeaORM` entity definitions.
//!
//! Columns holding sensitive values (`account_number`, `routing_number`,
//! `amount`, `source`) contain cipher envelopes, not plaintext. Only the
//! repositories read them.

pub mod prelude;

pub mod accounts;
pub mod distribution_rules;
pub mod incoming_deposits;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;
