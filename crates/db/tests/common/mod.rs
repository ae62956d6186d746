//! Shared fixtures for repository tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{MockExecResult, Value};
use transposit_core::crypto::{AesCbcCipher, EncryptionKey, FieldCipher};
use transposit_db::entities::{
    accounts, distribution_rules, incoming_deposits,
    sea_orm_active_enums::{AccountType, TransactionStatus},
    transactions, users,
};
use uuid::Uuid;

pub fn cipher() -> Arc<dyn FieldCipher> {
    Arc::new(AesCbcCipher::new(EncryptionKey::from_bytes([9u8; 32])))
}

pub fn other_cipher() -> Arc<dyn FieldCipher> {
    Arc::new(AesCbcCipher::new(EncryptionKey::from_bytes([10u8; 32])))
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTimeWithTimeZone {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().fixed_offset()
}

pub fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

pub fn deleted(rows: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: rows,
    }
}

pub fn user_model(username: &str) -> users::Model {
    users::Model {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        first_name: None,
        last_name: None,
        phone_number: None,
        date_of_birth: None,
        created_at: at(2024, 3, 1, 9),
        updated_at: at(2024, 3, 1, 9),
    }
}

pub fn account_model(
    cipher: &dyn FieldCipher,
    user_id: Uuid,
    account_number: &str,
    routing_number: &str,
) -> accounts::Model {
    accounts::Model {
        id: Uuid::new_v4(),
        user_id,
        account_type: AccountType::Checking,
        account_name: "Everyday".to_string(),
        account_number: cipher.encode(account_number).unwrap(),
        routing_number: cipher.encode(routing_number).unwrap(),
        created_at: at(2024, 3, 1, 9),
        updated_at: at(2024, 3, 1, 9),
    }
}

pub fn transaction_model(
    cipher: &dyn FieldCipher,
    user_id: Uuid,
    account_id: Uuid,
    amount: &str,
    day: u32,
) -> transactions::Model {
    transactions::Model {
        id: Uuid::new_v4(),
        user_id,
        account_id,
        amount: cipher.encode(amount).unwrap(),
        status: TransactionStatus::Pending,
        transaction_date: at(2024, 3, day, 12),
        created_at: at(2024, 3, day, 12),
    }
}

pub fn deposit_model(
    cipher: &dyn FieldCipher,
    user_id: Uuid,
    amount: &str,
    source: &str,
) -> incoming_deposits::Model {
    incoming_deposits::Model {
        id: Uuid::new_v4(),
        user_id,
        amount: cipher.encode(amount).unwrap(),
        source: cipher.encode(source).unwrap(),
        received_date: at(2024, 3, 15, 8),
        created_at: at(2024, 3, 15, 8),
        updated_at: at(2024, 3, 15, 8),
    }
}

pub fn rule_model(user_id: Uuid, account_id: Uuid, percentage: Decimal) -> distribution_rules::Model {
    distribution_rules::Model {
        id: Uuid::new_v4(),
        user_id,
        account_id,
        percentage,
        created_at: at(2024, 3, 1, 9),
        updated_at: at(2024, 3, 1, 9),
    }
}
