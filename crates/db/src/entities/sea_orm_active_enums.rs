//! Postgres enum types.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use transposit_core::validation::{
    ValidationError, normalize_account_type, normalize_transaction_status,
};

/// Kind of bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Savings account.
    #[sea_orm(string_value = "savings")]
    Savings,
    /// Checking account.
    #[sea_orm(string_value = "checking")]
    Checking,
    /// Investment account.
    #[sea_orm(string_value = "investment")]
    Investment,
}

impl AccountType {
    /// Stored spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::Checking => "checking",
            Self::Investment => "investment",
        }
    }
}

impl FromStr for AccountType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_account_type(s)? {
            "savings" => Ok(Self::Savings),
            "checking" => Ok(Self::Checking),
            "investment" => Ok(Self::Investment),
            _ => Err(ValidationError::AccountType),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a transaction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Recorded, not yet settled.
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Settled.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Rejected by the bank.
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Withdrawn before settling.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl TransactionStatus {
    /// Stored spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_transaction_status(s)? {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ValidationError::TransactionStatus),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_account_type_parse_any_case() {
        assert_eq!("Checking".parse::<AccountType>().unwrap(), AccountType::Checking);
        assert_eq!(
            "credit".parse::<AccountType>().unwrap_err(),
            ValidationError::AccountType
        );
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in TransactionStatus::iter() {
            assert_eq!(status.to_string().parse::<TransactionStatus>().unwrap(), status);
        }
        assert_eq!(TransactionStatus::default(), TransactionStatus::Pending);
    }
}
