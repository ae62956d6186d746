//! Input rules shared by the API handlers and the repositories.
//!
//! Every check is a pure function returning [`ValidationError`]. The
//! messages are user-facing and end up in `400` response bodies.

mod account;
mod funds;
mod user;

#[cfg(test)]
mod validation_props;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

pub use account::{
    ACCOUNT_NUMBER_MAX_LEN, ACCOUNT_NUMBER_MIN_LEN, ACCOUNT_TYPES, ROUTING_NUMBER_LEN,
    normalize_account_type, validate_account_name, validate_account_number,
    validate_routing_number,
};
pub use funds::{
    TRANSACTION_STATUSES, normalize_transaction_status, validate_amount_range,
    validate_date_range, validate_deposit_amount, validate_deposit_source, validate_percentage,
    validate_percentage_total, validate_transaction_amount,
};
pub use user::{
    PASSWORD_MIN_LEN, USERNAME_MAX_LEN, USERNAME_MIN_LEN, validate_email, validate_password,
    validate_username,
};

/// A rejected input value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Username length out of range.
    #[error("Invalid username. Must be between 3 and 30 characters.")]
    Username,

    /// Password too short.
    #[error("Invalid password. Must be at least 8 characters long.")]
    Password,

    /// Email address is not syntactically valid.
    #[error("Invalid email address.")]
    Email,

    /// Unknown account type.
    #[error("Invalid account type. Must be one of: savings, checking, investment.")]
    AccountType,

    /// Account name is blank.
    #[error("Invalid account name. Must not be empty.")]
    AccountName,

    /// Account number length out of range.
    #[error("Invalid account number. Must be between 8 and 12 characters long.")]
    AccountNumber,

    /// Routing number is not nine digits.
    #[error("Invalid routing number. Must be exactly 9 digits.")]
    RoutingNumber,

    /// Transaction amount is zero.
    #[error("Invalid amount. Must not be zero.")]
    ZeroAmount,

    /// Deposit amount is zero or negative.
    #[error("Invalid amount. Must be greater than zero.")]
    NonPositiveAmount,

    /// Deposit source is blank.
    #[error("Invalid deposit source. Must not be empty.")]
    DepositSource,

    /// Percentage outside 0..=100, or finer than two decimal places.
    #[error("Invalid percentage. Must be between 0 and 100 with at most two decimal places.")]
    Percentage,

    /// A user's distribution rules would add up to more than 100%.
    #[error("Distribution rules would total {0}%, which exceeds 100%.")]
    PercentageTotal(Decimal),

    /// Unknown transaction status.
    #[error("Invalid status. Must be one of: pending, completed, failed, cancelled.")]
    TransactionStatus,

    /// Date range start is after its end.
    #[error("Invalid date range: {start} is after {end}.")]
    DateRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// Amount range minimum is above its maximum.
    #[error("Invalid amount range: {min} is greater than {max}.")]
    AmountRange {
        /// Lower bound.
        min: Decimal,
        /// Upper bound.
        max: Decimal,
    },

    /// An update request carried no fields.
    #[error("No updates provided.")]
    EmptyUpdate,
}
