//! Amount, percentage, status and range rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ValidationError;

/// Accepted transaction statuses, in their stored spelling.
pub const TRANSACTION_STATUSES: [&str; 4] = ["pending", "completed", "failed", "cancelled"];

/// Checks a transaction amount is not zero. Negative amounts are debits.
pub fn validate_transaction_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount.is_zero() {
        Err(ValidationError::ZeroAmount)
    } else {
        Ok(())
    }
}

/// Checks a deposit amount is strictly positive.
pub fn validate_deposit_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount)
    }
}

/// Checks a deposit source is not blank.
pub fn validate_deposit_source(source: &str) -> Result<(), ValidationError> {
    if source.trim().is_empty() {
        Err(ValidationError::DepositSource)
    } else {
        Ok(())
    }
}

/// Decimal places a stored percentage keeps (`NUMERIC(5, 2)`).
pub const PERCENTAGE_SCALE: u32 = 2;

/// Checks a distribution percentage lies in `0..=100` and has at most two
/// significant decimal places, so the column stores it unrounded.
pub fn validate_percentage(percentage: Decimal) -> Result<(), ValidationError> {
    if (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&percentage)
        && percentage.normalize().scale() <= PERCENTAGE_SCALE
    {
        Ok(())
    } else {
        Err(ValidationError::Percentage)
    }
}

/// Checks that adding `candidate` to a user's other rules stays within 100%.
///
/// Returns the new total.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use transposit_core::validation::validate_percentage_total;
///
/// let existing = [Decimal::from(60), Decimal::from(30)];
/// assert_eq!(validate_percentage_total(existing, Decimal::from(10)).unwrap(), Decimal::from(100));
/// assert!(validate_percentage_total(existing, Decimal::from(11)).is_err());
/// ```
pub fn validate_percentage_total(
    others: impl IntoIterator<Item = Decimal>,
    candidate: Decimal,
) -> Result<Decimal, ValidationError> {
    let total = others.into_iter().fold(candidate, |acc, p| acc + p);
    if total > Decimal::ONE_HUNDRED {
        Err(ValidationError::PercentageTotal(total))
    } else {
        Ok(total)
    }
}

/// Maps a transaction status in any case to its stored spelling.
pub fn normalize_transaction_status(status: &str) -> Result<&'static str, ValidationError> {
    let wanted = status.trim();
    TRANSACTION_STATUSES
        .into_iter()
        .find(|known| known.eq_ignore_ascii_case(wanted))
        .ok_or(ValidationError::TransactionStatus)
}

/// Checks `start` is not after `end`.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        Err(ValidationError::DateRange { start, end })
    } else {
        Ok(())
    }
}

/// Checks `min` is not above `max`.
pub fn validate_amount_range(min: Decimal, max: Decimal) -> Result<(), ValidationError> {
    if min > max {
        Err(ValidationError::AmountRange { min, max })
    } else {
        Ok(())
    }
}
