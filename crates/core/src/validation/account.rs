//! Bank account field rules.

use super::ValidationError;

/// Accepted account types, in their stored spelling.
pub const ACCOUNT_TYPES: [&str; 3] = ["savings", "checking", "investment"];

/// Shortest accepted account number, after trimming.
pub const ACCOUNT_NUMBER_MIN_LEN: usize = 8;

/// Longest accepted account number, after trimming.
pub const ACCOUNT_NUMBER_MAX_LEN: usize = 12;

/// Exact routing number length.
pub const ROUTING_NUMBER_LEN: usize = 9;

/// Maps an account type in any case to its stored spelling.
///
/// # Example
///
/// ```
/// use transposit_core::validation::normalize_account_type;
///
/// assert_eq!(normalize_account_type("Savings").unwrap(), "savings");
/// assert!(normalize_account_type("brokerage").is_err());
/// ```
pub fn normalize_account_type(account_type: &str) -> Result<&'static str, ValidationError> {
    let wanted = account_type.trim();
    ACCOUNT_TYPES
        .into_iter()
        .find(|known| known.eq_ignore_ascii_case(wanted))
        .ok_or(ValidationError::AccountType)
}

/// Checks an account name is not blank.
pub fn validate_account_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::AccountName)
    } else {
        Ok(())
    }
}

/// Checks an account number is 8 to 12 characters once trimmed.
pub fn validate_account_number(number: &str) -> Result<(), ValidationError> {
    let len = number.trim().chars().count();
    if (ACCOUNT_NUMBER_MIN_LEN..=ACCOUNT_NUMBER_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::AccountNumber)
    }
}

/// Checks a routing number is exactly nine ASCII digits.
pub fn validate_routing_number(number: &str) -> Result<(), ValidationError> {
    if number.len() == ROUTING_NUMBER_LEN && number.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::RoutingNumber)
    }
}
