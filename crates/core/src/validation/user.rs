//! User field rules.

use validator::ValidateEmail;

use super::ValidationError;

/// Shortest accepted username, after trimming.
pub const USERNAME_MIN_LEN: usize = 3;

/// Longest accepted username, after trimming.
pub const USERNAME_MAX_LEN: usize = 30;

/// Shortest accepted password.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Checks a username is 3 to 30 characters once trimmed.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.trim().chars().count();
    if (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::Username)
    }
}

/// Checks a password is at least 8 characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= PASSWORD_MIN_LEN {
        Ok(())
    } else {
        Err(ValidationError::Password)
    }
}

/// Checks an email address is syntactically valid.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().to_string().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::Email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc", true)]
    #[case("  abc  ", true)]
    #[case("ab", false)]
    #[case("   ab   ", false)]
    #[case(&"a".repeat(30), true)]
    #[case(&"a".repeat(31), false)]
    #[case("", false)]
    fn test_username_length(#[case] username: &str, #[case] ok: bool) {
        assert_eq!(validate_username(username).is_ok(), ok);
    }

    #[rstest]
    #[case("12345678", true)]
    #[case("1234567", false)]
    #[case("", false)]
    fn test_password_length(#[case] password: &str, #[case] ok: bool) {
        assert_eq!(validate_password(password).is_ok(), ok);
    }

    #[rstest]
    #[case("jane@example.com", true)]
    #[case("  jane@example.com ", true)]
    #[case("jane.example.com", false)]
    #[case("jane@", false)]
    #[case("", false)]
    fn test_email_syntax(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_email(email).is_ok(), ok);
    }
}
