//! Account input rules shared by storefront sign-up and admin user forms.

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Rejected account input.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    #[error(
        "Password must be at least 8 characters long and contain letters, numbers, and special characters"
    )]
    WeakPassword,
    #[error("Phone number must be 10 digits")]
    InvalidPhone,
}

/// At least eight characters with a letter, a digit and a special character.
///
/// # Errors
///
/// Returns [`PolicyError::WeakPassword`] when any rule fails.
pub fn validate_password(password: &str) -> Result<(), PolicyError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && has_letter && has_digit && has_special {
        Ok(())
    } else {
        Err(PolicyError::WeakPassword)
    }
}

/// Blank means no phone; anything else must be exactly ten digits.
///
/// # Errors
///
/// Returns [`PolicyError::InvalidPhone`] for anything but ten ASCII digits.
pub fn normalize_phone(phone: Option<&str>) -> Result<Option<String>, PolicyError> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    if phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(Some(phone.to_owned()))
    } else {
        Err(PolicyError::InvalidPhone)
    }
}
