use validator::ValidateEmail;

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::ValidationError;
use crate::models::{Credentials, RegistrationRequest};

/// Validate a login form: both fields present, email well formed.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationError> {
    require("email", &credentials.email)?;
    require("password", &credentials.password)?;
    validate_email(&credentials.email)
}

/// Validate a registration form.
///
/// The confirmation is compared before the length rule so a typo in either field
/// is reported as a mismatch first.
pub fn validate_registration(request: &RegistrationRequest) -> Result<(), ValidationError> {
    require("name", &request.name)?;
    require("email", &request.email)?;
    require("password", &request.password)?;
    validate_email(&request.email)?;

    if request.password != request.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::password_too_short());
    }

    Ok(())
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !email.trim().to_string().validate_email() {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}
