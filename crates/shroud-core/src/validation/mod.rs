//! Validation modules
//!
//! Checks that run before anything is sent to the service.

pub mod credentials;
pub mod image;
pub mod password;

pub use credentials::{validate_credentials, validate_registration};
pub use image::{is_image_content_type, validate_image};
pub use password::{password_strength, PasswordStrength, StrengthLevel};
