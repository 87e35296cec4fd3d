//! Password strength meter shown next to the registration form.
//!
//! Advisory only: registration is gated by the length and confirmation rules in
//! `credentials`, not by this score.

use serde::Serialize;

use crate::constants::MIN_PASSWORD_LENGTH;

const STEP: u8 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Weak,
    Fair,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// 0, 25, 50, 75 or 100.
    pub score: u8,
    pub level: StrengthLevel,
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let mut score = 0;

    if password.chars().count() >= MIN_PASSWORD_LENGTH {
        score += STEP;
    }
    if password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
    {
        score += STEP;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += STEP;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += STEP;
    }

    let level = match score {
        s if s < 50 => StrengthLevel::Weak,
        s if s < 75 => StrengthLevel::Fair,
        _ => StrengthLevel::Strong,
    };

    PasswordStrength { score, level }
}
