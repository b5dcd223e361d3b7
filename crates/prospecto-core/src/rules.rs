use crate::domain::{business_unit, is_source_code};
use crate::error::CoreError;

pub const MIN_PHONE_DIGITS: usize = 10;

/// Manual-entry validation, applied before any write. Bulk imports bypass
/// this on purpose: intake is best-effort and must not reject rows.
pub fn validate_manual_entry(name: &str, phone: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::EmptyName);
    }

    let digits = phone.chars().filter(|ch| ch.is_ascii_digit()).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(CoreError::PhoneTooShort {
            required: MIN_PHONE_DIGITS,
            actual: digits,
        });
    }

    Ok(())
}

/// Manual entry only accepts catalog codes (or nothing); imports may store
/// free-text sources.
pub fn validate_source(code: &str) -> Result<(), CoreError> {
    if code.is_empty() || is_source_code(code) {
        Ok(())
    } else {
        Err(CoreError::UnknownSource(code.to_string()))
    }
}

pub fn validate_business_unit(id: &str) -> Result<(), CoreError> {
    if id.is_empty() || business_unit(id).is_some() {
        Ok(())
    } else {
        Err(CoreError::UnknownBusinessUnit(id.to_string()))
    }
}
