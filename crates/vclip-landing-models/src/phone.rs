//! Lead capture phone number rules.

use thiserror::Error;

/// Longest phone input kept (international numbers max out at 15 digits).
pub const MAX_PHONE_LEN: usize = 15;

/// Minimum digit count for a phone number to be submitted.
pub const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("Please enter your phone number")]
    Empty,

    #[error("Please enter a valid phone number")]
    TooFewDigits { found: usize },
}

/// Clean raw keyboard input for the phone field.
///
/// Keeps digits, spaces and a single leading `+`, then truncates to
/// [`MAX_PHONE_LEN`] characters. Applied on every keystroke.
pub fn sanitize_phone_input(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len().min(MAX_PHONE_LEN));

    for c in raw.chars() {
        let keep = c.is_ascii_digit() || c == ' ' || (c == '+' && cleaned.is_empty());
        if !keep {
            continue;
        }
        if cleaned.len() == MAX_PHONE_LEN {
            break;
        }
        cleaned.push(c);
    }

    cleaned
}

/// Count of ASCII digits in a phone string.
pub fn digit_count(phone: &str) -> usize {
    phone.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Validate a phone number before submission.
pub fn validate_phone(phone: &str) -> Result<(), PhoneError> {
    if phone.trim().is_empty() {
        return Err(PhoneError::Empty);
    }

    let found = digit_count(phone);
    if found < MIN_PHONE_DIGITS {
        return Err(PhoneError::TooFewDigits { found });
    }

    Ok(())
}
