//! Contact-value validation for the final form step.

use super::answer::ContactMethod;

/// Minimum digits for a phone-like contact value.
pub const MIN_PHONE_DIGITS: usize = 8;

/// Keep ASCII digits only.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Submission gate: a digit-only phone of at least eight digits for call and
/// WhatsApp, anything containing `@` for email.
pub fn is_contact_valid(method: ContactMethod, value: &str) -> bool {
    match method {
        ContactMethod::Call | ContactMethod::Whatsapp => {
            value.len() >= MIN_PHONE_DIGITS && value.chars().all(|c| c.is_ascii_digit())
        }
        ContactMethod::Email => value.contains('@'),
    }
}

/// Join a calling code and a local digit string into an international number.
///
/// A single domestic trunk `0` is dropped so `+20` and `01012345678` give
/// `+201012345678`, the same number as `+20` and `1012345678`.
pub fn international_number(dial_code: &str, digits: &str) -> String {
    let code = digits_only(dial_code);
    let local = digits.strip_prefix('0').unwrap_or(digits);
    format!("+{code}{local}")
}
