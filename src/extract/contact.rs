//! Phone and email detection in free text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::intake::{COUNTRIES, international_number};

/// Domestic mobile format: 11 digits starting with 0.
static LOCAL_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\d])(0\d{10})(?:[^\d]|$)").expect("valid regex"));

/// A calling code from the country table followed by 8–12 digits.
/// Single-digit codes (1, 7) only count after a literal `+`.
static INTERNATIONAL_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    let mut codes: Vec<&str> = COUNTRIES
        .iter()
        .map(|country| country.dial_code.trim_start_matches('+'))
        .collect();
    // Longest first so 971 is tried before 97x prefixes of shorter codes.
    codes.sort_by_key(|code| std::cmp::Reverse(code.len()));
    codes.dedup();
    let (short, long): (Vec<&str>, Vec<&str>) = codes.into_iter().partition(|code| code.len() == 1);
    let pattern = format!(
        r"(?:^|[^\d])(?:\+?((?:{})\d{{8,12}})|\+((?:{})\d{{8,12}}))(?:[^\d]|$)",
        long.join("|"),
        short.join("|")
    );
    Regex::new(&pattern).expect("valid regex")
});

/// Last resort: any standalone run of 10–15 digits.
static GENERIC_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\d])(\d{10,15})(?:[^\d]|$)").expect("valid regex"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("valid regex")
});

/// Contact details found in one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactHit {
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactHit {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.email.is_none()
    }
}

/// Map Arabic-Indic and Persian digits to their ASCII counterparts.
pub fn fold_digit(c: char) -> char {
    match c {
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        _ => c,
    }
}

/// Drop the separators people type inside phone numbers and fold
/// Arabic-Indic digits to ASCII.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '(' | ')'))
        .map(fold_digit)
        .collect()
}

/// Find a phone number, trying the domestic format, then known calling
/// codes, then any long digit run. The first pattern that matches wins.
pub fn extract_phone(text: &str, dial_code: &str) -> Option<String> {
    let normalized = normalize_digits(text);

    if let Some(caps) = LOCAL_PHONE.captures(&normalized) {
        return Some(international_number(dial_code, &caps[1]));
    }
    if let Some(number) = INTERNATIONAL_PHONE
        .captures(&normalized)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
    {
        return Some(format!("+{}", number.as_str()));
    }
    GENERIC_PHONE
        .captures(&normalized)
        .map(|caps| caps[1].to_string())
}

/// First email address in the text.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

/// Scan a single message for contact details.
pub fn scan_message(text: &str, dial_code: &str) -> ContactHit {
    ContactHit {
        phone: extract_phone(text, dial_code),
        email: extract_email(text),
    }
}
