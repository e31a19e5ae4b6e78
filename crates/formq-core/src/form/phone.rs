//! Phone number checks for the visitor form

use std::sync::OnceLock;

use regex::Regex;

use super::DEFAULT_COUNTRY;

/// Digits required for an Indian mobile number
const INDIA_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneCheck {
    Valid,
    Invalid,
    /// No rule exists for the country
    Unchecked,
}

fn non_digit() -> &'static Regex {
    static NON_DIGIT: OnceLock<Regex> = OnceLock::new();
    NON_DIGIT.get_or_init(|| Regex::new(r"\D").expect("Invalid regex"))
}

/// Strip everything except ASCII digits
pub fn phone_digits(raw: &str) -> String {
    non_digit().replace_all(raw, "").into_owned()
}

/// Check a phone number against the rule for `country`.
///
/// India requires exactly ten digits once separators are stripped; other
/// countries are not checked.
pub fn check_phone(country: &str, raw: &str) -> PhoneCheck {
    if country.trim() != DEFAULT_COUNTRY {
        return PhoneCheck::Unchecked;
    }

    if phone_digits(raw).len() == INDIA_PHONE_DIGITS {
        PhoneCheck::Valid
    } else {
        PhoneCheck::Invalid
    }
}
