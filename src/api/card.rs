//! Card number helpers: brand detection and the formatters applied while typing.

use regex::Regex;
use std::sync::LazyLock;

use crate::{consts, models::checkout::CardBrand};

// 13 or 16 digits starting with 4.
static VISA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^4[0-9]{12}(?:[0-9]{3})?$").expect("VISA_REGEX: invalid regex pattern")
});

// 16 digits starting with 51 through 55.
static MASTERCARD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^5[1-5][0-9]{14}$").expect("MASTERCARD_REGEX: invalid regex pattern")
});

pub fn strip_spaces(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

fn only_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Classifies a card number, ignoring the spaces inserted by [format_card_number]
pub fn detect_brand(card_number: &str) -> Option<CardBrand> {
    let card_number = strip_spaces(card_number);

    if VISA_REGEX.is_match(&card_number) {
        return Some(CardBrand::Visa);
    }

    if MASTERCARD_REGEX.is_match(&card_number) {
        return Some(CardBrand::Mastercard);
    }

    None
}

/// Display format for the card number input: `4111 1111 1111 1111`.
///
/// Non digits are dropped and the value is truncated to
/// [CARD_NUMBER_MAX_DIGITS](consts::CARD_NUMBER_MAX_DIGITS).
pub fn format_card_number(raw: &str) -> String {
    let digits = only_digits(raw);
    let mut formatted = String::with_capacity(digits.len() + 3);

    for (idx, digit) in digits
        .chars()
        .take(consts::CARD_NUMBER_MAX_DIGITS)
        .enumerate()
    {
        if idx > 0 && idx % consts::CARD_NUMBER_GROUP_SIZE == 0 {
            formatted.push(' ');
        }
        formatted.push(digit);
    }

    formatted
}

/// Display format for the expiry input: `MM/YY`.
///
/// A first digit that can't start a two digit month is taken as the month
/// itself, so typing `4` gives `04`.
pub fn format_card_expire(raw: &str) -> String {
    let mut digits = only_digits(raw);

    if let Some(first) = digits.chars().next() {
        if first > '1' {
            digits.insert(0, '0');
        }
    }

    digits.truncate(consts::CARD_EXPIRE_MAX_DIGITS);

    if digits.len() <= 2 {
        return digits;
    }

    format!("{}/{}", &digits[..2], &digits[2..])
}

/// Hides everything but the last four digits, safe to write into logs
pub fn mask_card_number(card_number: &str) -> String {
    let digits = only_digits(card_number);
    let visible = digits.len().saturating_sub(4);
    let last_four = &digits[visible..];

    format!("**** **** **** {last_four}")
}
