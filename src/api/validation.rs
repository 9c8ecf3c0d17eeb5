//! Declarative rules for the checkout fields.
//!
//! Each field runs its rules in order (required, format, semantic) and reports
//! the first one that fails, so the inline message always points at the most
//! basic problem.

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::{
    api::card,
    consts,
    models::checkout::{CheckoutField, FieldErrors},
};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX: invalid regex pattern")
});

static CARD_EXPIRE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/([0-9]{2})$").expect("CARD_EXPIRE_REGEX: invalid regex pattern")
});

static CVV_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("CVV_REGEX: invalid regex pattern"));

type Rule = fn(&CheckoutSchema, &str) -> Option<String>;

const EMAIL_RULES: &[Rule] = &[email_markup_rule, email_rule];
const CARD_NUMBER_RULES: &[Rule] = &[card_number_rule];
const CARD_EXPIRE_RULES: &[Rule] = &[card_expire_format_rule, card_expire_not_past_rule];
const CVV_RULES: &[Rule] = &[cvv_rule];

/// Field rules evaluated against the current form values.
///
/// `today` is the reference date for the expiry rule.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutSchema {
    pub today: NaiveDate,
}

impl Default for CheckoutSchema {
    fn default() -> Self {
        Self {
            today: Utc::now().date_naive(),
        }
    }
}

impl CheckoutSchema {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    fn rules(field: CheckoutField) -> &'static [Rule] {
        match field {
            CheckoutField::Email => EMAIL_RULES,
            CheckoutField::CardNumber => CARD_NUMBER_RULES,
            CheckoutField::CardExpire => CARD_EXPIRE_RULES,
            CheckoutField::Cvv => CVV_RULES,
        }
    }

    /// Messages for a single field. Empty means the value is valid.
    pub fn validate_field(&self, field: CheckoutField, value: Option<&str>) -> Vec<String> {
        let value = match value.map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => return vec![format!("{} is required", field.label())],
        };

        Self::rules(field)
            .iter()
            .find_map(|rule| rule(self, value))
            .into_iter()
            .collect()
    }

    /// Runs every field rule. `value_of` gives the current model value.
    pub fn validate<'a>(
        &self,
        value_of: impl Fn(CheckoutField) -> Option<&'a str>,
    ) -> FieldErrors {
        let mut errors = FieldErrors::default();

        for field in CheckoutField::ALL {
            errors.insert(field, self.validate_field(field, value_of(field)));
        }

        errors
    }
}

fn email_markup_rule(_: &CheckoutSchema, value: &str) -> Option<String> {
    ammonia::is_html(value).then(|| "Email must not contain markup".to_string())
}

fn email_rule(_: &CheckoutSchema, value: &str) -> Option<String> {
    (!EMAIL_REGEX.is_match(value)).then(|| "Email is not valid".to_string())
}

fn card_number_rule(_: &CheckoutSchema, value: &str) -> Option<String> {
    card::detect_brand(value)
        .is_none()
        .then(|| "Card number must be a valid Visa or Mastercard number".to_string())
}

fn card_expire_format_rule(_: &CheckoutSchema, value: &str) -> Option<String> {
    (!CARD_EXPIRE_REGEX.is_match(value))
        .then(|| format!("Expiry date must use the {} format", consts::CARD_EXPIRE_FORMAT))
}

fn card_expire_not_past_rule(schema: &CheckoutSchema, value: &str) -> Option<String> {
    let (month, year) = parse_card_expire(value)?;
    let today = schema.today;

    if (year, month) < (today.year(), today.month()) {
        return Some("Card has expired".to_string());
    }

    None
}

fn cvv_rule(_: &CheckoutSchema, value: &str) -> Option<String> {
    (!CVV_REGEX.is_match(value))
        .then(|| format!("CVV must be exactly {} digits", consts::CVV_DIGITS))
}

/// `MM/YY` into `(month, full year)`
pub fn parse_card_expire(value: &str) -> Option<(u32, i32)> {
    let captures = CARD_EXPIRE_REGEX.captures(value)?;
    let month = captures.get(1)?.as_str().parse::<u32>().ok()?;
    let year = captures.get(2)?.as_str().parse::<i32>().ok()?;

    Some((month, 2000 + year))
}
