use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, str::FromStr};

/// Inputs rendered by the checkout form, in display order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutField {
    #[display("email")]
    Email,
    #[display("card_number")]
    CardNumber,
    #[display("card_expire")]
    CardExpire,
    #[display("cvv")]
    Cvv,
}

impl CheckoutField {
    pub const ALL: [CheckoutField; 4] = [
        CheckoutField::Email,
        CheckoutField::CardNumber,
        CheckoutField::CardExpire,
        CheckoutField::Cvv,
    ];

    /// Human label used by the template and the error messages
    pub fn label(&self) -> &'static str {
        match self {
            CheckoutField::Email => "Email",
            CheckoutField::CardNumber => "Card number",
            CheckoutField::CardExpire => "Expiry date",
            CheckoutField::Cvv => "CVV",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            CheckoutField::Email => "you@example.com",
            CheckoutField::CardNumber => "1234 1234 1234 1234",
            CheckoutField::CardExpire => "MM/YY",
            CheckoutField::Cvv => "123",
        }
    }
}

impl FromStr for CheckoutField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(CheckoutField::Email),
            "card_number" => Ok(CheckoutField::CardNumber),
            "card_expire" => Ok(CheckoutField::CardExpire),
            "cvv" => Ok(CheckoutField::Cvv),
            other => anyhow::bail!("unknown checkout field: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    #[display("Visa")]
    Visa,
    #[display("Mastercard")]
    Mastercard,
}

impl CardBrand {
    /// Slug used for the brand indicator css class
    pub fn slug(&self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
        }
    }
}

/// Values handed to the success handler once every rule passes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CheckoutValues {
    pub email: String,
    pub card_number: String,
    pub card_expire: String,
    pub cvv: String,
}

/// Validation messages keyed by field. Fields without errors are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<CheckoutField, Vec<String>>);

impl FieldErrors {
    pub fn insert(&mut self, field: CheckoutField, messages: Vec<String>) {
        if messages.is_empty() {
            self.0.remove(&field);
            return;
        }
        self.0.insert(field, messages);
    }

    pub fn get(&self, field: CheckoutField) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_errors(&self, field: CheckoutField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = CheckoutField> + '_ {
        self.0.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_field_names() {
        for field in CheckoutField::ALL {
            assert_eq!(field.to_string().parse::<CheckoutField>().unwrap(), field);
        }
        assert!("card".parse::<CheckoutField>().is_err());
        assert_eq!(
            serde_json::to_string(&CheckoutField::CardExpire).unwrap(),
            "\"card_expire\""
        );
    }

    #[test]
    fn test_field_errors_drop_empty_lists() {
        let mut errors = FieldErrors::default();
        errors.insert(CheckoutField::Cvv, vec!["CVV is required".into()]);
        assert!(errors.has_errors(CheckoutField::Cvv));
        assert_eq!(errors.len(), 1);

        errors.insert(CheckoutField::Cvv, vec![]);
        assert!(errors.is_empty());
        assert!(errors.get(CheckoutField::Cvv).is_empty());
    }
}
