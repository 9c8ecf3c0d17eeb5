use crate::{
    api::{checkout::CheckoutForm, validation::CheckoutSchema},
    models::checkout::CheckoutField,
};

/// Url-encoded body posted by the checkout page and by the htmx widget
#[derive(serde::Deserialize, Debug, Default)]
pub struct CheckoutFormData {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_expire: String,
    #[serde(default)]
    pub cvv: String,
    /// Token half of the CSRF pair, only checked on submit
    #[serde(default)]
    pub csrf_token: String,
}

impl CheckoutFormData {
    pub fn value(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::Email => &self.email,
            CheckoutField::CardNumber => &self.card_number,
            CheckoutField::CardExpire => &self.card_expire,
            CheckoutField::Cvv => &self.cvv,
        }
    }

    pub fn to_checkout_form(&self, schema: CheckoutSchema) -> CheckoutForm {
        CheckoutForm::from_values(schema, |field| Some(self.value(field)))
    }
}
