//! Checkout form state and submit gate.
//!
//! [CheckoutForm] owns the values for the four inputs. Every change goes
//! through the same pipeline: trim, format (card number and expiry only),
//! store, then re-run the whole [CheckoutSchema] so the derived errors, the
//! brand indicator and the submit button state are always in sync with the
//! model.
//!
//! Values are never rewritten for HTML. Markup in the email is reported by the
//! schema and the templates escape on output.

use derive_more::{Display, Error};
use serde::Serialize;

use crate::{
    api::{card, validation::CheckoutSchema},
    consts, metric,
    models::checkout::{CardBrand, CheckoutField, CheckoutValues, FieldErrors},
    services,
};

/// Properties the caller can set on the checkout component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutProps {
    pub submit_text: String,
    pub loading: bool,
}

impl Default for CheckoutProps {
    fn default() -> Self {
        Self {
            submit_text: consts::DEFAULT_SUBMIT_TEXT.to_string(),
            loading: false,
        }
    }
}

/// A submit attempt blocked by invalid fields
#[derive(Debug, Clone, Display, Error)]
#[display("{toast}")]
pub struct SubmitRejected {
    pub toast: String,
    #[error(not(source))]
    pub errors: FieldErrors,
}

#[derive(Debug, Clone)]
pub struct CheckoutForm {
    schema: CheckoutSchema,
    email: Option<String>,
    card_number: Option<String>,
    card_expire: Option<String>,
    cvv: Option<String>,
    errors: FieldErrors,
}

fn sanitize(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn format_field(field: CheckoutField, value: String) -> Option<String> {
    let formatted = match field {
        CheckoutField::CardNumber => card::format_card_number(&value),
        CheckoutField::CardExpire => card::format_card_expire(&value),
        CheckoutField::Email | CheckoutField::Cvv => value,
    };

    (!formatted.is_empty()).then_some(formatted)
}

impl CheckoutForm {
    /// Empty form. It starts invalid since every field is required.
    pub fn new(schema: CheckoutSchema) -> Self {
        let mut form = Self {
            schema,
            email: None,
            card_number: None,
            card_expire: None,
            cvv: None,
            errors: FieldErrors::default(),
        };
        form.revalidate();
        form
    }

    /// Builds a form by replaying every posted value through [CheckoutForm::set_field]
    pub fn from_values<'a>(
        schema: CheckoutSchema,
        value_of: impl Fn(CheckoutField) -> Option<&'a str>,
    ) -> Self {
        let mut form = Self::new(schema);
        for field in CheckoutField::ALL {
            form.set_field(field, value_of(field).unwrap_or_default());
        }
        form
    }

    fn slot(&mut self, field: CheckoutField) -> &mut Option<String> {
        match field {
            CheckoutField::Email => &mut self.email,
            CheckoutField::CardNumber => &mut self.card_number,
            CheckoutField::CardExpire => &mut self.card_expire,
            CheckoutField::Cvv => &mut self.cvv,
        }
    }

    pub fn value(&self, field: CheckoutField) -> Option<&str> {
        match field {
            CheckoutField::Email => self.email.as_deref(),
            CheckoutField::CardNumber => self.card_number.as_deref(),
            CheckoutField::CardExpire => self.card_expire.as_deref(),
            CheckoutField::Cvv => self.cvv.as_deref(),
        }
    }

    /// Stores a new raw value for `field` and refreshes the derived state
    pub fn set_field(&mut self, field: CheckoutField, raw: &str) {
        *self.slot(field) = sanitize(raw).and_then(|value| format_field(field, value));
        self.revalidate();
    }

    fn revalidate(&mut self) {
        let errors = self.schema.validate(|field| self.value(field));
        self.errors = errors;
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_errors(&self, field: CheckoutField) -> &[String] {
        self.errors.get(field)
    }

    pub fn is_invalid(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn brand(&self) -> Option<CardBrand> {
        self.card_number.as_deref().and_then(card::detect_brand)
    }

    pub fn submit_disabled(&self, props: &CheckoutProps) -> bool {
        self.is_invalid() || props.loading
    }

    /// Gate in front of the success handler.
    ///
    /// Returns the stored values only when every rule passes, otherwise the
    /// toast message and the current errors.
    pub fn submit(&self) -> Result<CheckoutValues, SubmitRejected> {
        let rejected = || SubmitRejected {
            toast: consts::SUBMIT_REJECTED_TOAST.to_string(),
            errors: self.errors.clone(),
        };

        if self.is_invalid() {
            return Err(rejected());
        }

        match (&self.email, &self.card_number, &self.card_expire, &self.cvv) {
            (Some(email), Some(card_number), Some(card_expire), Some(cvv)) => {
                Ok(CheckoutValues {
                    email: email.clone(),
                    card_number: card_number.clone(),
                    card_expire: card_expire.clone(),
                    cvv: cvv.clone(),
                })
            }
            _ => Err(rejected()),
        }
    }
}

/// Result of a submit attempt that reached the gate
#[derive(Debug)]
pub enum CheckoutOutcome {
    Accepted(CheckoutValues),
    Rejected(SubmitRejected),
}

/// Runs the submit gate and, when it opens, hands the values to `handler`.
///
/// A rejected submit is not an error: the caller re-renders the form with the
/// toast. Only a failing handler is reported as `Err`.
#[tracing::instrument(skip_all)]
pub async fn submit_checkout(
    form: &CheckoutForm,
    handler: &services::ImplCheckoutHandler,
) -> anyhow::Result<CheckoutOutcome> {
    let values = match form.submit() {
        Ok(values) => values,
        Err(rejected) => {
            log::info!(
                "checkout rejected, invalid fields: {:?}",
                rejected.errors.fields().collect::<Vec<_>>()
            );
            metric::incr_checkout_statds("rejected");
            return Ok(CheckoutOutcome::Rejected(rejected));
        }
    };

    if let Err(e) = handler.on_success(values.clone()).await {
        metric::incr_checkout_statds("handler_failed");
        anyhow::bail!("checkout success handler failed: {e}");
    }

    metric::incr_checkout_statds("accepted");
    Ok(CheckoutOutcome::Accepted(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockCheckoutHandler;
    use chrono::NaiveDate;
    use mockall::predicate::*;

    fn schema() -> CheckoutSchema {
        CheckoutSchema::new(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    fn filled_form() -> CheckoutForm {
        let mut form = CheckoutForm::new(schema());
        form.set_field(CheckoutField::Email, "buyer@example.com");
        form.set_field(CheckoutField::CardNumber, "4111111111111111");
        form.set_field(CheckoutField::CardExpire, "1227");
        form.set_field(CheckoutField::Cvv, "123");
        form
    }

    #[test]
    fn test_new_form_is_invalid() {
        let form = CheckoutForm::new(schema());

        assert!(form.is_invalid());
        assert_eq!(form.errors().len(), 4);
        assert_eq!(form.brand(), None);
        for field in CheckoutField::ALL {
            assert_eq!(form.value(field), None);
        }
    }

    #[test]
    fn test_set_field_formats_and_revalidates() {
        let mut form = CheckoutForm::new(schema());

        form.set_field(CheckoutField::CardNumber, "5105105105105100");
        assert_eq!(
            form.value(CheckoutField::CardNumber),
            Some("5105 1051 0510 5100")
        );
        assert_eq!(form.brand(), Some(CardBrand::Mastercard));
        assert!(form.field_errors(CheckoutField::CardNumber).is_empty());

        form.set_field(CheckoutField::CardExpire, "0128");
        assert_eq!(form.value(CheckoutField::CardExpire), Some("01/28"));
        assert!(form.field_errors(CheckoutField::CardExpire).is_empty());

        form.set_field(CheckoutField::CardNumber, "");
        assert_eq!(form.value(CheckoutField::CardNumber), None);
        assert_eq!(form.brand(), None);
        assert_eq!(
            form.field_errors(CheckoutField::CardNumber),
            ["Card number is required".to_string()]
        );
    }

    #[test]
    fn test_set_field_trims_without_rewriting() {
        let mut form = CheckoutForm::new(schema());

        form.set_field(CheckoutField::Email, "  buyer@example.com ");
        assert_eq!(form.value(CheckoutField::Email), Some("buyer@example.com"));

        form.set_field(CheckoutField::Cvv, "   ");
        assert_eq!(form.value(CheckoutField::Cvv), None);
    }

    #[test]
    fn test_set_field_reports_markup_in_email() {
        let mut form = CheckoutForm::new(schema());
        form.set_field(CheckoutField::Email, "buyer@example.com<script>x</script>");

        assert_eq!(
            form.value(CheckoutField::Email),
            Some("buyer@example.com<script>x</script>")
        );
        assert_eq!(
            form.field_errors(CheckoutField::Email),
            ["Email must not contain markup".to_string()]
        );
    }

    #[test]
    fn test_submit_keeps_email_byte_identical() {
        let mut form = filled_form();
        form.set_field(CheckoutField::Email, "tom&jerry@example.com");

        assert_eq!(form.value(CheckoutField::Email), Some("tom&jerry@example.com"));
        assert_eq!(form.submit().unwrap().email, "tom&jerry@example.com");
    }

    #[test]
    fn test_submit_rejected_with_toast() {
        let mut form = filled_form();
        form.set_field(CheckoutField::Cvv, "12");

        let rejected = form.submit().unwrap_err();
        assert_eq!(rejected.toast, consts::SUBMIT_REJECTED_TOAST);
        assert_eq!(rejected.to_string(), consts::SUBMIT_REJECTED_TOAST);
        assert_eq!(
            rejected.errors.fields().collect::<Vec<_>>(),
            vec![CheckoutField::Cvv]
        );

        assert!(CheckoutForm::new(schema()).submit().is_err());
    }

    #[test]
    fn test_submit_rejects_past_expiry() {
        let mut form = filled_form();
        form.set_field(CheckoutField::CardExpire, "09/26");

        assert!(form.submit().is_err());
    }

    #[test]
    fn test_submit_returns_entered_values() {
        let values = filled_form().submit().unwrap();

        assert_eq!(
            values,
            CheckoutValues {
                email: "buyer@example.com".into(),
                card_number: "4111 1111 1111 1111".into(),
                card_expire: "12/27".into(),
                cvv: "123".into(),
            }
        );
    }

    #[test]
    fn test_submit_disabled() {
        let loading = CheckoutProps {
            loading: true,
            ..CheckoutProps::default()
        };

        assert!(CheckoutForm::new(schema()).submit_disabled(&CheckoutProps::default()));
        assert!(!filled_form().submit_disabled(&CheckoutProps::default()));
        assert!(filled_form().submit_disabled(&loading));
    }

    #[test]
    fn test_from_values() {
        let form = CheckoutForm::from_values(schema(), |field| match field {
            CheckoutField::Email => Some("buyer@example.com"),
            CheckoutField::CardNumber => Some("4111 1111 1111 1111"),
            CheckoutField::CardExpire => Some("12/27"),
            CheckoutField::Cvv => None,
        });

        assert_eq!(form.value(CheckoutField::CardExpire), Some("12/27"));
        assert_eq!(
            form.errors().fields().collect::<Vec<_>>(),
            vec![CheckoutField::Cvv]
        );
    }

    #[ntex::test]
    async fn test_submit_checkout_calls_handler_with_values() {
        let form = filled_form();
        let expected = form.submit().unwrap();

        let mut mock_handler = MockCheckoutHandler::new();
        mock_handler
            .expect_on_success()
            .with(eq(expected.clone()))
            .times(1)
            .returning(|_| Ok(()));
        let mock_handler: services::ImplCheckoutHandler = Box::new(mock_handler);

        let outcome = submit_checkout(&form, &mock_handler).await.unwrap();

        assert!(matches!(outcome, CheckoutOutcome::Accepted(values) if values == expected));
    }

    #[ntex::test]
    async fn test_submit_checkout_skips_handler_when_invalid() {
        let mut form = filled_form();
        form.set_field(CheckoutField::Email, "");

        let mut mock_handler = MockCheckoutHandler::new();
        mock_handler.expect_on_success().times(0);
        let mock_handler: services::ImplCheckoutHandler = Box::new(mock_handler);

        let outcome = submit_checkout(&form, &mock_handler).await.unwrap();

        match outcome {
            CheckoutOutcome::Rejected(rejected) => {
                assert_eq!(rejected.toast, consts::SUBMIT_REJECTED_TOAST);
                assert!(rejected.errors.has_errors(CheckoutField::Email));
            }
            CheckoutOutcome::Accepted(_) => panic!("invalid form must not be accepted"),
        }
    }

    #[ntex::test]
    async fn test_submit_checkout_handler_error() {
        let mut mock_handler = MockCheckoutHandler::new();
        mock_handler
            .expect_on_success()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("downstream unavailable")));
        let mock_handler: services::ImplCheckoutHandler = Box::new(mock_handler);

        let result = submit_checkout(&filled_form(), &mock_handler).await;

        assert!(result.is_err());
    }
}
