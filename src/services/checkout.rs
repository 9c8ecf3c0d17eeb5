use async_trait::async_trait;
use log::info;

use crate::{api::card, metric, models::checkout::CheckoutValues};

/// Default success handler: records the accepted checkout without keeping
/// any card data around.
#[derive(Clone, Default)]
pub struct LogCheckoutHandler;

#[async_trait]
impl crate::services::CheckoutHandler for LogCheckoutHandler {
    async fn on_success(&self, values: CheckoutValues) -> anyhow::Result<()> {
        let brand = card::detect_brand(&values.card_number)
            .map(|b| b.to_string())
            .unwrap_or_default();

        info!(
            "checkout accepted for {email}: {brand} {masked}",
            email = values.email,
            masked = card::mask_card_number(&values.card_number),
        );
        metric::incr_checkout_brand_statds(&brand);

        Ok(())
    }
}
