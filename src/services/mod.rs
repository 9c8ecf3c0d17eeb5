pub mod checkout;

use crate::models::checkout::CheckoutValues;
use async_trait::async_trait;

/// Receives the form values once a checkout submit passes validation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckoutHandler {
    async fn on_success(&self, values: CheckoutValues) -> anyhow::Result<()>;
}

pub type ImplCheckoutHandler = Box<dyn CheckoutHandler>;
