pub mod checkout;
pub mod errors;
pub mod forms;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod templates;
pub mod utils;

use crate::{api::checkout::CheckoutProps, services};
use csrf::AesGcmCsrfProtection;

pub struct AppState {
    pub csrf_protec: AesGcmCsrfProtection,
    pub checkout_handler: services::ImplCheckoutHandler,
    pub checkout_props: CheckoutProps,
}
