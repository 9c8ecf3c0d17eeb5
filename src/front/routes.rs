//! Frontend route configuration module.

use super::checkout;
use ntex::web;

/// Configures the checkout form routes.
///
/// # Routes
/// - `GET /checkout` - Checkout page view
/// - `POST /checkout/field` - Re-render the form while the user types (htmx widget)
/// - `POST /checkout` - Submit the form
pub fn checkout(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/checkout").service((
        checkout::get_checkout_view,
        checkout::refresh_checkout_form,
        checkout::submit_checkout_form,
    )));
}
