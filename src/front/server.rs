//! Handlers not linked to a specific url

use ntex::web;

use crate::front::{errors, utils};

/// Return a [UrlNotFound](errors::UserError::UrlNotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(errors::UserError::UrlNotFound.into())
}

/// The checkout is the only page, the index sends the user there
#[web::get("/")]
async fn index() -> Result<impl web::Responder, web::Error> {
    utils::redirect_to("/checkout")
}
