//! Error pages of the checkout.
//!
//! Every variant renders a template from `web/templates/errors/`. Details
//! carried by [ServerError] go to the log only, the buyer sees a generic page.

use super::templates;
use derive_more::{Display, Error};
use ntex::{http, web};

#[derive(Debug, Display, Error)]
pub enum UserError {
    #[display("page not found")]
    UrlNotFound,
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, req: &web::HttpRequest) -> web::HttpResponse {
        log::warn!("{self}: {}", req.path());

        let mut context = tera::Context::new();
        let template_name = match self {
            UserError::UrlNotFound => {
                context.insert("msg_details", "This page does not exist.");
                "errors/url_not_found.html"
            }
        };

        render_error_page(self.status_code(), template_name, &context)
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::UrlNotFound => http::StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum ServerError {
    #[display("checkout page couldnt be rendered: {_0}")]
    TemplateError(#[error(not(source))] String),
    #[display("checkout feedback couldnt be rendered: {_0}")]
    WidgetTemplateError(#[error(not(source))] String),
    #[display("checkout success handler failed: {_0}")]
    ExternalServiceError(#[error(not(source))] String),
    #[display("checkout internal error: {_0}")]
    InternalServerError(#[error(not(source))] String),
    #[display("checkout submitted without a valid csrf token")]
    InvalidCsrfToken,
}

impl ServerError {
    fn template_name(&self) -> &'static str {
        match self {
            // htmx only swaps 2xx bodies, so this one is answered as 202
            // and lands in the toast out of band
            ServerError::WidgetTemplateError(_) => "errors/widget_page_err.html",
            ServerError::InvalidCsrfToken => "errors/invalid_csrf.html",
            _ => "errors/internal_error.html",
        }
    }
}

impl web::error::WebResponseError for ServerError {
    fn error_response(&self, req: &web::HttpRequest) -> web::HttpResponse {
        match self {
            ServerError::InvalidCsrfToken => log::warn!("{self}: {}", req.path()),
            _ => log::error!("{self}: {}", req.path()),
        }

        render_error_page(
            self.status_code(),
            self.template_name(),
            &tera::Context::new(),
        )
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            ServerError::WidgetTemplateError(_) => http::StatusCode::ACCEPTED,
            ServerError::InvalidCsrfToken => http::StatusCode::FORBIDDEN,
            _ => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn render_error_page(
    status: http::StatusCode,
    template_name: &str,
    context: &tera::Context,
) -> web::HttpResponse {
    let content = templates::WEB_TEMPLATES
        .render(template_name, context)
        .unwrap_or_else(|e| {
            log::error!("error page {template_name} couldnt be rendered: {e}");
            status.to_string()
        });

    web::HttpResponse::build(status)
        .set_header("content-type", "text/html; charset=utf-8")
        .body(content)
}
