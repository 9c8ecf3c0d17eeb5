//! CSRF protection for the checkout submit.
//!
//! The page carries the token half of an AES-GCM pair in a hidden `csrf_token`
//! input while the private session cookie keeps only the cookie half. A submit
//! is accepted when the posted token pairs with the cookie in its own session.

use base64::{Engine, prelude::BASE64_STANDARD};
use csrf::{CsrfProtection, UnencryptedCsrfCookie, UnencryptedCsrfToken};
use ntex_session::Session;

use crate::{
    consts,
    front::{AppState, errors},
};

/// Generates a new pair, stores the cookie half in `session` and returns the
/// base64 token half to render into the form
pub fn issue_csrf_token(
    app_state: &AppState,
    session: &Session,
) -> Result<String, errors::ServerError> {
    let (csrf_token, csrf_cookie) = app_state
        .csrf_protec
        .generate_token_pair(None, consts::MAX_AGE_COOKIES)
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!("cant generate csrf token pair: {e}"))
        })?;

    session
        .set(consts::CSRF_TOKEN_COOKIE_NAME, csrf_cookie.b64_string())
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!(
                "cant store the csrf cookie in session: {e}"
            ))
        })?;

    Ok(csrf_token.b64_string())
}

fn parse_posted_token(app_state: &AppState, token_base64: &str) -> Option<UnencryptedCsrfToken> {
    let token = BASE64_STANDARD.decode(token_base64.as_bytes()).ok()?;
    app_state.csrf_protec.parse_token(&token).ok()
}

fn parse_session_cookie(app_state: &AppState, session: &Session) -> Option<UnencryptedCsrfCookie> {
    let cookie_base64 = session
        .get::<String>(consts::CSRF_TOKEN_COOKIE_NAME)
        .ok()
        .flatten()?;
    let cookie = BASE64_STANDARD.decode(cookie_base64.as_bytes()).ok()?;
    app_state.csrf_protec.parse_cookie(&cookie).ok()
}

/// Checks the token posted with the form against the cookie half kept in
/// `session`. A missing session, a missing token or an expired pair all fail
/// with [InvalidCsrfToken](errors::ServerError::InvalidCsrfToken).
pub fn verify_csrf_token(
    app_state: &AppState,
    session: &Session,
    token_base64: &str,
) -> Result<(), errors::ServerError> {
    let pair = (
        parse_posted_token(app_state, token_base64),
        parse_session_cookie(app_state, session),
    );

    match pair {
        (Some(token), Some(cookie))
            if app_state
                .csrf_protec
                .verify_token_pair(&token, &cookie)
                .is_ok() =>
        {
            Ok(())
        }
        (token, cookie) => {
            log::warn!(
                "csrf check failed: posted token parsed={} session cookie parsed={}",
                token.is_some(),
                cookie.is_some()
            );
            Err(errors::ServerError::InvalidCsrfToken)
        }
    }
}
