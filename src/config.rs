//! Application configuration loaded from the environment.
//!
//! # Security Notes
//! - Sensitive fields are marked and should never be logged
//! - Production environments should inject them from a secret manager

use envconfig::Envconfig;
use std::sync::LazyLock;

use crate::{api::checkout::CheckoutProps, consts};

/// Environment variables used to configure the checkout server.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(from = "ENV", default = "local")]
    pub env: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(from = "WEB_SERVER_HOST", default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(from = "WEB_SERVER_PORT", default = "8080")]
    pub web_server_port: u16,

    /// Path to SSL private key file, only read in prod (SENSITIVE PATH)
    #[envconfig(from = "PRIVATE_KEY_PATH", default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file, only read in prod (NON-SENSITIVE)
    #[envconfig(from = "CERTIFICATE_PATH", default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: CSRF protection password (UUID format)
    #[envconfig(from = "CSRF_PASS")]
    pub csrf_pass: String,

    /// 🔒 SENSITIVE: CSRF protection salt (UUID format)
    #[envconfig(from = "CSRF_SALT")]
    pub csrf_salt: String,

    /// Label of the submit button (NON-SENSITIVE)
    #[envconfig(from = "CHECKOUT_SUBMIT_TEXT", default = "Pay")]
    pub checkout_submit_text: String,

    /// Renders the checkout with the submit button disabled (NON-SENSITIVE)
    #[envconfig(from = "CHECKOUT_LOADING", default = "false")]
    pub checkout_loading: bool,

    /// 🔒 SENSITIVE: Logfire write token. Logs go to stdout when unset.
    #[envconfig(from = "LOGFIRE_TOKEN")]
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Properties for the checkout component
    pub fn checkout_props(&self) -> CheckoutProps {
        let submit_text = match self.checkout_submit_text.trim() {
            "" => consts::DEFAULT_SUBMIT_TEXT.to_string(),
            text => text.to_string(),
        };

        CheckoutProps {
            submit_text,
            loading: self.checkout_loading,
        }
    }
}

/// Global application configuration instance.
///
/// If the environment is incomplete, the application will panic on first
/// access with a descriptive error message.
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    AppConfig::init_from_env()
        .expect("Failed to load application configuration. Check CSRF_PASS and CSRF_SALT are set.")
});
