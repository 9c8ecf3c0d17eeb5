pub const CSRF_TOKEN_COOKIE_NAME: &str = "csrf_token";
pub const SESSION_COOKIE_NAME: &str = "card-checkout-session";

pub const CARD_NUMBER_MAX_DIGITS: usize = 16;
pub const CARD_NUMBER_GROUP_SIZE: usize = 4;
pub const CARD_EXPIRE_MAX_DIGITS: usize = 4;
pub const CARD_EXPIRE_FORMAT: &str = "MM/YY";
pub const CVV_DIGITS: usize = 3;

pub const DEFAULT_SUBMIT_TEXT: &str = "Pay";
pub const SUBMIT_REJECTED_TOAST: &str = "Please fix the highlighted fields before paying";

pub const MAX_AGE_COOKIES: i64 = chrono::TimeDelta::hours(1).num_seconds();
