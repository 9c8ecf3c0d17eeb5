use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("card_checkout_statds")
        .with_description("Card checkout statistics")
        .with_unit("attempt")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

/// `rejected`, `accepted` or `handler_failed`
pub fn incr_checkout_statds(status: &str) {
    incr_statds("checkout".to_string(), status.into())
}

pub fn incr_checkout_brand_statds(brand: &str) {
    incr_statds("card_brand".to_string(), brand.into())
}
