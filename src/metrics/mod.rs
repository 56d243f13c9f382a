//! Prometheus counters for watch and binding activity.
//!
//! Collectors live in a crate-local [`struct@REGISTRY`]; [`gather_metrics`]
//! renders them together with the autometrics series of the client API.

use autometrics::prometheus_exporter;
use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::warn;

use crate::BindError;
use crate::Error;

lazy_static! {
    pub static ref WATCH_DELIVERIES: IntCounterVec = IntCounterVec::new(
        Opts::new("kv_watch_deliveries_total", "Entries delivered by watch loops"),
        &["key"]
    )
    .expect("metric can not be created");

    pub static ref WATCH_TERMINATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("kv_watch_terminations_total", "Watch loops stopped, by reason"),
        &["reason"]
    )
    .expect("metric can not be created");

    pub static ref BIND_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("kv_bind_failures_total", "Aborted config binds, by error class"),
        &["kind"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = {
        let registry = Registry::new();
        register_custom_metrics(&registry);
        registry
    };
}

fn register_custom_metrics(registry: &Registry) {
    let collectors = [
        WATCH_DELIVERIES.clone(),
        WATCH_TERMINATIONS.clone(),
        BIND_FAILURES.clone(),
    ];
    for collector in collectors {
        if let Err(e) = registry.register(Box::new(collector)) {
            warn!("collector can not be registered: {:?}", e);
        }
    }
}

pub(crate) fn record_watch_delivery(key: &str) {
    WATCH_DELIVERIES.with_label_values(&[key]).inc();
}

pub(crate) fn record_watch_termination(reason: &str) {
    WATCH_TERMINATIONS.with_label_values(&[reason]).inc();
}

pub(crate) fn record_bind_failure(error: &Error) {
    BIND_FAILURES.with_label_values(&[bind_failure_kind(error)]).inc();
}

fn bind_failure_kind(error: &Error) -> &'static str {
    match error {
        Error::Bind(BindError::MalformedValue { .. }) => "malformed",
        Error::Bind(BindError::UnsupportedType { .. }) => "unsupported",
        Error::Bind(BindError::InvalidTagSyntax { .. }) => "tag",
        Error::Bind(BindError::DuplicatePathSegment { .. }) => "duplicate",
        Error::Bind(BindError::MissingAccessor { .. }) => "accessor",
        Error::NotFound { .. } => "not_found",
        Error::Store(_) => "store",
        _ => "other",
    }
}

/// Renders crate counters and autometrics series in Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        warn!("could not encode custom metrics: {}", e);
    }
    let mut res = match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            warn!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    };

    res.push_str(&prometheus_exporter::encode_http_response().into_body());
    res
}
