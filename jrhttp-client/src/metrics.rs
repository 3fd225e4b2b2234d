//! Client metrics definitions
//!
//! OpenTelemetry instruments for call volume, latency and failures. They go
//! to whatever meter provider is installed globally, usually the one set up by
//! `jrhttp_core::init_observability`.
//!
//! # Metrics Collected
//!
//! - **calls_total**: calls made, by method and status (counter)
//! - **call_duration**: round-trip latency in seconds (histogram)
//! - **errors_total**: failed calls, by error kind (counter)
//! - **batch_size**: requests per batch (histogram)
//! - **notifications_sent**: notifications delivered (counter)
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrhttp_client::ClientMetrics;
//!
//! let metrics = ClientMetrics::new("ledger-client");
//! metrics.record_call("get_balance", "success", 0.012);
//! ```

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Client metrics for monitoring
pub struct ClientMetrics {
    /// Total number of calls made
    pub calls_total: Counter<u64>,
    /// Call duration in seconds
    pub call_duration: Histogram<f64>,
    /// Total number of failed calls
    pub errors_total: Counter<u64>,
    /// Batch size distribution
    pub batch_size: Histogram<u64>,
    /// Total number of notifications delivered
    pub notifications_sent: Counter<u64>,
}

impl ClientMetrics {
    /// Create metrics on the global meter named after the service
    pub fn new(service_name: impl Into<String>) -> Self {
        let meter = global::meter_with_scope(
            opentelemetry::InstrumentationScope::builder(service_name.into()).build(),
        );
        Self::new_with_meter(&meter)
    }

    /// Create metrics on a specific meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            calls_total: meter
                .u64_counter("jrhttp.client.calls.total")
                .with_description("Total number of calls made")
                .build(),
            call_duration: meter
                .f64_histogram("jrhttp.client.call.duration")
                .with_description("Call round-trip duration in seconds")
                .with_unit("s")
                .build(),
            errors_total: meter
                .u64_counter("jrhttp.client.errors.total")
                .with_description("Total number of failed calls")
                .build(),
            batch_size: meter
                .u64_histogram("jrhttp.client.batch.size")
                .with_description("Number of requests in batch calls")
                .build(),
            notifications_sent: meter
                .u64_counter("jrhttp.client.notifications.sent")
                .with_description("Total number of notifications delivered")
                .build(),
        }
    }

    /// Record a finished call
    ///
    /// `status` is "success", "rpc_error" or an error kind.
    pub fn record_call(&self, method: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.calls_total.add(1, attributes);
        self.call_duration.record(duration_secs, attributes);
    }

    /// Record a failure by its `Error::kind`
    pub fn record_error(&self, kind: &'static str) {
        self.errors_total.add(1, &[KeyValue::new("kind", kind)]);
    }

    /// Record a batch call
    pub fn record_batch(&self, size: u64) {
        self.batch_size.record(size, &[]);
    }

    /// Record a delivered notification
    pub fn record_notification(&self, method: &str) {
        let attributes = &[KeyValue::new("method", method.to_string())];
        self.notifications_sent.add(1, attributes);
    }
}

impl std::fmt::Debug for ClientMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientMetrics").finish_non_exhaustive()
    }
}
