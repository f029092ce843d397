//! Metrics for generation calls.
//!
//! Provides OpenTelemetry-based metrics for tracking generation latency,
//! errors and fallbacks across every adapter and the proxy client.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use panelcraft_error::{PanelcraftError, PanelcraftErrorKind, PanelcraftResult};
use std::sync::OnceLock;
use std::time::Instant;

static METRICS: OnceLock<GenerationMetrics> = OnceLock::new();

/// Metrics for text and image generation.
///
/// Labeled with provider (gemini, tensoropera, proxy, ...) and model name.
#[derive(Clone)]
pub struct GenerationMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Total generation requests
    pub requests: Counter<u64>,
    /// Failed generation requests
    pub errors: Counter<u64>,
    /// Requests routed to the proxy after a primary failure
    pub fallbacks: Counter<u64>,
    /// Generation call duration in seconds
    pub duration: Histogram<f64>,
}

impl GenerationMetrics {
    fn init() -> Self {
        let meter = global::meter("panelcraft_generation");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("generation.requests")
                .with_description("Total generation requests")
                .build(),
            errors: meter
                .u64_counter("generation.errors")
                .with_description("Failed generation requests")
                .build(),
            fallbacks: meter
                .u64_counter("generation.fallbacks")
                .with_description("Requests retried through the generation proxy")
                .build(),
            duration: meter
                .f64_histogram("generation.duration")
                .with_unit("seconds")
                .with_description("Generation call duration")
                .build(),
        }
    }

    /// Get the global generation metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a completed generation request.
    pub fn record_request(&self, provider: &str, model: &str, duration_secs: f64) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.requests.add(1, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record a failed generation request.
    pub fn record_error(&self, provider: &str, model: &str, error_type: &str) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
            KeyValue::new("error_type", error_type.to_string()),
        ];
        self.errors.add(1, labels);
    }

    /// Record a switch to the fallback path.
    pub fn record_fallback(&self, resource: &str, reason: &str) {
        let labels = &[
            KeyValue::new("resource", resource.to_string()),
            KeyValue::new("reason", reason.to_string()),
        ];
        self.fallbacks.add(1, labels);
    }

    /// Record the outcome of one call started at `start`.
    pub fn observe<T>(
        &self,
        provider: &str,
        model: &str,
        start: Instant,
        result: &PanelcraftResult<T>,
    ) {
        self.record_request(provider, model, start.elapsed().as_secs_f64());
        if let Err(e) = result {
            self.record_error(provider, model, classify_error(e));
        }
    }
}

impl Default for GenerationMetrics {
    fn default() -> Self {
        Self::get().clone()
    }
}

/// Classify an error for metrics labeling.
///
/// Adapter errors use their own category; everything else is grouped by layer.
pub fn classify_error(error: &PanelcraftError) -> &'static str {
    if let Some(kind) = error.provider_kind() {
        return kind.category();
    }
    match error.kind() {
        PanelcraftErrorKind::Json(_) => "response",
        PanelcraftErrorKind::Generation(_) => "generation",
        PanelcraftErrorKind::Config(_) => "config",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelcraft_error::{JsonError, ProviderError, ProviderErrorKind};

    #[test]
    fn test_classify_provider_errors() {
        let err = PanelcraftError::from(ProviderError::new(ProviderErrorKind::HttpError {
            status_code: 403,
            message: "denied".to_string(),
        }));
        assert_eq!(classify_error(&err), "auth");

        let err = PanelcraftError::from(ProviderError::new(ProviderErrorKind::Request(
            "connection refused".to_string(),
        )));
        assert_eq!(classify_error(&err), "network");

        let err = PanelcraftError::from(JsonError::new("trailing comma"));
        assert_eq!(classify_error(&err), "response");
    }
}
