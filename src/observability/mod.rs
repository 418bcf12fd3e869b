// src/observability/mod.rs
//! Logging and metrics setup
//!
//! The library only emits `tracing` events and `metrics` counters; binaries
//! decide where they go by calling [`init_tracing`] and [`init_metrics`].

use crate::utils::config::{LogFormat, LoggingConfig};
use crate::utils::errors::{EngineError, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the configured log filter
pub const LOG_ENV_VAR: &str = "ASPECT_LOG";

/// Counter of interceptors installed, labeled by `namespace`
pub const WRAPS_INSTALLED_TOTAL: &str = "aspect_wraps_installed_total";

/// Counter of handler invocations, labeled by `phase`
pub const HANDLER_INVOCATIONS_TOTAL: &str = "aspect_handler_invocations_total";

/// Initialize the global tracing subscriber
///
/// `ASPECT_LOG` takes precedence over `config.level`; an unparsable value in
/// either is reported rather than ignored.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = match std::env::var(LOG_ENV_VAR) {
        Ok(directives) => parse_filter(LOG_ENV_VAR, &directives)?,
        Err(std::env::VarError::NotPresent) => parse_filter("logging.level", &config.level)?,
        Err(e) => {
            return Err(EngineError::ObservabilityError(format!(
                "Invalid {}: {}",
                LOG_ENV_VAR, e
            )))
        }
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    };

    result.map_err(|e| {
        EngineError::ObservabilityError(format!("Tracing already initialized: {}", e))
    })
}

fn parse_filter(source: &str, directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| {
        EngineError::ObservabilityError(format!(
            "Invalid log filter '{}' from {}: {}",
            directives, source, e
        ))
    })
}

/// Install the Prometheus recorder and return a handle for rendering
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        EngineError::ObservabilityError(format!("Failed to install metrics recorder: {}", e))
    })?;

    metrics::describe_counter!(
        WRAPS_INSTALLED_TOTAL,
        "Interceptors installed into member slots"
    );
    metrics::describe_counter!(HANDLER_INVOCATIONS_TOTAL, "Handler invocations by phase");

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases touch ASPECT_LOG, so they share one test to avoid racing
    #[test]
    fn test_invalid_filters_rejected() {
        let config = LoggingConfig {
            level: "aspect_engine=loud".to_string(),
            format: LogFormat::Pretty,
        };
        std::env::remove_var(LOG_ENV_VAR);
        let err = init_tracing(&config).unwrap_err();
        assert!(matches!(err, EngineError::ObservabilityError(_)));
        assert!(err.to_string().contains("logging.level"));

        // A broken override is reported even when the configured level is valid
        std::env::set_var(LOG_ENV_VAR, "aspect_engine=loud");
        let err = init_tracing(&LoggingConfig::default()).unwrap_err();
        std::env::remove_var(LOG_ENV_VAR);
        assert!(matches!(err, EngineError::ObservabilityError(_)));
        assert!(err.to_string().contains(LOG_ENV_VAR));
    }
}
