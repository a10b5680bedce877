//! `tracing` subscriber initialisation for hosts embedding ModHub.
//!
//! Call [`init_tracing`] once at process startup. The core itself only
//! *emits* events (module registered, tenant transitions); how they are
//! rendered is the host's choice.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `RUST_LOG` | Log filter (default `"info"`). |
//! | `MODHUB_LOG_FORMAT=json` | Emit newline-delimited JSON logs. |

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise the global `tracing` subscriber.
///
/// Safe to call more than once; later calls are no-ops (the first
/// subscriber wins), which keeps test binaries that share a process happy.
pub fn init_tracing(service_name: &str) {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let use_json = std::env::var("MODHUB_LOG_FORMAT").as_deref() == Ok("json");

    let result = if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()
    };

    if result.is_ok() {
        tracing::info!(service = service_name, "telemetry initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        init_tracing("modhub-test");
        init_tracing("modhub-test");
    }
}
