//! Tracing initialization for embedders and binaries.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the tracing subscriber with structured JSON output.
///
/// Reads the `THALAMUS_LOG` environment variable for per-subsystem
/// levels (e.g. `THALAMUS_LOG=thalamus_retrieval=debug,thalamus=info`)
/// and falls back to `thalamus=info` when it is unset or invalid.
///
/// Idempotent: calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("THALAMUS_LOG")
            .unwrap_or_else(|_| EnvFilter::new("thalamus=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().json().with_target(true))
            .with(filter)
            .init();
    });
}
