/*!
 * Tracing
 * Structured logging setup and per-command spans using the tracing crate
 */

use crate::core::limits::ENV_TRACE_JSON;
use std::time::{Duration, Instant};
use tracing::{debug, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - BUDDY_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        // JSON output for log shipping
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        tracing::info!("Structured tracing initialized with JSON output");
    } else {
        // Human-readable output, kept off stdout so it does not mix with shell output
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
        tracing::info!("Structured tracing initialized");
    }
}

/// Span covering one shell command
pub struct CommandSpan {
    span: Span,
    start: Instant,
}

impl CommandSpan {
    pub fn new(command: &str) -> Self {
        let span = span!(
            Level::DEBUG,
            "command",
            command = command,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Record the outcome and elapsed time
    pub fn finish(self, success: bool) {
        let elapsed = elapsed_micros(self.start.elapsed());
        self.span.record("duration_us", elapsed);
        self.span
            .record("result", if success { "success" } else { "error" });
        let _entered = self.span.enter();
        debug!(duration_us = elapsed, success, "command finished");
    }
}

/// Microseconds in `elapsed`, saturating at `u64::MAX`
fn elapsed_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
