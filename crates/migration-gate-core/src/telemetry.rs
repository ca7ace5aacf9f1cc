//! Tracing initialisation for the gate binaries.
//!
//! Log lines always go to standard error: standard output carries only the
//! report (or its JSON form), so it can be piped into an orchestrator
//! untouched. The global subscriber can only be set once per process; later
//! calls are no-ops.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` when set, otherwise `default`.
pub fn log_filter(default: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default.as_str()))
}

/// Install the global subscriber: human-readable lines, or newline-delimited
/// JSON when `json` is set. Returns `false` if a subscriber was already
/// installed.
pub fn init_tracing(json: bool, level: Level) -> bool {
    let text = (!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));
    let structured = json.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
    });

    tracing_subscriber::registry()
        .with(log_filter(level))
        .with(text)
        .with(structured)
        .try_init()
        .is_ok()
}
