/*!
 * Structured Tracing
 * Subscriber setup for the acl-inspect binary
 */

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` selects the level (default `info`). `LAYOUTCONFIG_TRACE_JSON=1`
/// switches to JSON lines. Output goes to stderr so stdout stays a clean report.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("LAYOUTCONFIG_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if use_json {
        registry.with(fmt.json().with_current_span(false)).init();
    } else {
        registry.with(fmt.compact()).init();
    }
}
