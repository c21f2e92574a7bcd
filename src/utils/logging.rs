use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "CHATROUTE_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Diagnostics go to stderr so they never mix
/// with replies printed on stdout.
pub fn init_tracing() {
    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref());

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}
