use tracing_subscriber::{EnvFilter, fmt};

/// `sqlx` logs every statement at info, which drowns the request log.
const DEFAULT_FILTER: &str = "info,board_server=debug,sqlx=warn";

pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // tests and the binary may both call this
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .json()
        .with_current_span(false)
        .try_init();
}
