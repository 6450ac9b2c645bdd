use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `vault_totp=debug`.
pub const LOG_ENV: &str = "VAULT_TOTP_LOG";

/// Install the global subscriber. Logs go to stderr so they never land in
/// the redraw region on stdout.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
