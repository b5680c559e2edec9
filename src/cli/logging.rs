//! Diagnostic logging setup for the binary.

use tracing_subscriber::EnvFilter;

/// Picks the filter directives: a configured filter wins over the `-v` count.
pub fn filter_directives(verbose: u8, configured: Option<&str>) -> String {
    if let Some(filter) = configured {
        return filter.to_string();
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
    .to_string()
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over everything.
pub fn init(verbose: u8, configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbose, configured)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
