//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
//! Logs go to stderr so stdout stays clean for `--format json`.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}
