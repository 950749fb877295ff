//! Diagnostic logging
//!
//! `tracing` events go to stderr; stdout stays for progress and the summary
//! table. `RUST_LOG` wins over the `--verbose` default.

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    // A second init (tests, embedding) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
