//! Diagnostic logging setup
//!
//! Logging is off unless `JVMNAME_LOG` (or `RUST_LOG`) is set. Values use
//! `EnvFilter` syntax, e.g. `JVMNAME_LOG=jvmname_core=debug`. Output goes to
//! stderr so it never mixes with reports on stdout.

use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    let filter = match std::env::var("JVMNAME_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
