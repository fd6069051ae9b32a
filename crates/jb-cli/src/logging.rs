//! Logging initialization

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a fmt subscriber on stderr. `RUST_LOG` overrides the level derived
/// from the flags. Records from the `log` facade are forwarded as well.
pub fn init(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbose >= 2),
    );

    if let Err(e) = subscriber.try_init() {
        eprintln!("Warning: logging already initialized: {e}");
    }
}
