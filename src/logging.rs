use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the stderr subscriber. `IVONE_LOG` overrides the level chosen from `verbose`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "ivone=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_env("IVONE_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
