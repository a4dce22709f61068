use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging to stderr.
///
/// `QASS_LOG` (an `EnvFilter` directive such as `qass_score=trace`) wins
/// over the verbosity flag.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose {
        "qass_score=debug,qass=debug"
    } else {
        "qass_score=warn,qass=warn"
    };

    let filter = EnvFilter::try_from_env("QASS_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(())
}
