/*!
Logging (and optional profiling) setup for the command-line tool.

Without the `profiling` feature this only installs a `fmt` layer on stderr.
With it, a chrome trace layer is registered as well and `profiling::scope!`
spans from the library end up in a `trace-*.json` file that can be opened in
Perfetto. The returned guard flushes that file when dropped.
*/

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Keeps logging/profiling backends alive until the end of `main`
#[must_use = "dropping the guard stops trace collection"]
pub struct LoggingGuard {
    #[cfg(feature = "profiling")]
    _flush: tracing_chrome::FlushGuard,
}

/// Default filter when `RUST_LOG` is not set
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if cfg!(debug_assertions) {
        "info"
    } else {
        "warn"
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `verbose` when it is set.
pub fn setup_logging(verbose: bool) -> LoggingGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    #[cfg(feature = "profiling")]
    {
        // The chrome layer must sit directly on the registry
        let (chrome_layer, flush) = tracing_chrome::ChromeLayerBuilder::new()
            .include_args(true)
            .build();
        tracing_subscriber::registry()
            .with(chrome_layer)
            .with(fmt_layer)
            .init();
        tracing::info!("profiling enabled, trace written on exit");
        LoggingGuard { _flush: flush }
    }

    #[cfg(not(feature = "profiling"))]
    {
        tracing_subscriber::registry().with(fmt_layer).init();
        LoggingGuard {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(true), "debug");
        assert!(matches!(default_directives(false), "info" | "warn"));
    }
}
