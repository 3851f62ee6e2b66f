//! Tracing subscriber setup for the `pie` binary.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the log filter, e.g. `PIE_LOG=pie_cache=debug`.
pub const LOG_ENV: &str = "PIE_LOG";

static INIT: Once = Once::new();

/// Installs a stderr subscriber once per process.
///
/// `PIE_LOG` wins when set; otherwise `--verbose` selects `debug`, `--quiet`
/// selects `error`, and the default is `warn`.
pub fn init(verbose: bool, quiet: bool) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init();
    });
}

fn default_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_quiet() {
        assert_eq!(default_level(true, true), "debug");
        assert_eq!(default_level(false, true), "error");
        assert_eq!(default_level(false, false), "warn");
    }
}
