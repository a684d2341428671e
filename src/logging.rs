use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Filter directives for the library's diagnostics, e.g. `clirunner=debug`.
/// Logging stays off unless this is set.
pub const LOG_ENV: &str = "CLIRUNNER_LOG";

static INIT: OnceCell<()> = OnceCell::new();

/// Install a stderr subscriber on first use when `CLIRUNNER_LOG` is set.
///
/// Hosts that already installed a global subscriber keep theirs.
pub fn init() {
    INIT.get_or_init(|| {
        let Ok(directives) = std::env::var(LOG_ENV) else {
            return;
        };
        let env_filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false);

        let init_result = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();

        if let Err(err) = init_result {
            tracing::warn!(error = %err, "tracing already initialized; skipping CLIRUNNER_LOG setup");
        }
    });
}
