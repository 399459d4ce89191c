//! Log filter setup.
//!
//! A global level in RUST_LOG wins; --verbose falls back to DEBUG. Otherwise the
//! filter starts at WARN and is replaced by the loaded file's `logger.level`
//! once it is known.

use openapi_filter_config::Config;
use tracing::{debug, warn, Level};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

pub struct Logging {
    handle: reload::Handle<EnvFilter, Registry>,
    pinned: bool,
}

impl Logging {
    pub fn init(verbose: bool) -> Self {
        let default_level = if verbose { Level::DEBUG } else { Level::WARN };
        let filter =
            EnvFilter::builder().with_default_directive(default_level.into()).from_env_lossy();
        let (filter, handle) = reload::Layer::new(filter);
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init();

        let pinned = verbose || std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
        Logging { handle, pinned }
    }

    /// Switch to the level requested by the configuration file, unless the
    /// command line or environment already chose one.
    pub fn apply(&self, config: &Config) {
        let Some(logger) = config.tool.logger.as_ref() else {
            return;
        };
        let Some(level) = logger.level_directive() else {
            if !logger.level.is_empty() {
                warn!("Ignoring unknown logger level {:?}", logger.level);
            }
            return;
        };
        if self.pinned {
            debug!(%level, "Keeping log filter from command line or environment");
            return;
        }
        match self.handle.modify(|filter| *filter = EnvFilter::new(level.to_string())) {
            Ok(()) => debug!(%level, "Applied logger level from config"),
            Err(e) => warn!("Failed to apply logger level {}: {}", level, e),
        }
    }
}
