use std::sync::{Arc, LazyLock};

use bannerlog_core::{FanOut, Level, SharedState};
use derive_from_env::FromEnv;

#[derive(FromEnv)]
#[from_env(prefix = "BANNERLOG")]
#[allow(non_snake_case)]
pub struct BannerLogConfig {
    #[from_env(default = "trace")]
    pub LEVEL: Level,
    #[from_env(default = "true")]
    pub COLOR: bool,
    #[from_env(default = "false")]
    pub ESCAPE_NEWLINE: bool,
}

impl Default for BannerLogConfig {
    fn default() -> Self {
        Self {
            LEVEL: Level::Trace,
            COLOR: true,
            ESCAPE_NEWLINE: false,
        }
    }
}

/// Settings read from `BANNERLOG_*` environment variables. Unparsable values fall back to defaults.
pub static BANNERLOG_CONFIG: LazyLock<BannerLogConfig> =
    LazyLock::new(|| BannerLogConfig::from_env().unwrap_or_default());

static GLOBAL_SHARED_STATE: LazyLock<Arc<SharedState>> = LazyLock::new(|| {
    Arc::new(SharedState::new(BANNERLOG_CONFIG.LEVEL, FanOut::stderr()))
});

/// The process-wide shared state behind [`Logger::new`](crate::Logger::new).
/// Starts at `BANNERLOG_LEVEL` and writes to stderr.
pub fn global_shared() -> Arc<SharedState> {
    Arc::clone(&GLOBAL_SHARED_STATE)
}
