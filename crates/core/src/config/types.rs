use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub covers: CoversConfig,
    #[serde(default)]
    pub icons: IconsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Anchor every relative path (cache dir, icons, log file) at `base_dir`.
    pub fn resolve_paths(mut self, base_dir: &Path) -> Self {
        self.cache.dir = anchor(base_dir, &self.cache.dir);
        self.icons.app_icon = anchor(base_dir, &self.icons.app_icon);
        self.icons.default_cover = anchor(base_dir, &self.icons.default_cover);
        self.logging.file = self.logging.file.map(|f| anchor(base_dir, &f));
        self
    }
}

fn anchor(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Cover cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Directory holding `<key>.jpg` files.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    /// Files at or below this size are treated as placeholders.
    #[serde(default = "default_min_valid_bytes")]
    pub min_valid_bytes: u64,
    /// Entries older than this are removed by the eviction sweep.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
    /// Interval between sweeps. 0 sweeps once at startup.
    #[serde(default)]
    pub sweep_interval_secs: u64,
    /// How long shutdown waits for an in-progress sweep.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl CacheConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    /// `None` when the sweep should only run once.
    pub fn sweep_interval(&self) -> Option<Duration> {
        match self.sweep_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            min_valid_bytes: default_min_valid_bytes(),
            max_age_secs: default_max_age_secs(),
            sweep_interval_secs: 0,
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("img_cache")
}

fn default_min_valid_bytes() -> u64 {
    1000
}

fn default_max_age_secs() -> u64 {
    3 * 24 * 60 * 60
}

fn default_shutdown_grace_ms() -> u64 {
    250
}

/// Catalog search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Catalog base URL (e.g., "https://openlibrary.org")
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds (default: 8)
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
    /// Number of documents requested from the catalog.
    #[serde(default = "default_request_limit")]
    pub request_limit: u32,
    /// Number of records kept after truncation.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_catalog_timeout(),
            request_limit: default_request_limit(),
            max_results: default_max_results(),
        }
    }
}

fn default_catalog_url() -> String {
    "https://openlibrary.org".to_string()
}

fn default_user_agent() -> String {
    format!("Shelfcover/{}", env!("CARGO_PKG_VERSION"))
}

fn default_catalog_timeout() -> u64 {
    8
}

fn default_request_limit() -> u32 {
    10
}

fn default_max_results() -> usize {
    5
}

/// Cover image endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoversConfig {
    /// Cover service base URL (e.g., "https://covers.openlibrary.org")
    #[serde(default = "default_covers_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-attempt timeout in seconds (default: 5)
    #[serde(default = "default_covers_timeout")]
    pub timeout_secs: u64,
}

impl Default for CoversConfig {
    fn default() -> Self {
        Self {
            base_url: default_covers_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_covers_timeout(),
        }
    }
}

fn default_covers_url() -> String {
    "https://covers.openlibrary.org".to_string()
}

fn default_covers_timeout() -> u64 {
    5
}

/// Icons shown by the host launcher
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IconsConfig {
    /// Icon for informational placeholder items.
    #[serde(default = "default_app_icon")]
    pub app_icon: PathBuf,
    /// Icon used when no cover could be resolved.
    #[serde(default = "default_cover_icon")]
    pub default_cover: PathBuf,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            app_icon: default_app_icon(),
            default_cover: default_cover_icon(),
        }
    }
}

fn default_app_icon() -> PathBuf {
    PathBuf::from("app.png")
}

fn default_cover_icon() -> PathBuf {
    PathBuf::from("book.png")
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log file. When unset, logs go to stderr.
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
    /// Default filter directive, overridden by RUST_LOG.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("debug.log"))
}

fn default_log_level() -> String {
    "info".to_string()
}
