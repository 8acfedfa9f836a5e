use serde::Deserialize;

/// Engine configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory used by the file-backed storage substrate
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Maximum number of suggestion history entries kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Default number of ranked candidates returned per request
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
}

fn default_data_dir() -> String {
    "./wardrobe-data".to_string()
}

fn default_history_limit() -> usize {
    100
}

fn default_candidate_limit() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            history_limit: default_history_limit(),
            candidate_limit: default_candidate_limit(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

/// Installs a global tracing subscriber honoring `RUST_LOG`
///
/// Embedders that already install their own subscriber can skip this.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
