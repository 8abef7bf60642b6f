use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the transaction log the engine is built from
    #[serde(default = "default_transactions_path")]
    pub transactions_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default number of recommendations returned per request
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Default minimum co-occurrence count for lift-based scoring
    #[serde(default = "default_min_co_occurrence")]
    pub min_co_occurrence: u32,

    /// Number of random products shown in the discover section
    #[serde(default = "default_discover_count")]
    pub discover_count: usize,
}

fn default_transactions_path() -> String {
    "transactions.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recommendation_limit() -> usize {
    3
}

fn default_min_co_occurrence() -> u32 {
    2
}

fn default_discover_count() -> usize {
    3
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transactions_path: default_transactions_path(),
            host: default_host(),
            port: default_port(),
            recommendation_limit: default_recommendation_limit(),
            min_co_occurrence: default_min_co_occurrence(),
            discover_count: default_discover_count(),
        }
    }
}
