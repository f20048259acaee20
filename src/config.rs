use serde::Deserialize;

use crate::services::selector::SelectionStrategy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the upstream recommendation API (the `/recommend/list` owner)
    #[serde(default = "default_recommend_api_url")]
    pub recommend_api_url: String,

    /// City sent upstream when the caller does not name one
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Upstream request timeout in milliseconds
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,

    /// Redis connection URL; caching of upstream candidate sets is off when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// TTL in seconds for cached candidate sets
    #[serde(default = "default_candidate_cache_ttl")]
    pub candidate_cache_ttl: u64,

    /// Page size used when the request omits one
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Upper bound for requested page sizes
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// How pages are materialized: `auto`, `full_sort` or `top_k`
    #[serde(default)]
    pub selection_strategy: SelectionStrategy,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_recommend_api_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_city() -> String {
    "上海".to_string()
}

fn default_upstream_timeout_ms() -> u64 {
    10_000
}

fn default_candidate_cache_ttl() -> u64 {
    300
}

fn default_page_size() -> usize {
    12
}

fn default_max_page_size() -> usize {
    100
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recommend_api_url: default_recommend_api_url(),
            default_city: default_city(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
            redis_url: None,
            candidate_cache_ttl: default_candidate_cache_ttl(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            selection_strategy: SelectionStrategy::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            anyhow::bail!("DEFAULT_PAGE_SIZE and MAX_PAGE_SIZE must be positive");
        }
        if self.default_page_size > self.max_page_size {
            anyhow::bail!(
                "DEFAULT_PAGE_SIZE ({}) exceeds MAX_PAGE_SIZE ({})",
                self.default_page_size,
                self.max_page_size
            );
        }
        Ok(())
    }
}
