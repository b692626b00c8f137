use serde::{Deserialize, Serialize};

/// Where the album JSON is served from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Server root; `app/albums/albums.json` is resolved against it
    #[serde(default = "SourceConfig::default_base_url")]
    pub base_url: String,
    /// Whole-request timeout in seconds
    #[serde(default = "SourceConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "SourceConfig::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl SourceConfig {
    fn default_base_url() -> String {
        "http://localhost:8000".to_string()
    }
    fn default_request_timeout_secs() -> u64 {
        30
    }
    fn default_connect_timeout_secs() -> u64 {
        10
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            connect_timeout_secs: Self::default_connect_timeout_secs(),
        }
    }
}
