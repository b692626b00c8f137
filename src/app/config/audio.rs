use serde::{Deserialize, Serialize};

/// Playback output settings. Tracks are streamed by an MPD server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioConfig {
    #[serde(default = "AudioConfig::default_enabled")]
    pub enabled: bool,
    /// `host:port` or a Unix socket path
    #[serde(default = "AudioConfig::default_mpd_address")]
    pub mpd_address: String,
    /// How often playback position is polled while connected
    #[serde(default = "AudioConfig::default_status_interval_ms")]
    pub status_interval_ms: u64,
}

impl AudioConfig {
    fn default_enabled() -> bool {
        true
    }
    fn default_mpd_address() -> String {
        "localhost:6600".to_string()
    }
    fn default_status_interval_ms() -> u64 {
        500
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            mpd_address: Self::default_mpd_address(),
            status_interval_ms: Self::default_status_interval_ms(),
        }
    }
}
