use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write a log file at all
    pub enabled: bool,
    /// error, warn, info, debug or trace
    pub level: String,
    /// Echo log lines to stdout (garbles the TUI, meant for debugging)
    pub log_to_console: bool,
    pub append_to_file: bool,
    pub rotate_logs: bool,
    /// Size in MB at which the log file is rotated
    pub rotation_size_mb: u64,
    pub keep_log_files: u32,
    /// Overrides the platform log directory
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            log_to_console: false,
            append_to_file: true,
            rotate_logs: true,
            rotation_size_mb: 10,
            keep_log_files: 5,
            directory: None,
        }
    }
}
