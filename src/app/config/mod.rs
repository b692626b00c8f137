pub mod audio;
pub mod binds;
pub mod colors;
pub mod config;
pub mod logging;
pub mod source;

pub use audio::AudioConfig;
pub use binds::BindsConfig;
pub use colors::{ColorsConfig, Palette};
pub use config::{Config, FilterConfig};
pub use logging::LoggingConfig;
pub use source::SourceConfig;
