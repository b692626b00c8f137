use clap::Parser;
use std::path::PathBuf;

use crate::app::router::Route;

#[derive(Parser, Debug, Clone)]
#[command(name = "platter")]
#[command(version)]
#[command(about = "A terminal music library browser", long_about = None)]
pub struct Args {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the album data server (overrides config)
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// MPD server address used for audio output (overrides config)
    #[arg(short = 'a', long)]
    pub mpd_address: Option<String>,

    /// Browse without audio output
    #[arg(long)]
    pub no_audio: bool,

    /// Write a default config file to the given path and exit
    #[arg(long, value_name = "PATH")]
    pub generate_config: Option<PathBuf>,

    /// Route to open first, e.g. "albums/3"
    #[arg(value_parser = parse_route)]
    pub route: Option<Route>,
}

impl Args {
    pub fn start_route(&self) -> Route {
        self.route.clone().unwrap_or(Route::AlbumList)
    }
}

fn parse_route(s: &str) -> Result<Route, String> {
    Route::parse(s).ok_or_else(|| format!("Unknown route '{}': expected '' or 'albums/<id>'", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::library::AlbumId;

    #[test]
    fn test_defaults_to_album_list() {
        let args = Args::try_parse_from(["platter"]).unwrap();
        assert_eq!(args.start_route(), Route::AlbumList);
        assert!(!args.no_audio);
    }

    #[test]
    fn test_start_route_and_overrides() {
        let args = Args::try_parse_from([
            "platter",
            "--base-url",
            "http://music.local",
            "--no-audio",
            "#albums/12",
        ])
        .unwrap();
        assert_eq!(args.start_route(), Route::AlbumDetail(AlbumId::new("12")));
        assert_eq!(args.base_url.as_deref(), Some("http://music.local"));
        assert!(args.no_audio);
    }

    #[test]
    fn test_rejects_unknown_route() {
        assert!(Args::try_parse_from(["platter", "artists/1"]).is_err());
    }
}
