use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Hex colours from the `[colors]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorsConfig {
    #[serde(default = "ColorsConfig::default_border")]
    pub border: String,
    #[serde(default = "ColorsConfig::default_border_title")]
    pub border_title: String,
    #[serde(default = "ColorsConfig::default_artist")]
    pub artist: String,
    #[serde(default = "ColorsConfig::default_album")]
    pub album: String,
    #[serde(default = "ColorsConfig::default_song_title")]
    pub song_title: String,
    #[serde(default = "ColorsConfig::default_track_number")]
    pub track_number: String,
    #[serde(default = "ColorsConfig::default_duration")]
    pub duration: String,
    #[serde(default = "ColorsConfig::default_selected_highlight")]
    pub selected_highlight: String,
    #[serde(default = "ColorsConfig::default_selected_text")]
    pub selected_text: String,
    #[serde(default = "ColorsConfig::default_now_playing")]
    pub now_playing: String,
    #[serde(default = "ColorsConfig::default_placeholder")]
    pub placeholder: String,
    #[serde(default = "ColorsConfig::default_playing")]
    pub playing: String,
    #[serde(default = "ColorsConfig::default_paused")]
    pub paused: String,
    #[serde(default = "ColorsConfig::default_stopped")]
    pub stopped: String,
    #[serde(default = "ColorsConfig::default_error")]
    pub error: String,
}

/// Resolved colours handed to views and widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub border: Color,
    pub border_title: Color,
    pub artist: Color,
    pub album: Color,
    pub song_title: Color,
    pub track_number: Color,
    pub duration: Color,
    pub selected_highlight: Color,
    pub selected_text: Color,
    pub now_playing: Color,
    pub placeholder: Color,
    pub playing: Color,
    pub paused: Color,
    pub stopped: Color,
    pub error: Color,
}

impl Default for Palette {
    fn default() -> Self {
        ColorsConfig::default().palette()
    }
}

impl ColorsConfig {
    /// Parse a hex color string like "#FF5500" into RGB values
    pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }

    fn color(hex: &str, fallback: Color) -> Color {
        Self::parse_hex(hex)
            .map(|(r, g, b)| Color::Rgb(r, g, b))
            .unwrap_or_else(|| {
                log::warn!("Invalid color {:?}, using {:?}", hex, fallback);
                fallback
            })
    }

    pub fn palette(&self) -> Palette {
        Palette {
            border: Self::color(&self.border, Color::White),
            border_title: Self::color(&self.border_title, Color::White),
            artist: Self::color(&self.artist, Color::Cyan),
            album: Self::color(&self.album, Color::White),
            song_title: Self::color(&self.song_title, Color::Yellow),
            track_number: Self::color(&self.track_number, Color::DarkGray),
            duration: Self::color(&self.duration, Color::Gray),
            selected_highlight: Self::color(&self.selected_highlight, Color::Blue),
            selected_text: Self::color(&self.selected_text, Color::Black),
            now_playing: Self::color(&self.now_playing, Color::Green),
            placeholder: Self::color(&self.placeholder, Color::DarkGray),
            playing: Self::color(&self.playing, Color::Green),
            paused: Self::color(&self.paused, Color::Yellow),
            stopped: Self::color(&self.stopped, Color::Red),
            error: Self::color(&self.error, Color::Red),
        }
    }

    fn default_border() -> String {
        "#fae280".to_string()
    }
    fn default_border_title() -> String {
        "#8a8a8a".to_string()
    }
    fn default_artist() -> String {
        "#fae280".to_string()
    }
    fn default_album() -> String {
        "#26a0a1".to_string()
    }
    fn default_song_title() -> String {
        "#fbeeb8".to_string()
    }
    fn default_track_number() -> String {
        "#8a8a8a".to_string()
    }
    fn default_duration() -> String {
        "#e16a7c".to_string()
    }
    fn default_selected_highlight() -> String {
        "#fae280".to_string()
    }
    fn default_selected_text() -> String {
        "#180f39".to_string()
    }
    fn default_now_playing() -> String {
        "#94e2d5".to_string()
    }
    fn default_placeholder() -> String {
        "#6c7086".to_string()
    }
    fn default_playing() -> String {
        "#94e2d5".to_string()
    }
    fn default_paused() -> String {
        "#fae280".to_string()
    }
    fn default_stopped() -> String {
        "#e16a7c".to_string()
    }
    fn default_error() -> String {
        "#f38ba8".to_string()
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            border: Self::default_border(),
            border_title: Self::default_border_title(),
            artist: Self::default_artist(),
            album: Self::default_album(),
            song_title: Self::default_song_title(),
            track_number: Self::default_track_number(),
            duration: Self::default_duration(),
            selected_highlight: Self::default_selected_highlight(),
            selected_text: Self::default_selected_text(),
            now_playing: Self::default_now_playing(),
            placeholder: Self::default_placeholder(),
            playing: Self::default_playing(),
            paused: Self::default_paused(),
            stopped: Self::default_stopped(),
            error: Self::default_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(ColorsConfig::parse_hex("#FF5500"), Some((255, 85, 0)));
        assert_eq!(ColorsConfig::parse_hex("00ff00"), Some((0, 255, 0)));
        assert_eq!(ColorsConfig::parse_hex("#FFF"), None);
        assert_eq!(ColorsConfig::parse_hex("#GG0000"), None);
    }

    #[test]
    fn test_invalid_color_uses_fallback() {
        let colors = ColorsConfig {
            artist: "not a color".to_string(),
            ..ColorsConfig::default()
        };
        let palette = colors.palette();
        assert_eq!(palette.artist, Color::Cyan);
        assert_eq!(palette.album, Color::Rgb(0x26, 0xa0, 0xa1));
    }
}
