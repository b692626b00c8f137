use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::album::Album;

/// How filter text is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Case-insensitive regular expression. Text that does not compile is
    /// matched literally instead.
    #[default]
    Regex,
    /// Case-insensitive substring match.
    Literal,
}

#[derive(Debug, Clone)]
enum Matcher {
    Pattern(Regex),
    /// Lowercased needle
    Substring(String),
}

/// Compiled album filter. Matches against [`Album::match_text`].
#[derive(Debug, Clone)]
pub struct AlbumFilter {
    text: String,
    matcher: Matcher,
}

impl AlbumFilter {
    /// Compile `text` for `mode`. Empty text means "no filter".
    pub fn new(text: &str, mode: FilterMode) -> Option<Self> {
        if text.is_empty() {
            return None;
        }

        let matcher = match mode {
            FilterMode::Regex => match RegexBuilder::new(text).case_insensitive(true).build() {
                Ok(pattern) => Matcher::Pattern(pattern),
                Err(e) => {
                    log::warn!(
                        "Filter {:?} is not a valid pattern, matching it literally: {}",
                        text,
                        e
                    );
                    Matcher::Substring(text.to_lowercase())
                }
            },
            FilterMode::Literal => Matcher::Substring(text.to_lowercase()),
        };

        Some(Self {
            text: text.to_string(),
            matcher,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the pattern could not be compiled and a literal match is used.
    pub fn is_literal_fallback(&self, mode: FilterMode) -> bool {
        mode == FilterMode::Regex && matches!(self.matcher, Matcher::Substring(_))
    }

    pub fn matches(&self, album: &Album) -> bool {
        let haystack = album.match_text();
        match &self.matcher {
            Matcher::Pattern(pattern) => pattern.is_match(&haystack),
            Matcher::Substring(needle) => haystack.to_lowercase().contains(needle.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::library::album::AlbumId;

    fn album(artist: &str, title: &str) -> Album {
        Album {
            id: AlbumId::new("1"),
            artist: Some(artist.to_string()),
            title: Some(title.to_string()),
            image_url: None,
            songs: Vec::new(),
        }
    }

    #[test]
    fn test_empty_text_is_no_filter() {
        assert!(AlbumFilter::new("", FilterMode::Regex).is_none());
        assert!(AlbumFilter::new("", FilterMode::Literal).is_none());
    }

    #[test]
    fn test_regex_is_case_insensitive() {
        let filter = AlbumFilter::new("^radio", FilterMode::Regex).unwrap();
        assert!(filter.matches(&album("Radiohead", "OK Computer")));
        assert!(!filter.matches(&album("The Radio Dept.", "Clinging to a Scheme")));
    }

    #[test]
    fn test_matches_across_separator() {
        let filter = AlbumFilter::new("head, ok", FilterMode::Regex).unwrap();
        assert!(filter.matches(&album("Radiohead", "OK Computer")));
    }

    #[test]
    fn test_invalid_regex_falls_back_to_literal() {
        let filter = AlbumFilter::new("(live", FilterMode::Regex).unwrap();
        assert!(filter.is_literal_fallback(FilterMode::Regex));
        assert!(filter.matches(&album("Band", "Songs (Live at Home)")));
        assert!(!filter.matches(&album("Band", "Studio")));
    }

    #[test]
    fn test_literal_mode_escapes_metacharacters() {
        let filter = AlbumFilter::new("a.c", FilterMode::Literal).unwrap();
        assert!(filter.matches(&album("A.C. Newman", "Get Guilty")));
        assert!(!filter.matches(&album("Abc", "Xyz")));

        let regex = AlbumFilter::new("a.c", FilterMode::Regex).unwrap();
        assert!(regex.matches(&album("Abc", "Xyz")));
    }
}
