use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// JSON scalar that may arrive as a number or as a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(u64),
    Text(String),
}

/// Album identity. The data source uses both `"id": 3` and `"id": "3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Scalar", into = "String")]
pub struct AlbumId(String);

impl AlbumId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Scalar> for AlbumId {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Number(n) => Self(n.to_string()),
            Scalar::Text(s) => Self(s),
        }
    }
}

impl From<AlbumId> for String {
    fn from(id: AlbumId) -> Self {
        id.0
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn numeric<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => n,
        Scalar::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {:?}", s)))?,
    };
    T::try_from(value).map_err(|_| serde::de::Error::custom("number out of range"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(default, deserialize_with = "numeric")]
    pub track: u32,
    #[serde(default)]
    pub title: Option<String>,
    /// Length in whole seconds
    #[serde(default, deserialize_with = "numeric")]
    pub duration: u64,
    #[serde(default)]
    pub mp3_url: Option<String>,
}

impl Song {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown Title")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: AlbumId,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Empty in the album list endpoint, filled in by the detail endpoint
    #[serde(default)]
    pub songs: Vec<Song>,
}

impl Album {
    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown Artist")
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown Album")
    }

    /// Text the album filter runs against: the present fields of
    /// artist and title joined with ", ".
    pub fn match_text(&self) -> String {
        [self.artist.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn total_duration(&self) -> u64 {
        super::duration::total_duration(&self.songs)
    }

    /// Replace terminal control characters in every text field.
    pub fn sanitized(mut self) -> Self {
        self.artist = self.artist.as_deref().map(sanitize_string);
        self.title = self.title.as_deref().map(sanitize_string);
        for song in &mut self.songs {
            song.title = song.title.as_deref().map(sanitize_string);
        }
        self
    }
}

/// Replace control and zero-width characters that would corrupt the terminal
/// layout with plain spaces.
pub fn sanitize_string(s: &str) -> String {
    let result: String = s
        .chars()
        .map(|c| match c {
            '\u{0000}'..='\u{001F}'
            | '\u{007F}'..='\u{009F}'
            | '\u{00AD}'
            | '\u{200B}'
            | '\u{200C}'
            | '\u{200D}'
            | '\u{2060}'
            | '\u{FEFF}' => ' ',
            _ => c,
        })
        .collect();
    if result != s {
        log::debug!("Sanitized string: {:?} -> {:?}", s, result);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_album_list_entry() {
        let json =
            r#"{"id": 7, "artist": "Nirvana", "title": "Nevermind", "imageUrl": "/img/7.jpg"}"#;
        let album: Album = serde_json::from_str(json).unwrap();

        assert_eq!(album.id, AlbumId::new("7"));
        assert_eq!(album.display_artist(), "Nirvana");
        assert_eq!(album.image_url.as_deref(), Some("/img/7.jpg"));
        assert!(album.songs.is_empty());
    }

    #[test]
    fn test_decode_string_numbers() {
        let json = r#"{
            "id": "abc",
            "title": "Live",
            "songs": [
                {"track": "1", "title": "Intro", "duration": "125", "mp3Url": "/a.mp3"},
                {"track": 2, "title": "Outro", "duration": 95}
            ]
        }"#;
        let album: Album = serde_json::from_str(json).unwrap();

        assert_eq!(album.id.as_str(), "abc");
        assert_eq!(album.songs[0].track, 1);
        assert_eq!(album.songs[0].duration, 125);
        assert_eq!(album.songs[0].mp3_url.as_deref(), Some("/a.mp3"));
        assert_eq!(album.songs[1].mp3_url, None);
        assert_eq!(album.total_duration(), 220);
    }

    #[test]
    fn test_rejects_non_numeric_duration() {
        let json = r#"{"track": 1, "duration": "long"}"#;
        assert!(serde_json::from_str::<Song>(json).is_err());
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let album: Album = serde_json::from_str(r#"{"id": 1}"#).unwrap();

        assert_eq!(album.artist, None);
        assert_eq!(album.display_artist(), "Unknown Artist");
        assert_eq!(album.display_title(), "Unknown Album");
        assert_eq!(album.match_text(), "");
    }

    #[test]
    fn test_match_text() {
        let album: Album =
            serde_json::from_str(r#"{"id": 1, "artist": "Björk", "title": "Post"}"#).unwrap();
        assert_eq!(album.match_text(), "Björk, Post");

        let untitled: Album = serde_json::from_str(r#"{"id": 2, "artist": "Björk"}"#).unwrap();
        assert_eq!(untitled.match_text(), "Björk");
    }

    #[test]
    fn test_sanitized() {
        let album: Album =
            serde_json::from_str(r#"{"id": 1, "artist": "A\u0007B", "title": "C\u200bD"}"#)
                .unwrap();
        let album = album.sanitized();

        assert_eq!(album.artist.as_deref(), Some("A B"));
        assert_eq!(album.title.as_deref(), Some("C D"));
    }
}
