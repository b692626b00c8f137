use super::album::Song;

/// Format whole seconds as `M:SS`. Minutes are not padded.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Sum of song durations in seconds.
pub fn total_duration(songs: &[Song]) -> u64 {
    songs.iter().map(|song| song.duration).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(duration: u64) -> Song {
        Song {
            track: 1,
            title: None,
            duration,
            mp3_url: None,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(60), "1:00");
        assert_eq!(format_duration(125), "2:05");
        assert_eq!(format_duration(3661), "61:01");
    }

    #[test]
    fn test_total_duration() {
        let songs = vec![song(125), song(95)];
        assert_eq!(total_duration(&songs), 220);
        assert_eq!(format_duration(total_duration(&songs)), "3:40");
        assert_eq!(total_duration(&[]), 0);
    }
}
