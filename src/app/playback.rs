//! Session-wide "now playing" state.
//!
//! One `PlaybackState` is created at startup and handed to every view that
//! needs it. `play` is the only way to change it.

use std::cell::RefCell;

use crate::app::events::{Emitter, Subscriber, Subscription};
use crate::app::library::{Album, Song};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub album: Album,
    pub song: Song,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Play(NowPlaying),
}

#[derive(Debug, Default)]
pub struct PlaybackState {
    current: RefCell<Option<NowPlaying>>,
    events: Emitter<PlaybackEvent>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `song` from `album` for playback and notify subscribers.
    ///
    /// Both halves are replaced in one assignment before anyone is notified.
    pub fn play(&self, album: Album, song: Song) {
        log::info!(
            "Now playing: {} - {} ({})",
            album.display_artist(),
            song.display_title(),
            album.display_title()
        );
        let now_playing = NowPlaying { album, song };
        *self.current.borrow_mut() = Some(now_playing.clone());
        self.events.emit(&PlaybackEvent::Play(now_playing));
    }

    pub fn current(&self) -> Option<NowPlaying> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self, subscriber: impl Subscriber<PlaybackEvent> + 'static) -> Subscription {
        self.events.subscribe(subscriber)
    }

    pub fn events(&self) -> &Emitter<PlaybackEvent> {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::library::AlbumId;
    use std::rc::Rc;

    fn album(id: &str) -> Album {
        Album {
            id: AlbumId::new(id),
            artist: Some(format!("Artist {}", id)),
            title: Some(format!("Album {}", id)),
            image_url: None,
            songs: Vec::new(),
        }
    }

    fn song(track: u32) -> Song {
        Song {
            track,
            title: Some(format!("Track {}", track)),
            duration: 180,
            mp3_url: Some(format!("/mp3/{}.mp3", track)),
        }
    }

    #[test]
    fn test_starts_empty() {
        assert_eq!(PlaybackState::new().current(), None);
    }

    #[test]
    fn test_last_play_wins_and_everyone_hears_both() {
        let playback = Rc::new(PlaybackState::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second"] {
            let log = Rc::clone(&log);
            let reader = Rc::clone(&playback);
            let _ = playback.subscribe(move |event: &PlaybackEvent| {
                let PlaybackEvent::Play(now) = event;
                // State is already complete when subscribers run
                assert_eq!(reader.current().as_ref(), Some(now));
                log.borrow_mut().push((name, now.song.track));
            });
        }

        playback.play(album("a"), song(1));
        playback.play(album("b"), song(2));

        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("second", 1), ("first", 2), ("second", 2)]
        );

        let current = playback.current().unwrap();
        assert_eq!(current.album.id, AlbumId::new("b"));
        assert_eq!(current.song.track, 2);
    }
}
