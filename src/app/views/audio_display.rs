use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::cell::RefCell;
use std::rc::Rc;

use super::{Mounted, ReactiveView, bind};
use crate::app::config::Palette;
use crate::app::library::format_duration;
use crate::app::playback::{NowPlaying, PlaybackEvent, PlaybackState};

/// What the audio output last reported. A new player starts out `Unknown`
/// and only becomes `Playing` once the output confirms it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerStatus {
    #[default]
    Unknown,
    Playing,
    Paused,
    Stopped,
}

impl PlayerStatus {
    fn glyph(self) -> &'static str {
        match self {
            PlayerStatus::Unknown => "…",
            PlayerStatus::Playing => "▶",
            PlayerStatus::Paused => "⏸",
            PlayerStatus::Stopped => "⏹",
        }
    }
}

/// Commands for the audio output, drained by the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioRequest {
    /// Replace whatever is playing with this track reference. `load`
    /// identifies the request in later status reports.
    Load { load: u64, url: String },
    Pause,
    Resume,
}

/// Player for a single track. Replaced, never reused, when another track
/// starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPlayer {
    pub now: NowPlaying,
    pub status: PlayerStatus,
    /// Elapsed seconds
    pub current_time: u64,
    /// Load request this player waits on. None when the track has no URL.
    pub load: Option<u64>,
}

impl AudioPlayer {
    pub fn new(now: NowPlaying) -> Self {
        Self {
            now,
            status: PlayerStatus::Unknown,
            current_time: 0,
            load: None,
        }
    }

    /// Fraction of the track played, for the progress gauge
    pub fn progress(&self) -> f64 {
        match self.now.song.duration {
            0 => 0.0,
            total => (self.current_time as f64 / total as f64).min(1.0),
        }
    }
}

#[derive(Debug)]
pub struct AudioDisplayView {
    player: Option<AudioPlayer>,
    requests: Vec<AudioRequest>,
    last_load: u64,
    palette: Palette,
    output: Vec<Line<'static>>,
}

impl AudioDisplayView {
    pub fn new(palette: Palette) -> Self {
        let mut view = Self {
            player: None,
            requests: Vec::new(),
            last_load: 0,
            palette,
            output: Vec::new(),
        };
        view.render();
        view
    }

    pub fn mount(playback: &PlaybackState, palette: Palette) -> Mounted<Self> {
        let view = Rc::new(RefCell::new(Self::new(palette)));
        let subscriptions = vec![bind(
            playback.events(),
            &view,
            |view: &mut Self, event: &PlaybackEvent| {
                let PlaybackEvent::Play(now) = event;
                view.start(now.clone());
            },
        )];
        Mounted::new(view, subscriptions)
    }

    fn start(&mut self, now: NowPlaying) {
        let mut player = AudioPlayer::new(now);
        match &player.now.song.mp3_url {
            Some(url) => {
                self.last_load += 1;
                player.load = Some(self.last_load);
                self.requests.push(AudioRequest::Load {
                    load: self.last_load,
                    url: url.clone(),
                });
            }
            None => log::warn!(
                "Track {} of {} has no audio URL",
                player.now.song.track,
                player.now.album.display_title()
            ),
        }
        self.player = Some(player);
    }

    pub fn player(&self) -> Option<&AudioPlayer> {
        self.player.as_ref()
    }

    /// Apply a status report from the audio output. Reports for any load
    /// other than the current player's are ignored.
    pub fn on_tick(&mut self, load: u64, status: PlayerStatus, elapsed: u64) {
        if let Some(player) = &mut self.player
            && player.load == Some(load)
        {
            player.status = status;
            player.current_time = elapsed;
            self.render();
        }
    }

    /// Pause a playing track, resume anything else.
    pub fn toggle(&mut self) {
        let Some(player) = &self.player else {
            return;
        };
        let request = match player.status {
            PlayerStatus::Playing => AudioRequest::Pause,
            PlayerStatus::Paused | PlayerStatus::Stopped | PlayerStatus::Unknown => {
                AudioRequest::Resume
            }
        };
        self.requests.push(request);
    }

    pub fn take_requests(&mut self) -> Vec<AudioRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl ReactiveView for AudioDisplayView {
    fn render(&mut self) {
        let palette = self.palette;

        let Some(player) = &self.player else {
            self.output = vec![Line::from(Span::styled(
                " Nothing playing",
                Style::default().fg(palette.placeholder),
            ))];
            return;
        };

        let status_color = match player.status {
            PlayerStatus::Playing => palette.playing,
            PlayerStatus::Paused => palette.paused,
            PlayerStatus::Stopped => palette.stopped,
            PlayerStatus::Unknown => palette.placeholder,
        };
        let song = &player.now.song;
        let album = &player.now.album;

        self.output = vec![Line::from(vec![
            Span::styled(
                format!(" {} ", player.status.glyph()),
                Style::default().fg(status_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format_duration(player.current_time),
                Style::default().fg(palette.duration),
            ),
            Span::styled("/", Style::default().fg(palette.border_title)),
            Span::styled(
                format_duration(song.duration),
                Style::default().fg(palette.duration),
            ),
            Span::raw("  "),
            Span::styled(
                song.display_title().to_string(),
                Style::default().fg(palette.song_title),
            ),
            Span::styled(" - ", Style::default().fg(palette.border_title)),
            Span::styled(
                album.display_artist().to_string(),
                Style::default().fg(palette.artist),
            ),
            Span::styled(
                format!(" ({})", album.display_title()),
                Style::default().fg(palette.album),
            ),
        ])];
    }

    fn output(&self) -> &[Line<'static>] {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::library::{Album, AlbumId, Song};

    fn album() -> Album {
        Album {
            id: AlbumId::new("1"),
            artist: Some("Air".into()),
            title: Some("Moon Safari".into()),
            image_url: None,
            songs: Vec::new(),
        }
    }

    fn song(track: u32, url: Option<&str>) -> Song {
        Song {
            track,
            title: Some(format!("Track {}", track)),
            duration: 200,
            mp3_url: url.map(String::from),
        }
    }

    #[test]
    fn test_play_builds_fresh_player() {
        let playback = PlaybackState::new();
        let mounted = AudioDisplayView::mount(&playback, Palette::default());
        assert_eq!(
            mounted.view().borrow().output()[0].to_string(),
            " Nothing playing"
        );

        playback.play(album(), song(1, Some("/m/1.mp3")));
        mounted.view().borrow_mut().on_tick(1, PlayerStatus::Playing, 50);
        playback.play(album(), song(2, Some("/m/2.mp3")));

        let mut view = mounted.view().borrow_mut();
        let player = view.player().unwrap();
        assert_eq!(player.now.song.track, 2);
        assert_eq!(player.status, PlayerStatus::Unknown);
        assert_eq!(player.current_time, 0);
        assert_eq!(
            view.take_requests(),
            vec![
                AudioRequest::Load {
                    load: 1,
                    url: "/m/1.mp3".into()
                },
                AudioRequest::Load {
                    load: 2,
                    url: "/m/2.mp3".into()
                },
            ]
        );
        assert!(view.take_requests().is_empty());
    }

    #[test]
    fn test_tick_updates_time_and_status() {
        let playback = PlaybackState::new();
        let mounted = AudioDisplayView::mount(&playback, Palette::default());
        playback.play(album(), song(1, Some("/m/1.mp3")));

        let mut view = mounted.view().borrow_mut();
        view.on_tick(1, PlayerStatus::Playing, 65);

        let line = view.output()[0].to_string();
        assert!(line.starts_with(" ▶ 1:05/3:20"));
        assert!(line.contains("Track 1 - Air (Moon Safari)"));
        assert!((view.player().unwrap().progress() - 0.325).abs() < 1e-9);
    }

    #[test]
    fn test_toggle_requests() {
        let playback = PlaybackState::new();
        let mounted = AudioDisplayView::mount(&playback, Palette::default());

        // Nothing to toggle yet
        mounted.view().borrow_mut().toggle();
        assert!(mounted.view().borrow_mut().take_requests().is_empty());

        playback.play(album(), song(1, Some("/m/1.mp3")));
        let mut view = mounted.view().borrow_mut();
        view.take_requests();

        view.on_tick(1, PlayerStatus::Playing, 1);
        view.toggle();
        view.on_tick(1, PlayerStatus::Paused, 1);
        view.toggle();
        assert_eq!(
            view.take_requests(),
            vec![AudioRequest::Pause, AudioRequest::Resume]
        );
    }

    #[test]
    fn test_missing_url_requests_nothing() {
        let playback = PlaybackState::new();
        let mounted = AudioDisplayView::mount(&playback, Palette::default());
        playback.play(album(), song(3, None));

        let mut view = mounted.view().borrow_mut();
        assert!(view.take_requests().is_empty());
        view.on_tick(0, PlayerStatus::Playing, 10);
        assert_eq!(view.player().unwrap().status, PlayerStatus::Unknown);
    }

    #[test]
    fn test_report_for_previous_track_is_ignored() {
        let playback = PlaybackState::new();
        let mounted = AudioDisplayView::mount(&playback, Palette::default());

        playback.play(album(), song(1, Some("/m/1.mp3")));
        mounted.view().borrow_mut().on_tick(1, PlayerStatus::Playing, 199);
        playback.play(album(), song(2, Some("/m/2.mp3")));

        // Status sent before the output picked up the second track
        let mut view = mounted.view().borrow_mut();
        view.on_tick(1, PlayerStatus::Playing, 199);
        let player = view.player().unwrap();
        assert_eq!(player.now.song.track, 2);
        assert_eq!(player.status, PlayerStatus::Unknown);
        assert_eq!(player.current_time, 0);
        assert!(view.output()[0].to_string().starts_with(" … 0:00/3:20"));

        view.on_tick(2, PlayerStatus::Playing, 3);
        assert_eq!(view.player().unwrap().status, PlayerStatus::Playing);
        assert_eq!(view.player().unwrap().current_time, 3);
    }
}
