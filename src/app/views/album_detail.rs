use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListState;
use std::cell::RefCell;
use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

use super::{Mounted, ReactiveView, bind};
use crate::app::config::Palette;
use crate::app::library::{Album, AlbumEvent, AlbumId, AlbumModel, Song, format_duration};
use crate::app::playback::{PlaybackEvent, PlaybackState};
use crate::app::ui::utils::left_align;

const MAX_TITLE_WIDTH: usize = 48;
const PLAY_ARROW: &str = "▶";

/// One album: caption, track table, total time footer.
///
/// Output is laid out as `caption_len` caption lines, one line per track,
/// then the footer line. The renderer splits it with [`caption`](Self::caption),
/// [`track_rows`](Self::track_rows) and [`footer`](Self::footer).
#[derive(Debug)]
pub struct AlbumDetailView {
    model: Rc<AlbumModel>,
    playback: Rc<PlaybackState>,
    palette: Palette,
    error: Option<String>,
    caption_len: usize,
    track_count: usize,
    list_state: ListState,
    output: Vec<Line<'static>>,
}

impl AlbumDetailView {
    pub fn new(model: Rc<AlbumModel>, playback: Rc<PlaybackState>, palette: Palette) -> Self {
        let mut view = Self {
            model,
            playback,
            palette,
            error: None,
            caption_len: 0,
            track_count: 0,
            list_state: ListState::default(),
            output: Vec::new(),
        };
        view.render();
        view
    }

    /// Create the view and bind it to its album and to the playback state,
    /// so the playing track is marked.
    pub fn mount(
        model: &Rc<AlbumModel>,
        playback: &Rc<PlaybackState>,
        palette: Palette,
    ) -> Mounted<Self> {
        let view = Rc::new(RefCell::new(Self::new(
            Rc::clone(model),
            Rc::clone(playback),
            palette,
        )));

        let subscriptions = vec![
            bind(model.events(), &view, |view: &mut Self, _: &AlbumEvent| {
                view.error = None;
            }),
            bind(
                playback.events(),
                &view,
                |_: &mut Self, event: &PlaybackEvent| {
                    let PlaybackEvent::Play(now) = event;
                    log::trace!("Detail view sees track {} playing", now.song.track);
                },
            ),
        ];

        Mounted::new(view, subscriptions)
    }

    pub fn album_id(&self) -> &AlbumId {
        self.model.id()
    }

    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.render();
    }

    pub fn image_url(&self) -> Option<String> {
        self.model
            .album()
            .as_ref()
            .and_then(|album| album.image_url.clone())
    }

    pub fn caption(&self) -> &[Line<'static>] {
        &self.output[..self.caption_len]
    }

    pub fn track_rows(&self) -> &[Line<'static>] {
        &self.output[self.caption_len..self.caption_len + self.track_count]
    }

    pub fn footer(&self) -> &[Line<'static>] {
        &self.output[self.caption_len + self.track_count..]
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    /// The album and the track under the cursor, ready to hand to
    /// [`PlaybackState::play`].
    pub fn selected_track(&self) -> Option<(Album, Song)> {
        let index = self.list_state.selected()?;
        let album = self.model.album();
        let album = album.as_ref()?;
        let song = album.songs.get(index)?.clone();
        Some((album.clone(), song))
    }

    pub fn select_next(&mut self) {
        if let Some(i) = self.list_state.selected()
            && i + 1 < self.track_count
        {
            self.list_state.select(Some(i + 1));
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(i) = self.list_state.selected()
            && i > 0
        {
            self.list_state.select(Some(i - 1));
        }
    }

    pub fn select_first(&mut self) {
        if self.track_count > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if self.track_count > 0 {
            self.list_state.select(Some(self.track_count - 1));
        }
    }

    fn is_playing(&self, album: &Album, song: &Song) -> bool {
        self.playback
            .current()
            .is_some_and(|now| now.album.id == album.id && now.song == *song)
    }

    fn track_row(&self, album: &Album, song: &Song, title_width: usize) -> Line<'static> {
        let palette = self.palette;
        let playing = self.is_playing(album, song);
        let title_style = if playing {
            Style::default()
                .fg(palette.now_playing)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.song_title)
        };

        Line::from(vec![
            Span::styled(
                format!("{:>3} ", song.track),
                Style::default().fg(palette.track_number),
            ),
            Span::styled(
                if playing { PLAY_ARROW } else { " " },
                Style::default().fg(palette.now_playing),
            ),
            Span::raw(" "),
            Span::styled(left_align(song.display_title(), title_width), title_style),
            Span::raw("  "),
            Span::styled(
                format_duration(song.duration),
                Style::default().fg(palette.duration),
            ),
        ])
    }
}

impl ReactiveView for AlbumDetailView {
    fn render(&mut self) {
        let palette = self.palette;
        let model = Rc::clone(&self.model);
        let album = model.album();

        let Some(album) = album.as_ref() else {
            let (text, color) = match &self.error {
                Some(error) => (format!("Could not load album: {}", error), palette.error),
                None => ("Loading album…".to_string(), palette.placeholder),
            };
            self.output = vec![Line::from(Span::styled(
                text,
                Style::default().fg(color).add_modifier(Modifier::ITALIC),
            ))];
            self.caption_len = 1;
            self.track_count = 0;
            self.list_state.select(None);
            return;
        };

        let mut output = vec![
            Line::from(Span::styled(
                album.display_title().to_string(),
                Style::default()
                    .fg(palette.album)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                album.display_artist().to_string(),
                Style::default().fg(palette.artist),
            )),
            Line::default(),
        ];
        let caption_len = output.len();

        let title_width = album
            .songs
            .iter()
            .map(|song| song.display_title().width())
            .max()
            .unwrap_or(0)
            .min(MAX_TITLE_WIDTH);

        output.extend(
            album
                .songs
                .iter()
                .map(|song| self.track_row(album, song, title_width)),
        );

        output.push(Line::from(Span::styled(
            format!("Total time: {}", format_duration(album.total_duration())),
            Style::default()
                .fg(palette.duration)
                .add_modifier(Modifier::BOLD),
        )));

        self.track_count = album.songs.len();
        self.caption_len = caption_len;
        self.output = output;

        let selected = match (self.list_state.selected(), self.track_count) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        };
        self.list_state.select(selected);
    }

    fn output(&self) -> &[Line<'static>] {
        &self.output
    }
}
