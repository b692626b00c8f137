use futures::stream::FuturesUnordered;
use ratatui_image::picker::Picker;
use std::io::Cursor;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::app::audio::{AudioEvent, AudioHandle};
use crate::app::binds_handler::KeyBinds;
use crate::app::config::{Config, Palette};
use crate::app::page::{Cover, Page, PageContext, PageMessage, PageTask, PageViews};
use crate::app::playback::PlaybackState;
use crate::app::router::{History, Route};
use crate::app::source::HttpAlbumSource;
use crate::app::views::{AudioDisplayView, AudioRequest, Mounted};

/// How long an info message stays in the status line
const INFO_TIMEOUT: Duration = Duration::from_secs(4);
const ERROR_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    /// Keys go to the filter input
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub created_at: Instant,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            message_type: MessageType::Info,
            created_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            message_type: MessageType::Error,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        let timeout = match self.message_type {
            MessageType::Info => INFO_TIMEOUT,
            MessageType::Error => ERROR_TIMEOUT,
        };
        self.created_at.elapsed() > timeout
    }
}

/// Application state.
pub struct App {
    pub running: bool,
    pub config: Config,
    pub palette: Palette,
    context: PageContext,
    pub history: History,
    pub page: Option<Page>,
    next_generation: u64,
    /// Loads started by the current and earlier pages
    pub tasks: FuturesUnordered<PageTask>,
    pub audio_display: Mounted<AudioDisplayView>,
    pub audio: Option<AudioHandle>,
    audio_unavailable_reported: bool,
    pub key_binds: KeyBinds,
    pub input_mode: InputMode,
    pub status_message: Option<StatusMessage>,
    pub config_warnings: Vec<String>,
    pub show_config_warnings_popup: bool,
}

impl App {
    pub fn new(config: Config, start: Route) -> color_eyre::Result<Self> {
        let palette = config.colors.palette();
        let source = HttpAlbumSource::new(&config.source)?;
        log::info!("Album source: {}", source.base_url());

        let playback = Rc::new(PlaybackState::new());
        let audio_display = AudioDisplayView::mount(&playback, palette);

        let (single_map, sequential) = config.binds.build_key_maps();
        let key_binds = KeyBinds::new(single_map, sequential);

        let context = PageContext {
            source,
            playback,
            palette,
            filter_mode: config.filter.mode,
        };

        Ok(Self {
            running: false,
            config,
            palette,
            context,
            history: History::new(start),
            page: None,
            next_generation: 0,
            tasks: FuturesUnordered::new(),
            audio_display,
            audio: None,
            audio_unavailable_reported: false,
            key_binds,
            input_mode: InputMode::Browse,
            status_message: None,
            config_warnings: Vec::new(),
            show_config_warnings_popup: false,
        })
    }

    pub fn playback(&self) -> &Rc<PlaybackState> {
        &self.context.playback
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status_message(&mut self, message: StatusMessage) {
        self.status_message = Some(message);
    }

    pub fn clear_expired_status(&mut self) {
        if self
            .status_message
            .as_ref()
            .is_some_and(StatusMessage::is_expired)
        {
            self.status_message = None;
        }
    }

    /// Tear down the current page and build the one for the current route.
    pub fn dispatch(&mut self) {
        // The old page must be gone before the new one subscribes
        self.page = None;
        self.input_mode = InputMode::Browse;
        self.key_binds.reset();

        self.next_generation += 1;
        let route = self.history.current().clone();
        crate::app::logging::log_navigation(&route, self.history.depth());

        let (page, task) = Page::open(route, self.next_generation, &self.context);
        self.page = Some(page);
        self.tasks.push(task);
    }

    pub fn navigate(&mut self, route: Route) {
        if self.history.navigate(route) {
            self.dispatch();
        }
    }

    /// Go back one route. Returns false at the start of the history.
    pub fn back(&mut self) -> bool {
        if self.history.back().is_some() {
            self.dispatch();
            true
        } else {
            false
        }
    }

    pub fn reload(&mut self) {
        self.set_status_message(StatusMessage::info("Reloading…"));
        self.dispatch();
    }

    /// Apply a finished page load. Messages from closed pages are dropped.
    pub fn handle_page_message(&mut self, message: PageMessage, picker: &Picker) {
        let Some(page) = self.page.as_mut() else {
            return;
        };
        if message.generation() != page.generation() {
            log::debug!(
                "Dropping result for closed page generation {}",
                message.generation()
            );
            return;
        }

        match message {
            PageMessage::AlbumsLoaded { result, .. } => match result {
                Ok(count) => {
                    self.status_message =
                        Some(StatusMessage::info(format!("Loaded {} albums", count)));
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    log::error!("Failed to load album list: {}", e);
                    if let PageViews::AlbumList { list, .. } = &page.views {
                        list.view().borrow_mut().load_failed(e.to_string());
                    }
                    self.status_message = Some(StatusMessage::error(e.to_string()));
                }
            },
            PageMessage::AlbumLoaded { result, .. } => match result {
                Ok(()) => {
                    if let Some(task) = page.cover_task(&self.context.source) {
                        self.tasks.push(task);
                    }
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    if let PageViews::AlbumDetail { detail, .. } = &page.views {
                        let mut view = detail.view().borrow_mut();
                        log::error!("Failed to load album {}: {}", view.album_id(), e);
                        view.load_failed(e.to_string());
                    }
                    self.status_message = Some(StatusMessage::error(e.to_string()));
                }
            },
            PageMessage::CoverLoaded { result, .. } => {
                let cover = match result {
                    Ok(bytes) => decode_cover(&bytes, picker),
                    Err(e) if e.is_cancelled() => return,
                    Err(e) => {
                        log::warn!("Failed to load cover art: {}", e);
                        Cover::Failed
                    }
                };
                page.set_cover(cover);
            }
        }
    }

    pub fn handle_audio_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::Connected => {
                self.set_status_message(StatusMessage::info("Connected to MPD"));
            }
            AudioEvent::Tick {
                load,
                status,
                elapsed,
            } => {
                self.audio_display
                    .view()
                    .borrow_mut()
                    .on_tick(load, status, elapsed);
            }
            AudioEvent::Failed(message) => {
                self.set_status_message(StatusMessage::error(message));
            }
            AudioEvent::Disconnected(message) => {
                log::warn!("Audio output disconnected: {}", message);
                self.set_status_message(StatusMessage::error(message));
                self.audio = None;
                self.audio_unavailable_reported = true;
            }
        }
    }

    /// Hand queued view requests to the audio output, resolving track
    /// references against the album source.
    pub fn flush_audio_requests(&mut self) {
        let requests = self.audio_display.view().borrow_mut().take_requests();
        if requests.is_empty() {
            return;
        }

        let Some(audio) = &self.audio else {
            if !self.audio_unavailable_reported {
                self.audio_unavailable_reported = true;
                self.set_status_message(StatusMessage::error("Audio output is disabled"));
            }
            return;
        };

        for request in requests {
            let request = match request {
                AudioRequest::Load { load, url } => match self.context.source.resolve(&url) {
                    Ok(resolved) => AudioRequest::Load {
                        load,
                        url: resolved.to_string(),
                    },
                    Err(e) => {
                        log::warn!("Cannot play {}: {}", url, e);
                        self.status_message = Some(StatusMessage::error(e.to_string()));
                        continue;
                    }
                },
                other => other,
            };
            if !audio.send(request) {
                log::warn!("Audio output task has exited");
                break;
            }
        }
    }

    /// Play the track under the cursor on a detail page.
    pub fn play_selected(&mut self) {
        let Some(Page {
            views: PageViews::AlbumDetail { detail, .. },
            ..
        }) = &self.page
        else {
            return;
        };
        // Release the view borrow before playback notifies it
        let selected = detail.view().borrow().selected_track();
        if let Some((album, song)) = selected {
            self.playback().play(album, song);
        }
    }
}

/// Decode cover bytes into a drawable image.
fn decode_cover(bytes: &[u8], picker: &Picker) -> Cover {
    let decoded = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())
        .and_then(|reader| reader.decode().map_err(|e| e.to_string()));

    match decoded {
        Ok(image) => Cover::Ready(Box::new(picker.new_resize_protocol(image))),
        Err(e) => {
            log::warn!("Failed to decode cover art: {}", e);
            Cover::Failed
        }
    }
}
