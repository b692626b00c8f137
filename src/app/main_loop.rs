use std::time::Duration;

use futures::StreamExt;
use ratatui::DefaultTerminal;
use ratatui_image::picker::Picker;

use super::App;
use crate::app::audio::{AudioEvent, AudioHandle};
use crate::app::event_handlers::EventHandlers;
use crate::app::page::{Cover, PageMessage, PageViews};

/// Font size used when the terminal does not report one
const FALLBACK_FONT_SIZE: (u16, u16) = (8, 16);

/// What woke the loop up
enum LoopStep {
    Input,
    Page(PageMessage),
    Audio(Option<AudioEvent>),
}

/// Trait for main application loop
pub trait AppMainLoop {
    async fn run(self, terminal: DefaultTerminal) -> color_eyre::Result<()>
    where
        Self: Sized;
}

/// Next event from the audio output, or never when there is none.
async fn next_audio_event(audio: &mut Option<AudioHandle>) -> Option<AudioEvent> {
    match audio {
        Some(handle) => handle.next_event().await,
        None => std::future::pending().await,
    }
}

impl AppMainLoop for App {
    /// Run the application's main loop.
    async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;

        // Set up the image picker for cover art
        let mut picker = Picker::from_query_stdio().unwrap_or_else(|e| {
            log::warn!("Terminal graphics query failed, using font size fallback: {}", e);
            Picker::from_fontsize(FALLBACK_FONT_SIZE)
        });
        picker.set_background_color([0, 0, 0, 0]);

        if self.config.audio.enabled {
            log::info!(
                "Starting audio output via MPD at: {}",
                self.config.audio.mpd_address
            );
            self.audio = Some(AudioHandle::spawn(&self.config.audio));
        } else {
            log::info!("Audio output disabled");
        }

        self.dispatch();

        // Set up signal handlers for graceful shutdown (Unix only)
        #[cfg(unix)]
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        #[cfg(unix)]
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        log::info!("Entering event-driven main loop");

        while self.running {
            terminal.draw(|frame| crate::app::ui::render(frame, &mut self))?;

            if let Some(page) = &mut self.page
                && let PageViews::AlbumDetail {
                    cover: Cover::Ready(image),
                    ..
                } = &mut page.views
                && let Some(Err(e)) = image.last_encoding_result()
            {
                log::warn!("Failed to encode cover art: {}", e);
            }

            // Update key bindings for timeouts
            self.key_binds.update();
            self.clear_expired_status();

            let has_tasks = !self.tasks.is_empty();

            let step = tokio::select! {
                // Keyboard events (with short timeout for responsive UI)
                _ = tokio::time::sleep(Duration::from_millis(10)) => LoopStep::Input,

                Some(message) = self.tasks.next(), if has_tasks => LoopStep::Page(message),

                event = next_audio_event(&mut self.audio) => LoopStep::Audio(event),
            };

            match step {
                LoopStep::Input => {
                    while crossterm::event::poll(Duration::from_millis(0))? {
                        let event = crossterm::event::read()?;
                        self.handle_crossterm_event(event);
                    }
                }
                LoopStep::Page(message) => self.handle_page_message(message, &picker),
                LoopStep::Audio(Some(event)) => self.handle_audio_event(event),
                LoopStep::Audio(None) => {
                    log::info!("Audio output task finished");
                    self.audio = None;
                }
            }

            // Playback changes made by this step go out right away
            self.flush_audio_requests();

            // Check for Unix signals outside of select! to avoid conditional compilation issues
            #[cfg(unix)]
            {
                use std::pin::Pin;
                use std::task::Poll;

                let waker = futures::task::noop_waker();
                let mut cx = std::task::Context::from_waker(&waker);

                if let Poll::Ready(Some(())) = Pin::new(&mut sigint).poll_recv(&mut cx) {
                    log::info!("Received SIGINT, shutting down gracefully");
                    self.quit();
                }

                if let Poll::Ready(Some(())) = Pin::new(&mut sigterm).poll_recv(&mut cx) {
                    log::info!("Received SIGTERM, shutting down gracefully");
                    self.quit();
                }
            }
        }

        log::info!("Exiting main loop");

        // Cancel outstanding loads before the runtime goes away
        self.page = None;

        Ok(())
    }
}
