//! Audio output.
//!
//! The UI never talks to the output directly. It sends [`AudioRequest`]s
//! into a channel and receives [`AudioEvent`]s back. The output itself runs
//! as a separate tokio task driving an MPD server.

pub mod mpd;

use tokio::sync::mpsc;

use crate::app::config::AudioConfig;
use crate::app::views::{AudioRequest, PlayerStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    Connected,
    /// Status report, tagged with the last load MPD accepted
    Tick {
        load: u64,
        status: PlayerStatus,
        elapsed: u64,
    },
    /// A request could not be carried out
    Failed(String),
    /// The output is gone for the rest of the session
    Disconnected(String),
}

/// UI side of the audio output task.
#[derive(Debug)]
pub struct AudioHandle {
    requests: mpsc::UnboundedSender<AudioRequest>,
    events: mpsc::UnboundedReceiver<AudioEvent>,
}

impl AudioHandle {
    /// Start the MPD output task on the current runtime.
    pub fn spawn(config: &AudioConfig) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        tokio::spawn(mpd::run(config.clone(), request_rx, event_tx));
        Self {
            requests: request_tx,
            events: event_rx,
        }
    }

    /// Queue a request. Returns false once the output task has exited.
    pub fn send(&self, request: AudioRequest) -> bool {
        self.requests.send(request).is_ok()
    }

    pub async fn next_event(&mut self) -> Option<AudioEvent> {
        self.events.recv().await
    }
}
