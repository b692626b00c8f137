use mpd_client::Client;
use mpd_client::client::{CommandError, ConnectionEvent, ConnectionEvents};
use mpd_client::commands;
use mpd_client::responses::PlayState;
use std::time::Duration;
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;
use tokio::sync::mpsc;

use super::AudioEvent;
use crate::app::config::AudioConfig;
use crate::app::views::{AudioRequest, PlayerStatus};

/// Status polls faster than this gain nothing
const MIN_STATUS_INTERVAL_MS: u64 = 100;

/// Connect to MPD via Unix socket or TCP based on address format
pub async fn connect_to_mpd(address: &str) -> color_eyre::Result<(Client, ConnectionEvents)> {
    let is_unix_socket = address.contains('/');

    if is_unix_socket {
        #[cfg(unix)]
        {
            let connection = UnixStream::connect(address).await?;
            Ok(Client::connect(connection).await?)
        }
        #[cfg(not(unix))]
        {
            Err(color_eyre::eyre::eyre!(
                "Unix sockets are not supported on this platform"
            ))
        }
    } else {
        let connection = TcpStream::connect(address).await?;
        Ok(Client::connect(connection).await?)
    }
}

pub fn player_status(state: PlayState) -> PlayerStatus {
    match state {
        PlayState::Playing => PlayerStatus::Playing,
        PlayState::Paused => PlayerStatus::Paused,
        PlayState::Stopped => PlayerStatus::Stopped,
    }
}

async fn execute(client: &Client, request: &AudioRequest) -> Result<(), CommandError> {
    match request {
        AudioRequest::Load { url, .. } => {
            client.command(commands::ClearQueue).await?;
            client.command(commands::Add::uri(url.as_str())).await?;
            client.command(commands::Play::current()).await?;
        }
        AudioRequest::Pause => {
            client.command(commands::SetPause(true)).await?;
        }
        AudioRequest::Resume => {
            client.command(commands::Play::current()).await?;
        }
    }
    Ok(())
}

/// Load id that status reports carry once `request` has been carried out.
fn load_after(current: u64, request: &AudioRequest) -> u64 {
    match request {
        AudioRequest::Load { load, .. } => *load,
        AudioRequest::Pause | AudioRequest::Resume => current,
    }
}

async fn report_status(
    client: &Client,
    load: u64,
    events: &mpsc::UnboundedSender<AudioEvent>,
) -> bool {
    match client.command(commands::Status).await {
        Ok(status) => {
            let tick = AudioEvent::Tick {
                load,
                status: player_status(status.state),
                elapsed: status.elapsed.map(|d| d.as_secs()).unwrap_or(0),
            };
            events.send(tick).is_ok()
        }
        Err(e) => {
            log::error!("MPD status request failed: {}", e);
            let _ = events.send(AudioEvent::Disconnected(e.to_string()));
            false
        }
    }
}

/// Body of the audio output task. Ends when the UI drops its handle or the
/// MPD connection goes away.
pub async fn run(
    config: AudioConfig,
    mut requests: mpsc::UnboundedReceiver<AudioRequest>,
    events: mpsc::UnboundedSender<AudioEvent>,
) {
    log::info!("Attempting to connect to MPD at: {}", config.mpd_address);

    let (client, mut state_changes) = match connect_to_mpd(&config.mpd_address).await {
        Ok(connection) => connection,
        Err(e) => {
            crate::app::logging::log_mpd_connection(
                &config.mpd_address,
                false,
                Some(&e.to_string()),
            );
            let _ = events.send(AudioEvent::Disconnected(format!(
                "Could not connect to MPD at {}: {}",
                config.mpd_address, e
            )));
            return;
        }
    };

    crate::app::logging::log_mpd_connection(&config.mpd_address, true, None);
    if events.send(AudioEvent::Connected).is_err() {
        return;
    }

    let mut status_interval = tokio::time::interval(Duration::from_millis(
        config.status_interval_ms.max(MIN_STATUS_INTERVAL_MS),
    ));

    // Last load MPD has accepted; 0 until the first one
    let mut load = 0;

    loop {
        tokio::select! {
            request = requests.recv() => {
                let Some(request) = request else {
                    log::debug!("Audio handle dropped, stopping output task");
                    break;
                };
                let command = format!("{:?}", request);
                match execute(&client, &request).await {
                    Ok(()) => {
                        crate::app::logging::log_mpd_command(&command, true, None);
                        load = load_after(load, &request);
                    }
                    Err(e) => {
                        let error = e.to_string();
                        crate::app::logging::log_mpd_command(&command, false, Some(&error));
                        let _ = events.send(AudioEvent::Failed(format!("Playback failed: {}", e)));
                    }
                }
                if !report_status(&client, load, &events).await {
                    break;
                }
            }

            event = state_changes.next() => {
                match event {
                    Some(ConnectionEvent::SubsystemChange(subsystem)) => {
                        log::trace!("MPD subsystem change: {:?}", subsystem);
                        if !report_status(&client, load, &events).await {
                            break;
                        }
                    }
                    Some(ConnectionEvent::ConnectionClosed(err)) => {
                        log::error!("MPD connection closed: {:?}", err);
                        let _ = events.send(AudioEvent::Disconnected(format!(
                            "MPD connection closed: {}",
                            err
                        )));
                        break;
                    }
                    None => {
                        log::info!("MPD connection closed cleanly");
                        let _ = events.send(AudioEvent::Disconnected(
                            "MPD connection closed".to_string(),
                        ));
                        break;
                    }
                }
            }

            _ = status_interval.tick() => {
                if !report_status(&client, load, &events).await {
                    break;
                }
            }
        }
    }
}
