pub use crate::app::main_loop::AppMainLoop;
pub use app::{App, InputMode, MessageType, StatusMessage};

// Module declarations
pub mod action;
pub mod app;
pub mod audio;
pub mod binds_handler;
pub mod cli;
pub mod config;
pub mod event_handlers;
pub mod events;
pub mod library;
pub mod logging;
pub mod main_loop;
pub mod page;
pub mod playback;
pub mod router;
pub mod source;
pub mod terminal;
pub mod ui;
pub mod views;
