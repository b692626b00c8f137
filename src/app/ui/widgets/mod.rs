pub mod cover;
pub mod now_playing;

pub use cover::render_cover;
pub use now_playing::NowPlayingBar;
