pub mod error;
pub mod http;

pub use error::FetchError;
pub use http::HttpAlbumSource;

use crate::app::library::{Album, AlbumId};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Where album data comes from.
pub trait AlbumSource {
    /// The album list. Albums from this endpoint usually carry no songs.
    fn fetch_albums(&self) -> impl Future<Output = error::Result<Vec<Album>>>;

    /// A single album including its songs.
    fn fetch_album(&self, id: &AlbumId) -> impl Future<Output = error::Result<Album>>;
}

/// Run `request` until it finishes or `token` is cancelled, whichever
/// comes first.
pub async fn until_cancelled<T, F>(token: &CancellationToken, request: F) -> error::Result<T>
where
    F: Future<Output = error::Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(FetchError::Cancelled),
        result = request => result,
    }
}
