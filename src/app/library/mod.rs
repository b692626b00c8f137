pub mod album;
pub mod collection;
pub mod duration;
pub mod filter;
pub mod store;

// Convenience re-exports
pub use album::{Album, AlbumId, Song};
pub use collection::{AlbumCollection, SortKey};
pub use duration::{format_duration, total_duration};
pub use filter::FilterMode;
pub use store::{AlbumEvent, AlbumModel, CollectionEvent, CollectionStore};
