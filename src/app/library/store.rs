//! Observable wrappers around the album data.
//!
//! Data lives behind a `RefCell` and the emitter sits beside it, so a
//! notification is only sent after the mutable borrow has ended. Subscribers
//! are free to read the data they were notified about.

use std::cell::{Ref, RefCell};

use super::album::{Album, AlbumId};
use super::collection::{AlbumCollection, SortKey};
use crate::app::events::{Emitter, Subscriber, Subscription};
use crate::app::source::{AlbumSource, FetchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    /// All members were replaced
    Reset { count: usize },
}

/// The album list plus its change notifications.
#[derive(Debug, Default)]
pub struct CollectionStore {
    collection: RefCell<AlbumCollection>,
    events: Emitter<CollectionEvent>,
}

impl CollectionStore {
    pub fn new(collection: AlbumCollection) -> Self {
        Self {
            collection: RefCell::new(collection),
            events: Emitter::new(),
        }
    }

    pub fn borrow(&self) -> Ref<'_, AlbumCollection> {
        self.collection.borrow()
    }

    pub fn subscribe(
        &self,
        subscriber: impl Subscriber<CollectionEvent> + 'static,
    ) -> Subscription {
        self.events.subscribe(subscriber)
    }

    pub fn events(&self) -> &Emitter<CollectionEvent> {
        &self.events
    }

    /// Fetch the album list and replace all members with it.
    ///
    /// Nothing is borrowed while the request is in flight. On failure the
    /// collection is left untouched and the error is returned.
    pub async fn load<S: AlbumSource>(&self, source: &S) -> Result<usize, FetchError> {
        let albums = source.fetch_albums().await?;
        let count = albums.len();
        self.reset(albums);
        Ok(count)
    }

    pub fn reset(&self, albums: Vec<Album>) {
        let count = {
            let mut collection = self.collection.borrow_mut();
            collection.replace(albums);
            collection.len()
        };
        self.events.emit(&CollectionEvent::Reset { count });
    }

    pub fn set_filter(&self, text: &str) {
        self.collection.borrow_mut().set_filter(text);
    }

    pub fn set_sort_key(&self, key: SortKey) {
        self.collection.borrow_mut().set_sort_key(key);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumEvent {
    /// Album data arrived or was replaced
    Change,
}

/// A single album shown on its own, identified before its data arrives.
#[derive(Debug)]
pub struct AlbumModel {
    id: AlbumId,
    album: RefCell<Option<Album>>,
    events: Emitter<AlbumEvent>,
}

impl AlbumModel {
    pub fn new(id: AlbumId) -> Self {
        Self {
            id,
            album: RefCell::new(None),
            events: Emitter::new(),
        }
    }

    pub fn id(&self) -> &AlbumId {
        &self.id
    }

    pub fn album(&self) -> Ref<'_, Option<Album>> {
        self.album.borrow()
    }

    pub fn events(&self) -> &Emitter<AlbumEvent> {
        &self.events
    }

    pub async fn fetch<S: AlbumSource>(&self, source: &S) -> Result<(), FetchError> {
        let album = source.fetch_album(&self.id).await?;
        self.set(album);
        Ok(())
    }

    pub fn set(&self, album: Album) {
        if album.id != self.id {
            log::warn!(
                "Album {} was served for id {}, showing it anyway",
                album.id,
                self.id
            );
        }
        *self.album.borrow_mut() = Some(album);
        self.events.emit(&AlbumEvent::Change);
    }
}
