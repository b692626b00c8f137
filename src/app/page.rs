//! One instance of a route: its models, mounted views and in-flight loads.
//!
//! Dropping a page cancels its token, so loads that are still running resolve
//! as [`FetchError::Cancelled`] without touching the models, and disposes the
//! view subscriptions.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use ratatui_image::protocol::StatefulProtocol;
use std::cell::RefCell;
use std::rc::Rc;
use tokio_util::sync::CancellationToken;

use crate::app::config::Palette;
use crate::app::library::{AlbumCollection, AlbumModel, CollectionStore, FilterMode, SortKey};
use crate::app::playback::PlaybackState;
use crate::app::router::Route;
use crate::app::source::{FetchError, HttpAlbumSource, until_cancelled};
use crate::app::views::{AlbumDetailView, AlbumListView, FilterBarView, Mounted};

/// Completion report of a page load, tagged with the page generation.
#[derive(Debug)]
pub enum PageMessage {
    AlbumsLoaded {
        generation: u64,
        result: Result<usize, FetchError>,
    },
    AlbumLoaded {
        generation: u64,
        result: Result<(), FetchError>,
    },
    CoverLoaded {
        generation: u64,
        result: Result<Vec<u8>, FetchError>,
    },
}

impl PageMessage {
    pub fn generation(&self) -> u64 {
        match self {
            PageMessage::AlbumsLoaded { generation, .. }
            | PageMessage::AlbumLoaded { generation, .. }
            | PageMessage::CoverLoaded { generation, .. } => *generation,
        }
    }
}

/// Loads run on the UI task because they write into `Rc` models.
pub type PageTask = LocalBoxFuture<'static, PageMessage>;

/// Everything a page needs from the app to build itself.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub source: HttpAlbumSource,
    pub playback: Rc<PlaybackState>,
    pub palette: Palette,
    pub filter_mode: FilterMode,
}

pub enum Cover {
    /// The album has no image
    Absent,
    Loading,
    Ready(Box<StatefulProtocol>),
    Failed,
}

impl std::fmt::Debug for Cover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Cover::Absent => "Absent",
            Cover::Loading => "Loading",
            Cover::Ready(_) => "Ready",
            Cover::Failed => "Failed",
        })
    }
}

#[derive(Debug)]
pub enum PageViews {
    AlbumList {
        filter_bar: Rc<RefCell<FilterBarView>>,
        list: Mounted<AlbumListView>,
    },
    AlbumDetail {
        detail: Mounted<AlbumDetailView>,
        cover: Cover,
    },
}

#[derive(Debug)]
pub struct Page {
    generation: u64,
    route: Route,
    token: CancellationToken,
    pub views: PageViews,
}

impl Page {
    /// Build the views for `route` and start its initial load.
    pub fn open(route: Route, generation: u64, context: &PageContext) -> (Self, PageTask) {
        let token = CancellationToken::new();
        let source = context.source.clone();
        let task_token = token.clone();

        let (views, task) = match &route {
            Route::AlbumList => {
                let store = Rc::new(CollectionStore::new(AlbumCollection::new(
                    context.filter_mode,
                )));
                let filter_bar = Rc::new(RefCell::new(FilterBarView::new(
                    context.palette,
                    SortKey::default(),
                )));
                let list = AlbumListView::mount(&store, &filter_bar.borrow(), context.palette);

                let task = async move {
                    let result = until_cancelled(&task_token, store.load(&source)).await;
                    PageMessage::AlbumsLoaded { generation, result }
                }
                .boxed_local();

                (PageViews::AlbumList { filter_bar, list }, task)
            }
            Route::AlbumDetail(id) => {
                let model = Rc::new(AlbumModel::new(id.clone()));
                let detail = AlbumDetailView::mount(&model, &context.playback, context.palette);

                let task = async move {
                    let result = until_cancelled(&task_token, model.fetch(&source)).await;
                    PageMessage::AlbumLoaded { generation, result }
                }
                .boxed_local();

                (
                    PageViews::AlbumDetail {
                        detail,
                        cover: Cover::Absent,
                    },
                    task,
                )
            }
        };

        log::info!("Opened page {} (generation {})", route, generation);
        let page = Self {
            generation,
            route,
            token,
            views,
        };
        (page, task)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Start fetching the album cover once the album is known. Returns None
    /// when this is not a detail page or the album has no image.
    pub fn cover_task(&mut self, source: &HttpAlbumSource) -> Option<PageTask> {
        let PageViews::AlbumDetail { detail, cover } = &mut self.views else {
            return None;
        };
        let Some(image_url) = detail.view().borrow().image_url() else {
            *cover = Cover::Absent;
            return None;
        };

        *cover = Cover::Loading;
        let source = source.clone();
        let token = self.token.clone();
        let generation = self.generation;
        Some(
            async move {
                let result = until_cancelled(&token, source.fetch_bytes(&image_url)).await;
                PageMessage::CoverLoaded { generation, result }
            }
            .boxed_local(),
        )
    }

    pub fn set_cover(&mut self, new_cover: Cover) {
        if let PageViews::AlbumDetail { cover, .. } = &mut self.views {
            *cover = new_cover;
        }
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.token.cancel();
        log::debug!("Closed page {} (generation {})", self.route, self.generation);
    }
}
