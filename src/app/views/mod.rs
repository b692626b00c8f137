//! Reactive views.
//!
//! A view owns its rendered lines and rebuilds all of them in
//! [`ReactiveView::render`]. Views never render on a timer: they are bound to
//! model emitters with [`bind`] and re-render synchronously whenever a source
//! notifies them. The frame renderer only copies their output to the screen.

pub mod album_detail;
pub mod album_list;
pub mod audio_display;
pub mod filter_bar;

pub use album_detail::AlbumDetailView;
pub use album_list::AlbumListView;
pub use audio_display::{AudioDisplayView, AudioPlayer, AudioRequest, PlayerStatus};
pub use filter_bar::{FilterBarView, FilterEvent};

use ratatui::text::Line;
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::events::{Emitter, Subscription};

pub trait ReactiveView {
    /// Rebuild the whole output from the view's sources.
    fn render(&mut self);

    fn output(&self) -> &[Line<'static>];
}

/// Subscribe `view` to `emitter`: on every event run `handler`, then
/// re-render.
///
/// The subscription holds the view weakly, so a dropped view simply stops
/// reacting. A notification that arrives while the view is already borrowed
/// (the view's own call chain caused it) is skipped.
pub fn bind<E, V, H>(emitter: &Emitter<E>, view: &Rc<RefCell<V>>, handler: H) -> Subscription
where
    E: 'static,
    V: ReactiveView + 'static,
    H: Fn(&mut V, &E) + 'static,
{
    let view = Rc::downgrade(view);
    emitter.subscribe(move |event: &E| {
        let Some(view) = view.upgrade() else {
            return;
        };
        match view.try_borrow_mut() {
            Ok(mut view) => {
                handler(&mut *view, event);
                view.render();
            }
            Err(_) => log::warn!(
                "Skipped re-entrant update of {}",
                std::any::type_name::<V>()
            ),
        };
    })
}

/// A view together with the subscriptions that keep it up to date.
/// Dropping it disposes every subscription.
pub struct Mounted<V> {
    view: Rc<RefCell<V>>,
    subscriptions: Vec<Subscription>,
}

impl<V> Mounted<V> {
    pub fn new(view: Rc<RefCell<V>>, subscriptions: Vec<Subscription>) -> Self {
        Self {
            view,
            subscriptions,
        }
    }

    pub fn view(&self) -> &Rc<RefCell<V>> {
        &self.view
    }
}

impl<V> Drop for Mounted<V> {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
    }
}

impl<V> std::fmt::Debug for Mounted<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("view", &std::any::type_name::<V>())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
