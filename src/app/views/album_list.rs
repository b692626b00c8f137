use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListState;
use std::cell::RefCell;
use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

use super::filter_bar::{FilterBarView, FilterEvent};
use super::{Mounted, ReactiveView, bind};
use crate::app::config::Palette;
use crate::app::library::{AlbumId, CollectionEvent, CollectionStore};
use crate::app::ui::utils::left_align;

/// Widest the artist column is allowed to get
const MAX_ARTIST_WIDTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ListStatus {
    Loading,
    Ready,
    Failed(String),
}

/// The filtered, sorted album list with a selection cursor.
#[derive(Debug)]
pub struct AlbumListView {
    store: Rc<CollectionStore>,
    palette: Palette,
    status: ListStatus,
    /// Ids of the rendered rows, in display order
    rows: Vec<AlbumId>,
    list_state: ListState,
    output: Vec<Line<'static>>,
}

impl AlbumListView {
    pub fn new(store: Rc<CollectionStore>, palette: Palette) -> Self {
        let mut view = Self {
            store,
            palette,
            status: ListStatus::Loading,
            rows: Vec::new(),
            list_state: ListState::default(),
            output: Vec::new(),
        };
        view.render();
        view
    }

    /// Create the view and bind it to the collection and the filter bar.
    pub fn mount(
        store: &Rc<CollectionStore>,
        filter_bar: &FilterBarView,
        palette: Palette,
    ) -> Mounted<Self> {
        let view = Rc::new(RefCell::new(Self::new(Rc::clone(store), palette)));

        let subscriptions = vec![
            bind(
                store.events(),
                &view,
                |view: &mut Self, event: &CollectionEvent| {
                    let CollectionEvent::Reset { count } = event;
                    log::debug!("Album list reset with {} albums", count);
                    view.status = ListStatus::Ready;
                },
            ),
            bind(
                filter_bar.events(),
                &view,
                |view: &mut Self, event: &FilterEvent| match event {
                    FilterEvent::Query(text) => view.store.set_filter(text),
                    FilterEvent::SortBy(key) => view.store.set_sort_key(*key),
                },
            ),
        ];

        Mounted::new(view, subscriptions)
    }

    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.status = ListStatus::Failed(message.into());
        self.render();
    }

    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    pub fn selected_album_id(&self) -> Option<&AlbumId> {
        self.list_state.selected().and_then(|i| self.rows.get(i))
    }

    pub fn select_next(&mut self) {
        if let Some(i) = self.list_state.selected()
            && i + 1 < self.rows.len()
        {
            self.list_state.select(Some(i + 1));
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(i) = self.list_state.selected()
            && i > 0
        {
            self.list_state.select(Some(i - 1));
        }
    }

    pub fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(self.rows.len() - 1));
        }
    }

    /// Keep the cursor on a valid row after the rows changed.
    fn clamp_selection(&mut self) {
        let selected = match (self.list_state.selected(), self.rows.len()) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        };
        self.list_state.select(selected);
    }

    fn message(&self, text: String, color: ratatui::style::Color) -> Vec<Line<'static>> {
        vec![Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::ITALIC),
        ))]
    }

    /// Title for the surrounding block, e.g. " Albums (3/12) ".
    pub fn title(&self) -> String {
        let collection = self.store.borrow();
        let mut title = format!(" Albums ({}/{})", self.rows.len(), collection.len());
        if collection.filter_fell_back() {
            title.push_str(" [literal match]");
        }
        title.push(' ');
        title
    }
}

impl ReactiveView for AlbumListView {
    fn render(&mut self) {
        let palette = self.palette;
        let collection = self.store.borrow();

        let visible: Vec<_> = collection.visible_members().collect();
        self.rows = visible.iter().map(|album| album.id.clone()).collect();

        let artist_width = visible
            .iter()
            .map(|album| album.display_artist().width())
            .max()
            .unwrap_or(0)
            .min(MAX_ARTIST_WIDTH);

        self.output = match &self.status {
            ListStatus::Loading => self.message("Loading albums…".into(), palette.placeholder),
            ListStatus::Failed(error) => {
                self.message(format!("Could not load albums: {}", error), palette.error)
            }
            ListStatus::Ready if visible.is_empty() && collection.filter_text().is_some() => {
                self.message("No albums match the filter".into(), palette.placeholder)
            }
            ListStatus::Ready if visible.is_empty() => {
                self.message("No albums".into(), palette.placeholder)
            }
            ListStatus::Ready => visible
                .iter()
                .map(|album| {
                    Line::from(vec![
                        Span::styled(
                            left_align(album.display_artist(), artist_width),
                            Style::default().fg(palette.artist),
                        ),
                        Span::raw("  "),
                        Span::styled(
                            album.display_title().to_string(),
                            Style::default().fg(palette.album),
                        ),
                    ])
                })
                .collect(),
        };

        drop(visible);
        drop(collection);
        self.clamp_selection();
    }

    fn output(&self) -> &[Line<'static>] {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::library::{Album, AlbumCollection, FilterMode, SortKey};

    fn album(id: &str, artist: &str, title: &str) -> Album {
        Album {
            id: AlbumId::new(id),
            artist: Some(artist.to_string()),
            title: Some(title.to_string()),
            image_url: None,
            songs: Vec::new(),
        }
    }

    fn setup() -> (Rc<CollectionStore>, Rc<RefCell<FilterBarView>>, Mounted<AlbumListView>) {
        let store = Rc::new(CollectionStore::new(AlbumCollection::new(FilterMode::Regex)));
        let filter_bar = Rc::new(RefCell::new(FilterBarView::new(
            Palette::default(),
            SortKey::Artist,
        )));
        let mounted = AlbumListView::mount(&store, &filter_bar.borrow(), Palette::default());
        (store, filter_bar, mounted)
    }

    fn ids(view: &AlbumListView) -> Vec<&str> {
        view.rows.iter().map(AlbumId::as_str).collect()
    }

    fn sample() -> Vec<Album> {
        vec![
            album("1", "Radiohead", "OK Computer"),
            album("2", "Air", "Moon Safari"),
            album("3", "Björk", "Post"),
        ]
    }

    #[test]
    fn test_loading_until_reset() {
        let (store, _bar, mounted) = setup();
        assert!(mounted.view().borrow().is_loading());
        assert_eq!(mounted.view().borrow().output()[0].to_string(), "Loading albums…");

        store.reset(sample());

        let view = mounted.view().borrow();
        assert!(!view.is_loading());
        assert_eq!(ids(&view), vec!["2", "3", "1"]);
        assert_eq!(view.output().len(), 3);
        assert_eq!(view.selected_album_id(), Some(&AlbumId::new("2")));
    }

    #[test]
    fn test_follows_filter_bar() {
        let (store, bar, mounted) = setup();
        store.reset(sample());

        bar.borrow_mut().push_char('o');
        bar.borrow_mut().push_char('k');
        assert_eq!(ids(&mounted.view().borrow()), vec!["1"]);

        bar.borrow_mut().clear();
        bar.borrow_mut().cycle_sort();
        assert_eq!(ids(&mounted.view().borrow()), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_no_match_message_and_no_selection() {
        let (store, bar, mounted) = setup();
        store.reset(sample());

        for c in "zeppelin".chars() {
            bar.borrow_mut().push_char(c);
        }

        let view = mounted.view().borrow();
        assert!(view.is_empty());
        assert_eq!(view.selected_album_id(), None);
        assert_eq!(view.output()[0].to_string(), "No albums match the filter");
    }

    #[test]
    fn test_selection_moves_and_clamps() {
        let (store, bar, mounted) = setup();
        store.reset(sample());

        {
            let mut view = mounted.view().borrow_mut();
            view.select_last();
            view.select_next();
            assert_eq!(view.selected_album_id(), Some(&AlbumId::new("1")));
            view.select_first();
            view.select_previous();
            assert_eq!(view.selected_album_id(), Some(&AlbumId::new("2")));
            view.select_last();
        }

        // Selection index 2 no longer exists once the list shrinks
        bar.borrow_mut().push_char('p');
        bar.borrow_mut().push_char('o');
        let view = mounted.view().borrow();
        assert_eq!(ids(&view), vec!["3"]);
        assert_eq!(view.selected_album_id(), Some(&AlbumId::new("3")));
    }

    #[test]
    fn test_artist_column_is_aligned() {
        let (store, _bar, mounted) = setup();
        store.reset(sample());

        let view = mounted.view().borrow();
        let starts: Vec<usize> = view
            .output()
            .iter()
            .map(|line| line.spans[0].content.width())
            .collect();
        assert!(starts.iter().all(|&w| w == "Radiohead".len()));
    }

    #[test]
    fn test_unmount_stops_updates() {
        let (store, _bar, mounted) = setup();
        let view = Rc::clone(mounted.view());
        drop(mounted);

        store.reset(sample());
        assert!(view.borrow().is_loading());
        assert_eq!(store.events().subscriber_count(), 0);
    }

    #[test]
    fn test_load_failed() {
        let (_store, _bar, mounted) = setup();
        mounted.view().borrow_mut().load_failed("HTTP 500");
        assert_eq!(
            mounted.view().borrow().output()[0].to_string(),
            "Could not load albums: HTTP 500"
        );
    }
}
