//! Search input and sort selector above the album list.
//!
//! The bar knows nothing about the collection. It only turns edits into
//! [`FilterEvent`]s; whoever owns the collection subscribes to them.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::ReactiveView;
use crate::app::config::Palette;
use crate::app::events::{Emitter, Subscriber, Subscription};
use crate::app::library::SortKey;

pub const PLACEHOLDER: &str = "Search by artist or album";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// Full query text after an edit
    Query(String),
    SortBy(SortKey),
}

#[derive(Debug)]
pub struct FilterBarView {
    query: String,
    sort_key: SortKey,
    editing: bool,
    palette: Palette,
    events: Emitter<FilterEvent>,
    output: Vec<Line<'static>>,
}

impl FilterBarView {
    pub fn new(palette: Palette, sort_key: SortKey) -> Self {
        let mut view = Self {
            query: String::new(),
            sort_key,
            editing: false,
            palette,
            events: Emitter::new(),
            output: Vec::new(),
        };
        view.render();
        view
    }

    pub fn subscribe(&self, subscriber: impl Subscriber<FilterEvent> + 'static) -> Subscription {
        self.events.subscribe(subscriber)
    }

    pub fn events(&self) -> &Emitter<FilterEvent> {
        &self.events
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        self.render();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.query_changed();
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.query_changed();
        }
    }

    pub fn clear(&mut self) {
        if !self.query.is_empty() {
            self.query.clear();
            self.query_changed();
        }
    }

    fn query_changed(&mut self) {
        self.events.emit(&FilterEvent::Query(self.query.clone()));
        self.render();
    }

    /// Pick a sort option. Re-selecting the current one emits nothing.
    pub fn select_sort(&mut self, key: SortKey) {
        if key == self.sort_key {
            return;
        }
        self.sort_key = key;
        self.events.emit(&FilterEvent::SortBy(key));
        self.render();
    }

    pub fn cycle_sort(&mut self) {
        self.select_sort(self.sort_key.toggled());
    }
}

impl ReactiveView for FilterBarView {
    fn render(&mut self) {
        let palette = self.palette;
        let mut spans = vec![Span::styled(" / ", Style::default().fg(palette.border_title))];

        if self.query.is_empty() && !self.editing {
            spans.push(Span::styled(PLACEHOLDER, Style::default().fg(palette.placeholder)));
        } else {
            spans.push(Span::styled(
                self.query.clone(),
                Style::default().fg(palette.song_title),
            ));
        }
        if self.editing {
            spans.push(Span::styled(
                "_",
                Style::default()
                    .fg(palette.song_title)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        spans.push(Span::raw("   "));
        spans.push(Span::styled("Sort by: ", Style::default().fg(palette.border_title)));
        for key in [SortKey::Artist, SortKey::Title] {
            let style = if key == self.sort_key {
                Style::default()
                    .fg(palette.selected_text)
                    .bg(palette.selected_highlight)
            } else {
                Style::default().fg(palette.album)
            };
            spans.push(Span::styled(format!(" {} ", key.label()), style));
            spans.push(Span::raw(" "));
        }

        self.output = vec![Line::from(spans)];
    }

    fn output(&self) -> &[Line<'static>] {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded(view: &FilterBarView) -> (Rc<RefCell<Vec<FilterEvent>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let subscription =
            view.subscribe(move |event: &FilterEvent| sink.borrow_mut().push(event.clone()));
        (log, subscription)
    }

    fn text(view: &FilterBarView) -> String {
        view.output()[0].to_string()
    }

    #[test]
    fn test_typing_emits_full_query() {
        let mut view = FilterBarView::new(Palette::default(), SortKey::Artist);
        let (log, _subscription) = recorded(&view);

        view.push_char('a');
        view.push_char('i');
        view.pop_char();

        assert_eq!(
            *log.borrow(),
            vec![
                FilterEvent::Query("a".into()),
                FilterEvent::Query("ai".into()),
                FilterEvent::Query("a".into()),
            ]
        );
        assert_eq!(view.query(), "a");
    }

    #[test]
    fn test_no_event_without_change() {
        let mut view = FilterBarView::new(Palette::default(), SortKey::Artist);
        let (log, _subscription) = recorded(&view);

        view.pop_char();
        view.clear();
        view.select_sort(SortKey::Artist);

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_cycle_sort() {
        let mut view = FilterBarView::new(Palette::default(), SortKey::Artist);
        let (log, _subscription) = recorded(&view);

        view.cycle_sort();
        view.cycle_sort();

        assert_eq!(
            *log.borrow(),
            vec![
                FilterEvent::SortBy(SortKey::Title),
                FilterEvent::SortBy(SortKey::Artist),
            ]
        );
    }

    #[test]
    fn test_render_shows_placeholder_and_options() {
        let mut view = FilterBarView::new(Palette::default(), SortKey::Title);
        let line = text(&view);
        assert!(line.contains(PLACEHOLDER));
        assert!(line.contains("Sort by:"));
        assert!(line.contains(" Artist "));
        assert!(line.contains(" Album "));

        view.push_char('x');
        assert!(!text(&view).contains(PLACEHOLDER));
        assert!(text(&view).contains('x'));
    }
}
