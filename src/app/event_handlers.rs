use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::cell::RefCell;
use std::rc::Rc;

use super::App;
use crate::app::action::Action;
use crate::app::app::InputMode;
use crate::app::page::{Page, PageViews};
use crate::app::router::Route;
use crate::app::views::FilterBarView;

/// Cursor movement shared by the album list and the track list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Previous,
    Next,
    First,
    Last,
}

/// Trait for event handling
pub trait EventHandlers {
    fn handle_crossterm_event(&mut self, event: Event);
    fn on_key_event(&mut self, key: KeyEvent);
    fn perform(&mut self, action: Action);
}

impl EventHandlers for App {
    fn handle_crossterm_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            // The next frame redraws at the new size
            Event::Resize(_, _) => {}
            _ => {}
        }
    }

    fn on_key_event(&mut self, key: KeyEvent) {
        if self.show_config_warnings_popup {
            self.show_config_warnings_popup = false;
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.input_mode {
            InputMode::Search => self.on_search_key(key),
            InputMode::Browse => {
                if let Some(action) = self.key_binds.handle_key(key) {
                    crate::app::logging::log_user_interaction(action.description(), None);
                    self.perform(action);
                }
            }
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit(),
            Action::NavigateUp => self.move_cursor(Movement::Previous),
            Action::NavigateDown => self.move_cursor(Movement::Next),
            Action::GoToTop => self.move_cursor(Movement::First),
            Action::GoToBottom => self.move_cursor(Movement::Last),
            Action::Open => self.open_selected(),
            Action::Back => self.go_back(),
            Action::Search => {
                if let Some(filter_bar) = self.filter_bar() {
                    filter_bar.borrow_mut().set_editing(true);
                    self.input_mode = InputMode::Search;
                }
            }
            Action::ToggleSort => {
                if let Some(filter_bar) = self.filter_bar() {
                    filter_bar.borrow_mut().cycle_sort();
                }
            }
            Action::TogglePlayPause => self.audio_display.view().borrow_mut().toggle(),
            Action::Reload => self.reload(),
        }
    }
}

impl App {
    /// Filter bar of the album list page, if that page is open.
    fn filter_bar(&self) -> Option<Rc<RefCell<FilterBarView>>> {
        match &self.page {
            Some(Page {
                views: PageViews::AlbumList { filter_bar, .. },
                ..
            }) => Some(Rc::clone(filter_bar)),
            _ => None,
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        let Some(filter_bar) = self.filter_bar() else {
            self.input_mode = InputMode::Browse;
            return;
        };

        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                filter_bar.borrow_mut().set_editing(false);
                self.input_mode = InputMode::Browse;
            }
            KeyCode::Backspace => filter_bar.borrow_mut().pop_char(),
            KeyCode::Up => self.move_cursor(Movement::Previous),
            KeyCode::Down => self.move_cursor(Movement::Next),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                filter_bar.borrow_mut().push_char(c);
            }
            _ => {}
        }
    }

    pub fn move_cursor(&mut self, movement: Movement) {
        let Some(page) = &self.page else {
            return;
        };
        match &page.views {
            PageViews::AlbumList { list, .. } => {
                let mut list = list.view().borrow_mut();
                match movement {
                    Movement::Previous => list.select_previous(),
                    Movement::Next => list.select_next(),
                    Movement::First => list.select_first(),
                    Movement::Last => list.select_last(),
                }
            }
            PageViews::AlbumDetail { detail, .. } => {
                let mut detail = detail.view().borrow_mut();
                match movement {
                    Movement::Previous => detail.select_previous(),
                    Movement::Next => detail.select_next(),
                    Movement::First => detail.select_first(),
                    Movement::Last => detail.select_last(),
                }
            }
        }
    }

    /// Open the selected album, or play the selected track.
    fn open_selected(&mut self) {
        let Some(page) = &self.page else {
            return;
        };
        match &page.views {
            PageViews::AlbumList { list, .. } => {
                let selected = list.view().borrow().selected_album_id().cloned();
                if let Some(id) = selected {
                    self.navigate(Route::AlbumDetail(id));
                }
            }
            PageViews::AlbumDetail { .. } => self.play_selected(),
        }
    }

    /// Clear an active filter first, then walk back through the history.
    fn go_back(&mut self) {
        if let Some(filter_bar) = self.filter_bar() {
            let has_query = !filter_bar.borrow().query().is_empty();
            if has_query {
                filter_bar.borrow_mut().clear();
                return;
            }
        }
        self.back();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Config;
    use crate::app::library::{AlbumId, SortKey};

    fn app() -> App {
        let mut app = App::new(Config::default(), Route::AlbumList).unwrap();
        app.dispatch();
        app
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_search_mode_edits_filter() {
        let mut app = app();
        app.on_key_event(press(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Search);

        for c in "airx".chars() {
            app.on_key_event(press(KeyCode::Char(c)));
        }
        app.on_key_event(press(KeyCode::Backspace));

        let filter_bar = app.filter_bar().unwrap();
        assert_eq!(filter_bar.borrow().query(), "air");

        // 'q' is text while searching
        app.on_key_event(press(KeyCode::Char('q')));
        assert_eq!(app.input_mode, InputMode::Search);
        assert_eq!(filter_bar.borrow().query(), "airq");

        app.on_key_event(press(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Browse);
        assert!(!filter_bar.borrow().is_editing());
    }

    #[tokio::test]
    async fn test_back_clears_filter_before_history() {
        let mut app = app();
        app.navigate(Route::AlbumDetail(AlbumId::new("1")));
        app.back();

        let filter_bar = app.filter_bar().unwrap();
        filter_bar.borrow_mut().push_char('x');

        app.perform(Action::Back);
        assert_eq!(filter_bar.borrow().query(), "");
        assert_eq!(app.history.current(), &Route::AlbumList);
    }

    #[tokio::test]
    async fn test_toggle_sort() {
        let mut app = app();
        app.perform(Action::ToggleSort);
        let filter_bar = app.filter_bar().unwrap();
        assert_eq!(filter_bar.borrow().sort_key(), SortKey::Title);
    }

    #[tokio::test]
    async fn test_popup_swallows_first_key() {
        let mut app = app();
        app.running = true;
        app.show_config_warnings_popup = true;

        app.on_key_event(press(KeyCode::Char('q')));
        assert!(app.running);
        assert!(!app.show_config_warnings_popup);

        app.on_key_event(press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_while_searching() {
        let mut app = app();
        app.running = true;
        app.perform(Action::Search);
        app.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }
}
