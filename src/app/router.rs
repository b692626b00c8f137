use std::fmt;

use crate::app::library::AlbumId;

/// The two screens of the app and their paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Path `""`
    AlbumList,
    /// Path `albums/:id`
    AlbumDetail(AlbumId),
}

impl Route {
    /// Parse a path. A leading `#` or `/` is ignored, anything unknown is None.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_start_matches('#').trim_matches('/');
        if path.is_empty() {
            return Some(Route::AlbumList);
        }

        match path.split('/').collect::<Vec<_>>().as_slice() {
            ["albums", id] if !id.is_empty() => Some(Route::AlbumDetail(AlbumId::new(*id))),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::AlbumList => String::new(),
            Route::AlbumDetail(id) => format!("albums/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.path())
    }
}

/// Navigation history. The last entry is the current route.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            entries: vec![start],
        }
    }

    pub fn current(&self) -> &Route {
        // entries is never empty: new() seeds it and back() keeps the first
        &self.entries[self.entries.len() - 1]
    }

    /// Push `route`. Navigating to the current route records nothing and
    /// returns false.
    pub fn navigate(&mut self, route: Route) -> bool {
        if *self.current() == route {
            return false;
        }
        self.entries.push(route);
        true
    }

    /// Pop the current route. Returns the route now current, or None when
    /// already at the start.
    pub fn back(&mut self) -> Option<&Route> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        Some(self.current())
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse(""), Some(Route::AlbumList));
        assert_eq!(Route::parse("#"), Some(Route::AlbumList));
        assert_eq!(
            Route::parse("albums/42"),
            Some(Route::AlbumDetail(AlbumId::new("42")))
        );
        assert_eq!(
            Route::parse("#/albums/abc/"),
            Some(Route::AlbumDetail(AlbumId::new("abc")))
        );
        assert_eq!(Route::parse("albums/"), None);
        assert_eq!(Route::parse("albums/1/songs"), None);
        assert_eq!(Route::parse("artists/1"), None);
    }

    #[test]
    fn test_path_round_trip() {
        for route in [Route::AlbumList, Route::AlbumDetail(AlbumId::new("7"))] {
            assert_eq!(Route::parse(&route.path()), Some(route.clone()));
        }
        assert_eq!(Route::AlbumDetail(AlbumId::new("7")).to_string(), "#albums/7");
    }

    #[test]
    fn test_history() {
        let mut history = History::new(Route::AlbumList);
        assert_eq!(history.back(), None);

        assert!(history.navigate(Route::AlbumDetail(AlbumId::new("1"))));
        assert!(!history.navigate(Route::AlbumDetail(AlbumId::new("1"))));
        assert_eq!(history.depth(), 2);

        assert_eq!(history.back(), Some(&Route::AlbumList));
        assert_eq!(history.current(), &Route::AlbumList);
        assert_eq!(history.back(), None);
    }
}
