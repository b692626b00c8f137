use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::album::{Album, AlbumId};
use super::filter::{AlbumFilter, FilterMode};

/// Field the album list is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Artist,
    Title,
}

impl SortKey {
    /// Label shown in the sort selector
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Artist => "Artist",
            SortKey::Title => "Album",
        }
    }

    /// Selector value to key. Anything other than "title" orders by artist.
    pub fn from_value(value: &str) -> Self {
        if value == "title" {
            SortKey::Title
        } else {
            SortKey::Artist
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortKey::Artist => SortKey::Title,
            SortKey::Title => SortKey::Artist,
        }
    }
}

/// Case-sensitive lexical comparison on the field selected by `key`.
/// Albums missing the field sort last.
pub fn compare(key: SortKey, a: &Album, b: &Album) -> Ordering {
    match key {
        SortKey::Artist => missing_last(&a.artist, &b.artist),
        SortKey::Title => missing_last(&a.title, &b.title),
    }
}

fn missing_last(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Albums in load order plus the active ordering and filter.
///
/// `order` always holds a stable sort of the load order by `sort_key`, so
/// albums with equal keys keep their relative source order no matter how
/// often the key is switched.
#[derive(Debug, Default)]
pub struct AlbumCollection {
    members: Vec<Album>,
    order: Vec<usize>,
    sort_key: SortKey,
    filter: Option<AlbumFilter>,
    filter_mode: FilterMode,
}

impl AlbumCollection {
    pub fn new(filter_mode: FilterMode) -> Self {
        Self {
            filter_mode,
            ..Self::default()
        }
    }

    /// Replace every member and re-sort.
    pub fn replace(&mut self, albums: Vec<Album>) {
        self.members = albums;
        self.resort();
    }

    /// Store the filter text. Matching happens lazily in
    /// [`visible_members`](Self::visible_members).
    pub fn set_filter(&mut self, text: &str) {
        self.filter = AlbumFilter::new(text, self.filter_mode);
    }

    pub fn filter_text(&self) -> Option<&str> {
        self.filter.as_ref().map(AlbumFilter::text)
    }

    /// True when the filter text failed to compile and is matched literally.
    pub fn filter_fell_back(&self) -> bool {
        self.filter
            .as_ref()
            .is_some_and(|filter| filter.is_literal_fallback(self.filter_mode))
    }

    /// Switch the sort key and re-sort all members.
    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.resort();
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    fn resort(&mut self) {
        let key = self.sort_key;
        let members = &self.members;
        let mut order: Vec<usize> = (0..members.len()).collect();
        // sort_by is stable, and the input is in load order
        order.sort_by(|&a, &b| compare(key, &members[a], &members[b]));
        self.order = order;
    }

    /// Members in sort order that pass the current filter.
    pub fn visible_members(&self) -> impl Iterator<Item = &Album> + '_ {
        self.order
            .iter()
            .map(|&index| &self.members[index])
            .filter(|album| self.filter.as_ref().is_none_or(|filter| filter.matches(album)))
    }

    pub fn get(&self, id: &AlbumId) -> Option<&Album> {
        self.members.iter().find(|album| &album.id == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(id: &str, artist: &str, title: &str) -> Album {
        Album {
            id: AlbumId::new(id),
            artist: Some(artist.to_string()),
            title: Some(title.to_string()),
            image_url: None,
            songs: Vec::new(),
        }
    }

    fn sample() -> AlbumCollection {
        let mut collection = AlbumCollection::new(FilterMode::Regex);
        collection.replace(vec![
            album("1", "Radiohead", "OK Computer"),
            album("2", "Björk", "Post"),
            album("3", "Radiohead", "Kid A"),
            album("4", "Air", "Moon Safari"),
            album("5", "Björk", "Homogenic"),
        ]);
        collection
    }

    fn ids(collection: &AlbumCollection) -> Vec<&str> {
        collection
            .visible_members()
            .map(|album| album.id.as_str())
            .collect()
    }

    #[test]
    fn test_albums_without_field_sort_last() {
        let mut untitled = album("m", "Abba", "");
        untitled.artist = None;
        untitled.title = None;
        let mut other = album("o", "Abba", "");
        other.artist = None;
        other.title = None;

        let mut collection = AlbumCollection::new(FilterMode::Regex);
        collection.replace(vec![untitled, album("n", "Abba", "Arrival"), other]);
        assert_eq!(ids(&collection), vec!["n", "m", "o"]);

        collection.set_sort_key(SortKey::Title);
        assert_eq!(ids(&collection), vec!["n", "m", "o"]);
    }

    #[test]
    fn test_equal_titles_keep_load_order() {
        let mut collection = AlbumCollection::new(FilterMode::Regex);
        collection.replace(vec![
            album("1", "Queen", "Greatest Hits"),
            album("2", "ABBA", "Gold"),
            album("3", "Abba", "Greatest Hits"),
            album("4", "Blondie", "Greatest Hits"),
        ]);
        collection.set_sort_key(SortKey::Title);
        assert_eq!(ids(&collection), vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn test_default_order_is_artist_and_stable() {
        let collection = sample();
        assert_eq!(collection.sort_key(), SortKey::Artist);
        // Ties keep load order: 2 before 5, 1 before 3
        assert_eq!(ids(&collection), vec!["4", "2", "5", "1", "3"]);
    }

    #[test]
    fn test_artist_order_is_non_decreasing() {
        let mut collection = sample();
        collection.set_sort_key(SortKey::Artist);
        let artists: Vec<_> = collection
            .visible_members()
            .map(|album| album.artist.clone())
            .collect();
        assert!(artists.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_sort_by_title() {
        let mut collection = sample();
        collection.set_sort_key(SortKey::Title);
        assert_eq!(ids(&collection), vec!["5", "3", "4", "1", "2"]);
    }

    #[test]
    fn test_sort_round_trip_keeps_members() {
        let mut collection = sample();
        let original = ids(&collection)
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();

        collection.set_sort_key(SortKey::Title);
        collection.set_sort_key(SortKey::Artist);

        let after: Vec<String> = ids(&collection).into_iter().map(String::from).collect();
        assert_eq!(after, original);
        assert_eq!(after.len(), collection.len());
    }

    #[test]
    fn test_empty_filter_yields_everything() {
        let mut collection = sample();
        collection.set_filter("radio");
        collection.set_filter("");
        assert_eq!(collection.filter_text(), None);
        assert_eq!(ids(&collection), vec!["4", "2", "5", "1", "3"]);
    }

    #[test]
    fn test_filter_keeps_sort_order() {
        let mut collection = sample();
        collection.set_filter("björk");
        assert_eq!(ids(&collection), vec!["2", "5"]);

        collection.set_sort_key(SortKey::Title);
        assert_eq!(ids(&collection), vec!["5", "2"]);
    }

    #[test]
    fn test_filter_without_match_is_empty() {
        let mut collection = sample();
        collection.set_filter("zeppelin");
        assert_eq!(collection.visible_members().count(), 0);
    }

    #[test]
    fn test_replace_resorts_with_current_key() {
        let mut collection = AlbumCollection::new(FilterMode::Literal);
        collection.set_sort_key(SortKey::Title);
        collection.replace(vec![album("1", "A", "Zed"), album("2", "B", "Alpha")]);
        assert_eq!(ids(&collection), vec!["2", "1"]);
        assert!(collection.get(&AlbumId::new("1")).is_some());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let mut collection = sample();
        collection.set_filter("[post");
        assert!(collection.filter_fell_back());
        assert_eq!(collection.visible_members().count(), 0);

        collection.set_filter("post");
        assert!(!collection.filter_fell_back());
        assert_eq!(ids(&collection), vec!["2"]);
    }

    #[test]
    fn test_sort_key_from_value() {
        assert_eq!(SortKey::from_value("title"), SortKey::Title);
        assert_eq!(SortKey::from_value("artist"), SortKey::Artist);
        assert_eq!(SortKey::from_value("anything"), SortKey::Artist);
        assert_eq!(SortKey::Title.label(), "Album");
    }
}
