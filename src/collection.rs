use crate::error::PlayerError;
use crate::events::{CollectionEvent, Observers, SubscriptionId};
use crate::model::Album;
use tracing::debug;

/// Ordered album set used for both the library and the playlist. Order is
/// playback order.
#[derive(Debug, Default)]
pub struct AlbumCollection {
    albums: Vec<Album>,
    observers: Observers<CollectionEvent>,
}

impl AlbumCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_albums(albums: Vec<Album>) -> Self {
        Self {
            albums,
            observers: Observers::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Album> {
        self.albums.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Album> {
        self.albums.iter()
    }

    pub fn is_first_album(&self, index: usize) -> bool {
        index == 0
    }

    pub fn is_last_album(&self, index: usize) -> bool {
        self.albums.len().checked_sub(1) == Some(index)
    }

    /// Appends `album` and returns its index. Equal albums are separate
    /// entries; callers that need membership track it themselves.
    pub fn add(&mut self, album: Album) -> usize {
        self.albums.push(album);
        let index = self.albums.len() - 1;
        debug!(index, "album appended");
        self.observers.emit(&CollectionEvent::Add { index });
        index
    }

    pub fn remove(&mut self, index: usize) -> Result<Album, PlayerError> {
        if index >= self.albums.len() {
            return Err(self.out_of_range(index));
        }

        let album = self.albums.remove(index);
        self.observers.emit(&CollectionEvent::Remove { index });
        Ok(album)
    }

    pub fn reset(&mut self, albums: Vec<Album>) {
        self.albums = albums;
        let len = self.albums.len();
        self.observers.emit(&CollectionEvent::Reset { len });
    }

    pub fn select(&mut self, index: usize) -> Result<&Album, PlayerError> {
        if index >= self.albums.len() {
            return Err(self.out_of_range(index));
        }

        self.observers.emit(&CollectionEvent::Select { index });
        Ok(&self.albums[index])
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&CollectionEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn out_of_range(&self, index: usize) -> PlayerError {
        PlayerError::AlbumOutOfRange {
            index,
            len: self.albums.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Track;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn album(title: &str) -> Album {
        Album::new(title, vec![Track::new(format!("/music/{title}/1.mp3"))])
    }

    fn recording(collection: &mut AlbumCollection) -> Rc<RefCell<Vec<CollectionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        collection.subscribe(move |event| sink.borrow_mut().push(*event));
        events
    }

    #[test]
    fn album_position_predicates() {
        let collection = AlbumCollection::from_albums(vec![album("a"), album("b"), album("c")]);
        assert!(collection.is_first_album(0));
        assert!(!collection.is_first_album(1));
        assert!(collection.is_last_album(2));
        assert!(!collection.is_last_album(1));
        assert!(!collection.is_last_album(3));
    }

    #[test]
    fn empty_collection_has_no_last_album() {
        let collection = AlbumCollection::new();
        assert!(!collection.is_last_album(0));
        assert!(collection.is_first_album(0));
    }

    #[test]
    fn add_appends_and_notifies() {
        let mut collection = AlbumCollection::new();
        let events = recording(&mut collection);

        assert_eq!(collection.add(album("a")), 0);
        assert_eq!(collection.add(album("b")), 1);

        assert_eq!(collection.get(1).and_then(|a| a.title.as_deref()), Some("b"));
        assert_eq!(
            *events.borrow(),
            vec![CollectionEvent::Add { index: 0 }, CollectionEvent::Add { index: 1 }]
        );
    }

    #[test]
    fn equal_albums_are_separate_entries() {
        let mut collection = AlbumCollection::new();
        let events = recording(&mut collection);

        collection.add(album("a"));
        collection.add(album("a"));

        assert_eq!(collection.len(), 2);
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn unsubscribed_observer_misses_later_changes() {
        let mut collection = AlbumCollection::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = collection.subscribe(move |event| sink.borrow_mut().push(*event));

        collection.add(album("a"));
        assert!(collection.unsubscribe(id));
        collection.add(album("b"));
        assert!(!collection.unsubscribe(id));

        assert_eq!(*events.borrow(), vec![CollectionEvent::Add { index: 0 }]);
    }

    #[test]
    fn remove_out_of_range_is_an_error() {
        let mut collection = AlbumCollection::from_albums(vec![album("a")]);
        let events = recording(&mut collection);

        assert_eq!(
            collection.remove(1),
            Err(PlayerError::AlbumOutOfRange { index: 1, len: 1 })
        );
        let removed = collection.remove(0).expect("remove");

        assert_eq!(removed.title.as_deref(), Some("a"));
        assert!(collection.is_empty());
        assert_eq!(*events.borrow(), vec![CollectionEvent::Remove { index: 0 }]);
    }

    #[test]
    fn reset_and_select_notify_without_reordering() {
        let mut collection = AlbumCollection::new();
        let events = recording(&mut collection);

        collection.reset(vec![album("a"), album("b")]);
        let selected = collection.select(1).expect("select").clone();

        assert_eq!(selected, album("b"));
        assert_eq!(collection.get(0), Some(&album("a")));
        assert_eq!(
            *events.borrow(),
            vec![CollectionEvent::Reset { len: 2 }, CollectionEvent::Select { index: 1 }]
        );
        assert!(collection.select(2).is_err());
    }
}
