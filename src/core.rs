use crate::collection::AlbumCollection;
use crate::error::PlayerError;
use crate::events::{CollectionEvent, PlayerEvent, SubscriptionId};
use crate::model::Album;
use crate::player::Player;
use tracing::{debug, info, warn};

/// Application context: the library, the playlist queued from it, and the
/// player navigating that playlist. Views receive this by reference.
#[derive(Debug, Default)]
pub struct Session {
    library: AlbumCollection,
    playlist: AlbumCollection,
    player: Player,
    // Library slot each playlist entry was queued from, parallel to `playlist`.
    origins: Vec<Option<usize>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn library(&self) -> &AlbumCollection {
        &self.library
    }

    pub fn playlist(&self) -> &AlbumCollection {
        &self.playlist
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn subscribe_library(
        &mut self,
        callback: impl FnMut(&CollectionEvent) + 'static,
    ) -> SubscriptionId {
        self.library.subscribe(callback)
    }

    pub fn subscribe_playlist(
        &mut self,
        callback: impl FnMut(&CollectionEvent) + 'static,
    ) -> SubscriptionId {
        self.playlist.subscribe(callback)
    }

    pub fn subscribe_player(&mut self, callback: impl FnMut(&PlayerEvent) + 'static) -> SubscriptionId {
        self.player.subscribe(callback)
    }

    /// Replaces the library contents. Albums without tracks cannot be
    /// navigated and are dropped. Returns how many albums were kept.
    pub fn reset_library(&mut self, albums: Vec<Album>) -> usize {
        let total = albums.len();
        let playable: Vec<Album> = albums
            .into_iter()
            .filter(|album| {
                let keep = !album.tracks.is_empty();
                if !keep {
                    warn!(album = %album.display_name(), "skipping album without tracks");
                }
                keep
            })
            .collect();

        let kept = playable.len();
        self.library.reset(playable);
        self.relink_playlist();
        info!(kept, skipped = total - kept, "library loaded");
        kept
    }

    /// Whether the library album at `index` is already in the playlist.
    pub fn is_queued(&self, index: usize) -> bool {
        self.origins.contains(&Some(index))
    }

    /// Queues the library album at `index` at the end of the playlist.
    /// Returns `false` when that library entry was already queued.
    pub fn queue_album(&mut self, index: usize) -> Result<bool, PlayerError> {
        let album = self.library.select(index)?.clone();
        if self.is_queued(index) {
            debug!(index, "library album already queued");
            return Ok(false);
        }

        let title = album.display_name();
        self.origins.push(Some(index));
        let position = self.playlist.add(album);
        info!(album = %title, position, "queued album");
        Ok(true)
    }

    pub fn remove_from_playlist(&mut self, index: usize) -> Result<Album, PlayerError> {
        let album = self.playlist.remove(index)?;
        self.origins.remove(index);
        self.player.album_removed(&self.playlist, index);
        info!(album = %album.display_name(), "removed album from playlist");
        Ok(album)
    }

    pub fn next_track(&mut self) -> Result<(), PlayerError> {
        self.player.next_track(&self.playlist)
    }

    pub fn prev_track(&mut self) -> Result<(), PlayerError> {
        self.player.prev_track(&self.playlist)
    }

    pub fn jump_to(&mut self, album_index: usize, track_index: usize) -> Result<(), PlayerError> {
        self.player.jump_to(&self.playlist, album_index, track_index)
    }

    pub fn play(&mut self) {
        self.player.play();
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn toggle(&mut self) {
        self.player.toggle();
    }

    pub fn current_album(&self) -> Result<&Album, PlayerError> {
        self.player.current_album(&self.playlist)
    }

    pub fn current_track_url(&self) -> Result<&str, PlayerError> {
        self.player.current_track_url(&self.playlist)
    }

    // After a reload each playlist entry points at the first unclaimed
    // library album equal to it, or at nothing.
    fn relink_playlist(&mut self) {
        let mut origins: Vec<Option<usize>> = Vec::with_capacity(self.playlist.len());
        for queued in self.playlist.iter() {
            let origin = (0..self.library.len()).find(|slot| {
                self.library.get(*slot) == Some(queued) && !origins.contains(&Some(*slot))
            });
            origins.push(origin);
        }
        self.origins = origins;
    }
}
