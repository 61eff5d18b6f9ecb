//! Playlist navigation state.
//!
//! The [`Player`] tracks a position inside a playlist as two counters, the
//! album index and the track index within that album, plus a playback flag.
//! Moving past either end of the playlist wraps around, so the position walks
//! a circular list of every `(album, track)` pair without ever flattening it.
//!
//! The player does not own the playlist; every operation that needs album
//! data borrows it.

use crate::collection::AlbumCollection;
use crate::error::PlayerError;
use crate::events::{Observers, PlayerEvent, SubscriptionId};
use crate::model::{Album, PlaybackState};
use tracing::debug;

#[derive(Debug, Default)]
pub struct Player {
    current_album_index: usize,
    current_track_index: usize,
    state: PlaybackState,
    observers: Observers<PlayerEvent>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&PlayerEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn current_album_index(&self) -> usize {
        self.current_album_index
    }

    pub fn current_track_index(&self) -> usize {
        self.current_track_index
    }

    pub fn position(&self) -> (usize, usize) {
        (self.current_album_index, self.current_track_index)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn play(&mut self) {
        self.set_state(PlaybackState::Playing);
    }

    pub fn pause(&mut self) {
        self.set_state(PlaybackState::Stopped);
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_stopped(&self) -> bool {
        !self.is_playing()
    }

    pub fn current_album<'a>(&self, playlist: &'a AlbumCollection) -> Result<&'a Album, PlayerError> {
        if playlist.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }

        playlist
            .get(self.current_album_index)
            .ok_or(PlayerError::AlbumOutOfRange {
                index: self.current_album_index,
                len: playlist.len(),
            })
    }

    pub fn current_track_url<'a>(&self, playlist: &'a AlbumCollection) -> Result<&'a str, PlayerError> {
        let album = self.current_album(playlist)?;
        album
            .track_url_at_index(self.current_track_index)
            .ok_or(PlayerError::TrackOutOfRange {
                index: self.current_track_index,
                len: album.track_count(),
            })
    }

    /// Steps back one track. From the first track of an album this lands on
    /// the last track of the previous album, wrapping from the first album to
    /// the last.
    pub fn prev_track(&mut self, playlist: &AlbumCollection) -> Result<(), PlayerError> {
        let album = self.current_album(playlist)?;

        if !album.is_first_track(self.current_track_index) {
            self.move_to(self.current_album_index, self.current_track_index - 1);
            return Ok(());
        }

        let album_index = if playlist.is_first_album(self.current_album_index) {
            playlist.len() - 1
        } else {
            self.current_album_index - 1
        };
        let track_index = playlist
            .get(album_index)
            .and_then(Album::last_track_index)
            .ok_or(PlayerError::EmptyAlbum { index: album_index })?;

        self.move_to(album_index, track_index);
        Ok(())
    }

    /// Steps forward one track. From the last track of an album this lands on
    /// the first track of the next album, wrapping from the last album to the
    /// first.
    pub fn next_track(&mut self, playlist: &AlbumCollection) -> Result<(), PlayerError> {
        let album = self.current_album(playlist)?;

        if !album.is_last_track(self.current_track_index) {
            self.move_to(self.current_album_index, self.current_track_index + 1);
            return Ok(());
        }

        let album_index = if playlist.is_last_album(self.current_album_index) {
            0
        } else {
            self.current_album_index + 1
        };
        if playlist
            .get(album_index)
            .is_none_or(|album| album.tracks.is_empty())
        {
            return Err(PlayerError::EmptyAlbum { index: album_index });
        }

        self.move_to(album_index, 0);
        Ok(())
    }

    pub fn jump_to(
        &mut self,
        playlist: &AlbumCollection,
        album_index: usize,
        track_index: usize,
    ) -> Result<(), PlayerError> {
        if playlist.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }

        let album = playlist
            .get(album_index)
            .ok_or(PlayerError::AlbumOutOfRange {
                index: album_index,
                len: playlist.len(),
            })?;
        if track_index >= album.track_count() {
            return Err(PlayerError::TrackOutOfRange {
                index: track_index,
                len: album.track_count(),
            });
        }

        self.move_to(album_index, track_index);
        Ok(())
    }

    /// Re-anchors the position after the album at `removed_index` was taken
    /// out of `playlist`. Removing the current album stops playback and moves
    /// to the first track of whichever album now holds its slot.
    pub fn album_removed(&mut self, playlist: &AlbumCollection, removed_index: usize) {
        if playlist.is_empty() {
            self.apply(0, 0, PlaybackState::Stopped);
            return;
        }

        let current = self.current_album_index;
        if removed_index < current {
            self.apply(current - 1, self.current_track_index, self.state);
        } else if removed_index == current {
            self.apply(current.min(playlist.len() - 1), 0, PlaybackState::Stopped);
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        self.apply(self.current_album_index, self.current_track_index, state);
    }

    fn move_to(&mut self, album_index: usize, track_index: usize) {
        self.apply(album_index, track_index, self.state);
        debug!(
            album = self.current_album_index,
            track = self.current_track_index,
            "player position"
        );
    }

    // All fields are written before the first notification goes out; one
    // event per field whose value changed.
    fn apply(&mut self, album_index: usize, track_index: usize, state: PlaybackState) {
        let mut events = Vec::with_capacity(3);

        if album_index != self.current_album_index {
            events.push(PlayerEvent::CurrentAlbumIndex {
                old: self.current_album_index,
                new: album_index,
            });
            self.current_album_index = album_index;
        }
        if track_index != self.current_track_index {
            events.push(PlayerEvent::CurrentTrackIndex {
                old: self.current_track_index,
                new: track_index,
            });
            self.current_track_index = track_index;
        }
        if state != self.state {
            events.push(PlayerEvent::State {
                old: self.state,
                new: state,
            });
            self.state = state;
        }

        self.observers.emit_all(&events);
    }
}
