//! Change notifications delivered to views.
//!
//! Emitters own an [`Observers`] registry and call [`Observers::emit`] only
//! after a mutation has fully completed. Delivery is synchronous and in
//! subscription order. A callback must not mutate the emitter that is
//! currently notifying it; there is no reentrancy guard.

use crate::model::PlaybackState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    CurrentAlbumIndex { old: usize, new: usize },
    CurrentTrackIndex { old: usize, new: usize },
    State { old: PlaybackState, new: PlaybackState },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    Add { index: usize },
    Remove { index: usize },
    Reset { len: usize },
    /// A view asked for the album at `index` to be queued.
    Select { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn FnMut(&E)>;

pub struct Observers<E> {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn emit_all(&mut self, events: &[E]) {
        for event in events {
            self.emit(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}
