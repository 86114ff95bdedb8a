//! Session cache of liked track ids for fast lookup without API calls
//!
//! Seeded from the `is_liked` flags the server attaches to track payloads
//! and mutated only when a like toggle round-trips successfully. Lives for
//! the session; nothing is persisted.

use std::collections::HashSet;

use crate::model::track::Track;

#[derive(Clone, Debug, Default)]
pub struct LikedSet {
    ids: HashSet<String>,
}

impl LikedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_liked(&self, track_id: &str) -> bool {
        self.ids.contains(track_id)
    }

    pub fn add(&mut self, track_id: impl Into<String>) {
        self.ids.insert(track_id.into());
    }

    pub fn remove(&mut self, track_id: &str) {
        self.ids.remove(track_id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Pick up per-track liked flags from a freshly ingested page
    pub fn seed_from(&mut self, tracks: &[Track]) {
        for track in tracks {
            if track.liked {
                self.ids.insert(track.id.clone());
            }
        }
    }

    /// Sync a page's per-track flags with what this session already knows
    pub fn mark_tracks(&self, tracks: &mut [Track]) {
        for track in tracks.iter_mut() {
            track.liked = track.liked || self.ids.contains(&track.id);
        }
    }
}
