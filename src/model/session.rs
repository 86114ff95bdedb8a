//! Owned session state
//!
//! Everything the coordinator and player index into lives here: the active
//! view tag, pagination state, the track-list context (the last rendered
//! list, which doubles as the index space for sequential playback), the
//! liked-id set, and UI state. The value is owned by whoever constructs it
//! and shared behind `Arc<Mutex<_>>`; there are no ambient globals.

use super::cache::LikedSet;
use super::search::SearchMeta;
use super::track::Track;
use super::types::{Playlist, UiState, UserProfile, View};

/// Everything a dispatched list request needs, captured under the lock so
/// the request itself runs without holding it.
#[derive(Clone, Debug)]
pub struct SearchDispatch {
    pub view: View,
    pub query: String,
    pub offset: usize,
    pub limit: usize,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct SessionState {
    pub view: View,
    pub search: SearchMeta,
    /// Ordered tracks most recently rendered for the active view
    pub context: Vec<Track>,
    pub liked: LikedSet,
    pub playlists: Vec<Playlist>,
    pub user: Option<UserProfile>,
    pub ui: UiState,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // View transitions
    // ------------------------------------------------------------------

    /// Switch to a non-paged or freshly loaded view. Invalidates any page
    /// response still in flight for the previous list.
    pub fn enter_view(&mut self, view: View, title: Option<String>) {
        self.search.invalidate();
        if matches!(view, View::Playlist(_)) {
            // Playlist views load in one shot; never page them.
            self.search.has_more = false;
        }
        self.view = view;
        self.ui.selected = 0;
        self.ui.view_title = title;
    }

    // ------------------------------------------------------------------
    // Search / pagination
    // ------------------------------------------------------------------

    /// First half of `perform_search`: guard, reset, view reclassification,
    /// and capture of the dispatch parameters. Returns `None` when a fetch
    /// is already in flight (the whole call is then a no-op).
    pub fn begin_search(&mut self, query: &str, append: bool) -> Option<SearchDispatch> {
        self.search.begin_fetch()?;

        if !append {
            self.search.reset(query);
            // An empty query on the home view stays home (popular tracks);
            // anything else is a search.
            if !(self.view == View::Home && query.is_empty()) {
                self.view = View::Search;
            }
        }

        self.ui.loading = true;
        Some(SearchDispatch {
            view: self.view.clone(),
            query: self.search.query.clone(),
            offset: self.search.offset,
            limit: self.search.limit,
            generation: self.search.generation(),
        })
    }

    /// Final step of `perform_search`: release the single-flight token and
    /// the loading indicator. Runs on every path.
    pub fn finish_search(&mut self) {
        self.search.finish_fetch();
        self.ui.loading = false;
    }

    /// Apply a received page if it is still current. `returned` is the raw
    /// response length (before id-less rows were dropped); the offset
    /// advances by it. Returns false for stale pages, which are discarded.
    pub fn apply_search_page(
        &mut self,
        generation: u64,
        returned: usize,
        tracks: Vec<Track>,
        append: bool,
    ) -> bool {
        if !self.search.is_current(generation) {
            tracing::debug!(generation, "Dropping stale page for abandoned view");
            return false;
        }
        self.search.record_page(returned);
        self.set_context(tracks, append);
        true
    }

    /// Replace or extend the track-list context
    pub fn set_context(&mut self, mut tracks: Vec<Track>, append: bool) {
        self.liked.mark_tracks(&mut tracks);
        self.liked.seed_from(&tracks);
        if append {
            self.context.extend(tracks);
        } else {
            self.context = tracks;
            self.ui.selected = 0;
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Row count of whatever list the main pane currently shows
    pub fn visible_len(&self) -> usize {
        match self.view {
            View::Library => self.playlists.len(),
            _ => self.context.len(),
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.queue_pane_focused {
            self.ui.queue_selected = self.ui.queue_selected.saturating_sub(1);
        } else {
            self.ui.selected = self.ui.selected.saturating_sub(1);
        }
    }

    pub fn move_selection_down(&mut self, queue_len: usize) {
        if self.ui.queue_pane_focused {
            if self.ui.queue_selected + 1 < queue_len {
                self.ui.queue_selected += 1;
            }
        } else if self.ui.selected + 1 < self.visible_len() {
            self.ui.selected += 1;
        }
    }

    pub fn selected_track(&self) -> Option<&Track> {
        if self.view == View::Library {
            return None;
        }
        self.context.get(self.ui.selected)
    }

    pub fn selected_playlist(&self) -> Option<&Playlist> {
        if self.view != View::Library {
            return None;
        }
        self.playlists.get(self.ui.selected)
    }

    // ------------------------------------------------------------------
    // Liked state
    // ------------------------------------------------------------------

    /// Record a confirmed like toggle: session set plus per-track flags in
    /// the current context.
    pub fn set_track_liked(&mut self, track_id: &str, liked: bool) {
        if liked {
            self.liked.add(track_id);
        } else {
            self.liked.remove(track_id);
        }
        for track in self.context.iter_mut().filter(|t| t.id == track_id) {
            track.liked = liked;
        }
    }

    /// 401 handling shared by every gated call site: prompt, touch nothing
    pub fn require_auth(&mut self, message: &str) {
        self.ui.auth_prompt = true;
        self.ui.show_toast(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::track::ApiTrack;

    fn track(id: &str) -> Track {
        Track::from_api(ApiTrack {
            id: Some(id.to_string()),
            title: Some(id.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn page(ids: &[&str]) -> Vec<Track> {
        ids.iter().map(|id| track(id)).collect()
    }

    #[test]
    fn non_append_search_resets_pagination_before_dispatch() {
        let mut session = SessionState::new();
        session.search.record_page(20);
        assert_eq!(session.search.offset, 20);

        let dispatch = session.begin_search("jazz", false).unwrap();
        assert_eq!(dispatch.offset, 0);
        assert!(session.search.has_more);
        assert_eq!(dispatch.query, "jazz");
        session.finish_search();
    }

    #[test]
    fn empty_query_on_home_stays_home() {
        let mut session = SessionState::new();
        let dispatch = session.begin_search("", false).unwrap();
        assert_eq!(dispatch.view, View::Home);
        session.finish_search();

        let dispatch = session.begin_search("jazz", false).unwrap();
        assert_eq!(dispatch.view, View::Search);
        session.finish_search();
    }

    #[test]
    fn non_home_view_reclassifies_to_search() {
        let mut session = SessionState::new();
        session.enter_view(View::Recent, None);
        let dispatch = session.begin_search("", false).unwrap();
        assert_eq!(dispatch.view, View::Search);
        assert_eq!(session.view, View::Search);
        session.finish_search();
    }

    #[test]
    fn fetch_in_flight_makes_search_a_noop() {
        let mut session = SessionState::new();
        assert!(session.begin_search("a", false).is_some());
        assert!(session.begin_search("b", false).is_none());
        // The blocked call must not have clobbered the active query
        assert_eq!(session.search.query, "a");
    }

    #[test]
    fn paging_scenario_twenty_then_five() {
        let mut session = SessionState::new();

        let d1 = session.begin_search("jazz", false).unwrap();
        let ids: Vec<String> = (0..20).map(|i| format!("t{i}")).collect();
        let tracks = page(&ids.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(session.apply_search_page(d1.generation, 20, tracks, false));
        session.finish_search();
        assert!(session.search.has_more);
        assert_eq!(session.search.offset, 20);

        let d2 = session.begin_search("jazz", true).unwrap();
        assert_eq!(d2.offset, 20);
        assert!(session.apply_search_page(d2.generation, 5, page(&["a", "b", "c", "d", "e"]), true));
        session.finish_search();
        assert_eq!(session.search.offset, 25);
        assert!(!session.search.has_more);
        assert_eq!(session.context.len(), 25);
    }

    #[test]
    fn stale_page_is_dropped_after_view_switch() {
        let mut session = SessionState::new();
        let dispatch = session.begin_search("jazz", false).unwrap();

        // User switches views before the response lands
        session.enter_view(View::Liked, Some("Liked Songs".into()));
        session.set_context(page(&["liked1"]), false);

        let applied = session.apply_search_page(dispatch.generation, 2, page(&["x", "y"]), false);
        session.finish_search();

        assert!(!applied);
        assert_eq!(session.context.len(), 1);
        assert_eq!(session.context[0].id, "liked1");
        // Guard still released
        assert!(!session.search.is_fetching);
    }

    #[test]
    fn append_preserves_selection_replace_resets_it() {
        let mut session = SessionState::new();
        session.set_context(page(&["a", "b", "c"]), false);
        session.ui.selected = 2;
        session.set_context(page(&["d"]), true);
        assert_eq!(session.ui.selected, 2);
        assert_eq!(session.context.len(), 4);

        session.set_context(page(&["e"]), false);
        assert_eq!(session.ui.selected, 0);
        assert_eq!(session.context.len(), 1);
    }

    #[test]
    fn entering_playlist_view_disables_paging() {
        let mut session = SessionState::new();
        session.enter_view(View::Playlist("p1".into()), Some("Mix".into()));
        assert!(!session.search.has_more);
    }

    #[test]
    fn liked_toggle_updates_set_and_context_flags() {
        let mut session = SessionState::new();
        session.set_context(page(&["t1", "t2"]), false);

        session.set_track_liked("t1", true);
        assert!(session.liked.is_liked("t1"));
        assert!(session.context[0].liked);

        session.set_track_liked("t1", false);
        assert!(!session.liked.is_liked("t1"));
        assert!(!session.context[0].liked);
    }

    #[test]
    fn require_auth_prompts_without_touching_liked_set() {
        let mut session = SessionState::new();
        session.liked.add("kept");
        session.require_auth("Log in to see your liked songs!");
        assert!(session.ui.auth_prompt);
        assert!(session.liked.is_liked("kept"));
        assert_eq!(session.liked.len(), 1);
    }
}
