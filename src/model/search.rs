//! Pagination state for incrementally loaded track lists
//!
//! One `SearchMeta` drives all paged views. The `is_fetching` flag is a
//! mutual-exclusion token that keeps at most one list request outstanding;
//! it is acquired through [`SearchMeta::begin_fetch`] and must be released
//! through [`SearchMeta::finish_fetch`] on every path, success or failure.

pub const PAGE_LIMIT: usize = 20;

#[derive(Clone, Debug)]
pub struct SearchMeta {
    pub query: String,
    pub offset: usize,
    pub limit: usize,
    pub is_fetching: bool,
    pub has_more: bool,
    generation: u64,
}

impl Default for SearchMeta {
    fn default() -> Self {
        Self {
            query: String::new(),
            offset: 0,
            limit: PAGE_LIMIT,
            is_fetching: false,
            has_more: true,
            generation: 0,
        }
    }
}

impl SearchMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fresh (non-append) load: rewind pagination and take the new query.
    /// Bumps the generation so any response still in flight for the previous
    /// list is dropped on arrival.
    pub fn reset(&mut self, query: &str) {
        self.offset = 0;
        self.has_more = true;
        self.query = query.to_string();
        self.generation += 1;
    }

    /// Invalidate in-flight responses without touching the query (used when
    /// the view changes to a non-paged list)
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Acquire the single-flight token. Returns the generation the caller
    /// must present when applying the page, or `None` if a fetch is already
    /// outstanding.
    pub fn begin_fetch(&mut self) -> Option<u64> {
        if self.is_fetching {
            return None;
        }
        self.is_fetching = true;
        Some(self.generation)
    }

    /// Release the single-flight token. Always runs, even for stale or
    /// failed responses.
    pub fn finish_fetch(&mut self) {
        self.is_fetching = false;
    }

    /// Account for a received page. `returned` is the raw response length:
    /// the offset advances by what actually came back, and a short page
    /// means the list is exhausted. A page that exactly fills the limit
    /// keeps `has_more` true even when it happens to be the last one; the
    /// follow-up fetch then comes back empty and clears it.
    pub fn record_page(&mut self, returned: usize) {
        self.has_more = returned == self.limit;
        self.offset += returned;
    }

    /// True when a response started under `generation` may still be applied
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_rewinds_pagination() {
        let mut meta = SearchMeta::new();
        meta.offset = 40;
        meta.has_more = false;
        meta.reset("jazz");
        assert_eq!(meta.offset, 0);
        assert!(meta.has_more);
        assert_eq!(meta.query, "jazz");
    }

    #[test]
    fn single_flight_guard() {
        let mut meta = SearchMeta::new();
        let ticket = meta.begin_fetch();
        assert!(ticket.is_some());
        assert!(meta.begin_fetch().is_none());
        meta.finish_fetch();
        assert!(meta.begin_fetch().is_some());
    }

    #[test]
    fn has_more_tracks_full_pages_only() {
        let mut meta = SearchMeta::new();
        meta.record_page(PAGE_LIMIT);
        assert!(meta.has_more);
        meta.record_page(PAGE_LIMIT - 1);
        assert!(!meta.has_more);
        meta.record_page(0);
        assert!(!meta.has_more);
    }

    #[test]
    fn offset_advances_by_returned_count() {
        let mut meta = SearchMeta::new();
        meta.record_page(20);
        meta.record_page(5);
        // 20 then 5 items with a page size of 20 leaves offset 25, not 40
        assert_eq!(meta.offset, 25);
        assert!(!meta.has_more);
    }

    #[test]
    fn stale_generation_detected_after_reset() {
        let mut meta = SearchMeta::new();
        let ticket = meta.begin_fetch().unwrap();
        meta.finish_fetch();
        meta.reset("new query");
        assert!(!meta.is_current(ticket));
        assert!(meta.is_current(meta.generation()));
    }
}
