//! Track payloads and their canonical in-app form
//!
//! The server reports tracks with two possible key fields: `id` for rows the
//! indexer owns and `remote_id` for tracks that only exist upstream.
//! Normalization happens exactly once, at the ingestion boundary; everything
//! past this module compares tracks by the single canonical `id` string.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Raw track payload as the server sends it. Field presence varies between
/// local library rows and upstream search hits, so everything is tolerant.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub is_cached: bool,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub is_liked: Option<bool>,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

/// Where a track's audio lives
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackSource {
    Local,
    Remote,
}

/// Canonical track used everywhere inside the app
#[derive(Clone, Debug)]
pub struct Track {
    /// First non-empty of the server's `id` / `remote_id`; stable across a
    /// render pass and across queue/context membership checks.
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub source: TrackSource,
    pub cached: bool,
    pub duration_secs: Option<u32>,
    pub thumbnail: Option<String>,
    pub liked: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl Track {
    /// Normalize a raw payload. Returns `None` when the track carries neither
    /// identifier, since such a row can never be played or matched again.
    pub fn from_api(raw: ApiTrack) -> Option<Self> {
        let id = non_empty(raw.id).or_else(|| non_empty(raw.remote_id))?;

        // The web front-end treated the literal string "null" as no artwork;
        // the server still emits it for some upstream rows.
        let thumbnail = raw
            .thumbnail
            .filter(|t| !t.is_empty() && t != "null");

        let source = match raw.source_type.as_deref() {
            Some("local") => TrackSource::Local,
            _ => TrackSource::Remote,
        };

        Some(Self {
            id,
            title: raw.title.unwrap_or_else(|| "Unknown Title".to_string()),
            artist: raw.artist.unwrap_or_else(|| "Unknown Artist".to_string()),
            album: raw.album.unwrap_or_default(),
            source,
            cached: raw.is_cached,
            duration_secs: raw.duration,
            thumbnail,
            liked: raw.is_liked.unwrap_or(false),
        })
    }

    /// Normalize a whole page, dropping id-less rows
    pub fn from_api_page(page: Vec<ApiTrack>) -> Vec<Self> {
        page.into_iter().filter_map(Track::from_api).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: Option<&str>, remote_id: Option<&str>) -> ApiTrack {
        ApiTrack {
            id: id.map(String::from),
            remote_id: remote_id.map(String::from),
            title: Some("Song".into()),
            ..Default::default()
        }
    }

    #[test]
    fn canonical_id_prefers_primary() {
        let track = Track::from_api(raw(Some("t1"), Some("r1"))).unwrap();
        assert_eq!(track.id, "t1");
    }

    #[test]
    fn canonical_id_falls_back_to_remote() {
        let track = Track::from_api(raw(None, Some("r1"))).unwrap();
        assert_eq!(track.id, "r1");

        let track = Track::from_api(raw(Some(""), Some("r1"))).unwrap();
        assert_eq!(track.id, "r1");
    }

    #[test]
    fn idless_rows_are_dropped() {
        assert!(Track::from_api(raw(None, None)).is_none());
        let page = vec![raw(Some("a"), None), raw(None, None), raw(None, Some("b"))];
        let tracks = Track::from_api_page(page);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, "a");
        assert_eq!(tracks[1].id, "b");
    }

    #[test]
    fn thumbnail_sentinels_become_none() {
        let mut r = raw(Some("t1"), None);
        r.thumbnail = Some("null".into());
        assert_eq!(Track::from_api(r).unwrap().thumbnail, None);

        let mut r = raw(Some("t1"), None);
        r.thumbnail = Some(String::new());
        assert_eq!(Track::from_api(r).unwrap().thumbnail, None);

        let mut r = raw(Some("t1"), None);
        r.thumbnail = Some("https://example.com/a.png".into());
        assert!(Track::from_api(r).unwrap().thumbnail.is_some());
    }

    #[test]
    fn source_type_mapping() {
        let mut r = raw(Some("t1"), None);
        r.source_type = Some("local".into());
        assert_eq!(Track::from_api(r).unwrap().source, TrackSource::Local);

        let mut r = raw(Some("t1"), None);
        r.source_type = Some("youtube".into());
        assert_eq!(Track::from_api(r).unwrap().source, TrackSource::Remote);
    }
}
