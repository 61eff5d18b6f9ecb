use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Track {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            metadata: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title when present, otherwise the last path segment of the url.
    pub fn display_name(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => self
                .url
                .rsplit('/')
                .find(|segment| !segment.is_empty())
                .unwrap_or(&self.url),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Album {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Album {
    pub fn new(title: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            title: Some(title.into()),
            artist: None,
            tracks,
            metadata: Map::new(),
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_first_track(&self, index: usize) -> bool {
        index == 0
    }

    /// Any index at or past the final track counts as last, so a stale index
    /// still lets `next_track` move on to the following album.
    pub fn is_last_track(&self, index: usize) -> bool {
        index >= self.tracks.len().saturating_sub(1)
    }

    pub fn last_track_index(&self) -> Option<usize> {
        self.tracks.len().checked_sub(1)
    }

    pub fn track_url_at_index(&self, index: usize) -> Option<&str> {
        self.tracks.get(index).map(|track| track.url.as_str())
    }

    pub fn display_name(&self) -> String {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or("Untitled");
        match self.artist.as_deref().map(str::trim) {
            Some(artist) if !artist.is_empty() => format!("{artist} - {title}"),
            _ => title.to_string(),
        }
    }
}
