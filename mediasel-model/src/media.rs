use crate::ids::MediaSourceId;

#[cfg(feature = "chrono")]
use chrono::{DateTime, Utc};

/// One result produced by a media source for the current search.
///
/// The aggregation layer only counts these; the fields exist so fake and
/// real sources can hand over something meaningful to the rendering side.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Media {
    pub media_id: String,
    pub media_source_id: MediaSourceId,
    pub title: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub episode_range: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub size_bytes: Option<u64>,
    #[cfg(feature = "chrono")]
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub published_at: Option<DateTime<Utc>>,
}

impl Media {
    pub fn new(
        media_id: impl Into<String>,
        media_source_id: MediaSourceId,
        title: impl Into<String>,
    ) -> Self {
        Self {
            media_id: media_id.into(),
            media_source_id,
            title: title.into(),
            episode_range: None,
            size_bytes: None,
            #[cfg(feature = "chrono")]
            published_at: None,
        }
    }

    pub fn with_episode_range(mut self, range: impl Into<String>) -> Self {
        self.episode_range = Some(range.into());
        self
    }

    pub fn with_size_bytes(mut self, size: u64) -> Self {
        self.size_bytes = Some(size);
        self
    }

    #[cfg(feature = "chrono")]
    pub fn with_published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }
}
