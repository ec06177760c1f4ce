//! Channel records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::item::{resolve_timestamp, RawCount};
use crate::Result;

/// Loosely-typed channel record as received from the upstream data provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawChannel {
    #[serde(alias = "channel_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub subscriber_count: Option<RawCount>,
    pub video_count: Option<RawCount>,
    pub view_count: Option<RawCount>,
    pub created_at: Option<String>,
}

/// Channel owning one or more items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub subscriber_count: u64,
    /// Total uploads on the channel
    pub video_count: u64,
    /// Lifetime views across all uploads
    pub view_count: u64,
    /// `None` when the creation time is unknown
    pub created_at: Option<DateTime<Utc>>,
}

impl Channel {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subscriber_count: 0,
            video_count: 0,
            view_count: 0,
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_stats(mut self, subscribers: u64, videos: u64, views: u64) -> Self {
        self.subscriber_count = subscribers;
        self.video_count = videos;
        self.view_count = views;
        self
    }

    /// Average lifetime views per upload, only defined when the channel has uploads
    pub fn avg_views_per_video(&self) -> Option<f64> {
        if self.video_count > 0 {
            Some(self.view_count as f64 / self.video_count as f64)
        } else {
            None
        }
    }

    /// Build a channel from an upstream record; malformed counts default to 0
    pub fn from_raw(raw: &RawChannel, now: DateTime<Utc>) -> Result<Self> {
        let id = raw.id.clone().unwrap_or_default();
        let count = |value: &Option<RawCount>, field: &str| -> Result<u64> {
            match value {
                Some(v) => Ok(v.resolve(field)?.unwrap_or(0)),
                None => {
                    debug!("Channel '{}' has no {}, defaulting to 0", id, field);
                    Ok(0)
                }
            }
        };

        Ok(Self {
            subscriber_count: count(&raw.subscriber_count, "subscriber_count")?,
            video_count: count(&raw.video_count, "video_count")?,
            view_count: count(&raw.view_count, "view_count")?,
            created_at: resolve_timestamp(raw.created_at.as_deref(), "created_at", now),
            title: raw.title.clone().unwrap_or_default(),
            id,
        })
    }
}
