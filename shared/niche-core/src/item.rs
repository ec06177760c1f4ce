//! Video item records and their derived viral metrics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::duration::parse_iso8601_duration;
use crate::{NicheCoreError, Result};

/// A count as delivered by the upstream provider: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawCount {
    /// Resolve to an unsigned count.
    ///
    /// Negative values are a contract violation and return an error.
    /// Non-numeric text is a data fault and resolves to `None`.
    pub fn resolve(&self, field: &str) -> Result<Option<u64>> {
        let value = match self {
            RawCount::Integer(n) => *n as f64,
            RawCount::Float(f) => *f,
            RawCount::Text(s) => match s.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    warn!("Non-numeric {} '{}', treating as missing", field, s);
                    return Ok(None);
                }
            },
        };

        if !value.is_finite() {
            warn!("Non-finite {} value, treating as missing", field);
            return Ok(None);
        }
        if value < 0.0 {
            return Err(NicheCoreError::InvalidCount {
                field: field.to_string(),
                value: value.to_string(),
            });
        }

        Ok(Some(value as u64))
    }
}

/// Parse an RFC 3339 timestamp as produced by the upstream API (`2024-01-01T00:00:00Z`).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| NicheCoreError::UnparsableTimestamp(value.to_string()))
}

/// Resolve an optional raw timestamp; unparsable values are treated as `now`.
pub(crate) fn resolve_timestamp(
    raw: Option<&str>,
    field: &str,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match parse_timestamp(raw) {
        Ok(ts) => Some(ts),
        Err(e) => {
            warn!("{} for {}, treating as now", e, field);
            Some(now)
        }
    }
}

/// Loosely-typed item record as received from the upstream data provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    #[serde(alias = "id")]
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
    /// ISO 8601 duration (`PT45S`)
    pub duration: Option<String>,
    pub duration_seconds: Option<RawCount>,
    pub view_count: Option<RawCount>,
    pub like_count: Option<RawCount>,
    pub comment_count: Option<RawCount>,
    pub thumbnail_url: Option<String>,
    pub has_face: Option<bool>,
    pub face_confidence: Option<f64>,
}

/// A single short-form video record, immutable after ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Upstream video identifier
    pub id: String,

    pub title: String,

    pub description: String,

    /// Owning channel identifier (may be empty when unknown)
    pub channel_id: String,

    pub channel_title: String,

    /// Publish time; `None` when the provider omitted it
    pub published_at: Option<DateTime<Utc>>,

    pub duration_seconds: u32,

    /// `None` means the count was missing or malformed upstream
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,

    pub thumbnail_url: String,

    /// Face signal from the external detector
    pub has_face: bool,

    /// Detector confidence in [0, 1]
    pub face_confidence: f64,
}

impl Item {
    /// Create a new item with zero statistics
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            channel_id: String::new(),
            channel_title: String::new(),
            published_at: None,
            duration_seconds: 0,
            view_count: Some(0),
            like_count: Some(0),
            comment_count: Some(0),
            thumbnail_url: String::new(),
            has_face: false,
            face_confidence: 0.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    pub fn with_stats(mut self, views: u64, likes: u64, comments: u64) -> Self {
        self.view_count = Some(views);
        self.like_count = Some(likes);
        self.comment_count = Some(comments);
        self
    }

    pub fn with_face(mut self, has_face: bool, confidence: f64) -> Self {
        self.has_face = has_face;
        self.face_confidence = clamp_confidence(confidence);
        self
    }

    /// Build an item from an upstream record.
    ///
    /// Missing text fields default to empty, missing like/comment counts to 0.
    /// A missing view count or publish time is kept as `None` so the metrics
    /// stage can apply its default result. Unparsable timestamps become `now`.
    /// Negative counts are rejected.
    pub fn from_raw(raw: &RawItem, now: DateTime<Utc>) -> Result<Self> {
        let id = raw.video_id.clone().unwrap_or_else(|| {
            debug!("{}, defaulting to empty id", NicheCoreError::MissingField("video_id".into()));
            String::new()
        });

        let view_count = match &raw.view_count {
            Some(count) => count.resolve("view_count")?,
            None => {
                debug!("Item '{}' has no view_count", id);
                None
            }
        };
        let like_count = match &raw.like_count {
            Some(count) => count.resolve("like_count")?,
            None => Some(0),
        };
        let comment_count = match &raw.comment_count {
            Some(count) => count.resolve("comment_count")?,
            None => Some(0),
        };

        let duration_seconds = match (&raw.duration_seconds, &raw.duration) {
            (Some(seconds), _) => seconds
                .resolve("duration_seconds")?
                .map(|s| s.min(u32::MAX as u64) as u32)
                .unwrap_or(0),
            (None, Some(iso)) => parse_iso8601_duration(iso),
            (None, None) => 0,
        };

        Ok(Self {
            published_at: resolve_timestamp(raw.published_at.as_deref(), "published_at", now),
            title: raw.title.clone().unwrap_or_default(),
            description: raw.description.clone().unwrap_or_default(),
            channel_id: raw.channel_id.clone().unwrap_or_default(),
            channel_title: raw.channel_title.clone().unwrap_or_default(),
            duration_seconds,
            view_count,
            like_count,
            comment_count,
            thumbnail_url: raw.thumbnail_url.clone().unwrap_or_default(),
            has_face: raw.has_face.unwrap_or(false),
            face_confidence: clamp_confidence(raw.face_confidence.unwrap_or(0.0)),
            id,
        })
    }

    /// Whether every input the metrics stage needs is present
    pub fn has_complete_stats(&self) -> bool {
        self.published_at.is_some()
            && self.view_count.is_some()
            && self.like_count.is_some()
            && self.comment_count.is_some()
    }

    /// Title and description joined, the text used for clustering
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Viral metrics derived for one item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemMetrics {
    /// Composite score in [0, 100]
    pub viral_score: f64,
    pub views_per_day: f64,
    /// (likes + comments) / max(views, 1)
    pub engagement_ratio: f64,
    pub channel_age_days: i64,
    /// Always >= 1
    pub days_since_published: i64,
}

impl Default for ItemMetrics {
    /// The degrade-gracefully result used whenever inputs are missing or malformed
    fn default() -> Self {
        Self {
            viral_score: 0.0,
            views_per_day: 0.0,
            engagement_ratio: 0.0,
            channel_age_days: 365,
            days_since_published: 1,
        }
    }
}

/// An item together with its computed metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: Item,

    #[serde(flatten)]
    pub metrics: ItemMetrics,
}

impl ScoredItem {
    pub fn new(item: Item, metrics: ItemMetrics) -> Self {
        Self { item, metrics }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn viral_score(&self) -> f64 {
        self.metrics.viral_score
    }

    pub fn views(&self) -> u64 {
        self.item.view_count.unwrap_or(0)
    }

    pub fn likes(&self) -> u64 {
        self.item.like_count.unwrap_or(0)
    }

    pub fn comments(&self) -> u64 {
        self.item.comment_count.unwrap_or(0)
    }
}
