//! The canonical record: one analysed post, fully defaulted.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default sentiment label when the source has none.
pub const DEFAULT_SENTIMENT: &str = "NEUTRAL";

/// Default nature label when the source has none.
pub const DEFAULT_NATURE: &str = "neutral";

/// The fixed set of fields the pipeline understands.
///
/// Declaration order matches the alias table and the Arrow schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    TextForAnalysis,
    CleanText,
    Sentiment,
    SentimentScore,
    Nature,
    Topic,
    Dangerous,
    CreatedAt,
    Score,
    Subreddit,
    Username,
    Url,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 12] = [
        Self::TextForAnalysis,
        Self::CleanText,
        Self::Sentiment,
        Self::SentimentScore,
        Self::Nature,
        Self::Topic,
        Self::Dangerous,
        Self::CreatedAt,
        Self::Score,
        Self::Subreddit,
        Self::Username,
        Self::Url,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextForAnalysis => "text_for_analysis",
            Self::CleanText => "clean_text",
            Self::Sentiment => "sentiment",
            Self::SentimentScore => "sentiment_score",
            Self::Nature => "nature",
            Self::Topic => "topic",
            Self::Dangerous => "dangerous",
            Self::CreatedAt => "created_at",
            Self::Score => "score",
            Self::Subreddit => "subreddit",
            Self::Username => "username",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic identifier: numeric when the source value is an integer, free text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Topic {
    Id(i64),
    Label(String),
}

impl Topic {
    /// True for the empty-label default.
    pub fn is_empty(&self) -> bool {
        matches!(self, Topic::Label(l) if l.is_empty())
    }
}

impl Default for Topic {
    fn default() -> Self {
        Topic::Label(String::new())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Id(id) => write!(f, "{id}"),
            Topic::Label(label) => f.write_str(label),
        }
    }
}

/// A normalized post.
///
/// Known fields are always populated. Columns the pipeline does not
/// recognize are carried in `extra` under their original header, in
/// source column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub text_for_analysis: String,
    pub clean_text: String,
    pub sentiment: String,
    pub sentiment_score: f64,
    pub nature: String,
    pub topic: Topic,
    pub dangerous: bool,
    /// ISO 8601 timestamp string.
    pub created_at: String,
    pub score: f64,
    pub subreddit: String,
    pub username: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// A record with every field at its documented default.
    ///
    /// `created_at` has no static default; the caller supplies the
    /// ingestion timestamp.
    pub fn with_defaults(created_at: impl Into<String>) -> Self {
        Self {
            text_for_analysis: String::new(),
            clean_text: String::new(),
            sentiment: DEFAULT_SENTIMENT.to_string(),
            sentiment_score: 0.0,
            nature: DEFAULT_NATURE.to_string(),
            topic: Topic::default(),
            dangerous: false,
            created_at: created_at.into(),
            score: 0.0,
            subreddit: String::new(),
            username: String::new(),
            url: String::new(),
            extra: Map::new(),
        }
    }

    /// Whether this record survives the empty-content drop rule.
    pub fn has_content(&self) -> bool {
        !self.clean_text.trim().is_empty()
    }
}
