//! Derived views over a record collection.
//!
//! Every view is a flat, serializable list. The Aggregator only reads the
//! collection; an empty collection yields empty views, never an error.
//!
//! Ranked views (nature, topics, top words, subreddit views) sort by count
//! descending with a stable sort, so ties keep the order in which labels
//! were first seen. The sentiment view is not ranked and keeps first-seen
//! order. Date-based views skip records whose `created_at` cannot be
//! interpreted.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates;
use crate::record::{Record, Topic};
use crate::stopwords::StopWords;
use crate::tokenize::tokenize;

/// Default length of the top-words view.
pub const DEFAULT_TOP_WORDS: usize = 20;

/// Length of the ranked categorical views.
pub const CATEGORY_LIMIT: usize = 10;

/// Topic-view label for records without a topic.
pub const UNKNOWN_TOPIC: &str = "Unknown";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One bar or slice: a label and how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Records per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub count: usize,
}

/// Three-way sentiment split; labels outside the three land in `other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSplit {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub other: usize,
}

impl SentimentSplit {
    fn add(&mut self, sentiment: &str) {
        match sentiment.to_uppercase().as_str() {
            "POSITIVE" => self.positive += 1,
            "NEUTRAL" => self.neutral += 1,
            "NEGATIVE" => self.negative += 1,
            _ => self.other += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative + self.other
    }
}

/// Sentiment split for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    #[serde(flatten)]
    pub split: SentimentSplit,
}

/// Sentiment split for one nature label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatureSentiment {
    pub nature: String,
    #[serde(flatten)]
    pub split: SentimentSplit,
}

/// Posts in one (weekday, hour) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// `Mon` .. `Sun`
    pub day: String,
    pub hour: u32,
    pub count: usize,
}

/// Summed post score for one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    pub label: String,
    pub total: f64,
}

/// Everything the dashboard renders from one collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Views {
    pub sentiment: Vec<LabelCount>,
    pub nature: Vec<LabelCount>,
    pub topics: Vec<LabelCount>,
    pub timeline: Vec<TimelinePoint>,
    pub top_words: Vec<LabelCount>,
    pub dangerous: Vec<LabelCount>,
    pub sentiment_trend: Vec<TrendPoint>,
    pub nature_sentiment: Vec<NatureSentiment>,
    pub activity_heatmap: Vec<HeatmapCell>,
    pub subreddit_engagement: Vec<Engagement>,
    pub risky_subreddits: Vec<LabelCount>,
}

/// Insertion-ordered counter.
#[derive(Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<LabelCount>,
}

impl Tally {
    fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push(LabelCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    fn into_entries(self) -> Vec<LabelCount> {
        self.entries
    }

    fn into_top(self, limit: usize) -> Vec<LabelCount> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(limit);
        entries
    }
}

fn each<R: Borrow<Record>>(records: &[R]) -> impl Iterator<Item = &Record> {
    records.iter().map(|r| <R as Borrow<Record>>::borrow(r))
}

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Label used in the topic view.
pub fn topic_label(topic: &Topic) -> String {
    if topic.is_empty() {
        UNKNOWN_TOPIC.to_string()
    } else {
        topic.to_string()
    }
}

/// Builds [`Views`] from a record collection.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    stop_words: &'a StopWords,
    top_words: usize,
    reference: Option<DateTime<Utc>>,
}

impl Default for Aggregator<'static> {
    fn default() -> Self {
        Self::new(StopWords::english())
    }
}

impl<'a> Aggregator<'a> {
    pub fn new(stop_words: &'a StopWords) -> Self {
        Self {
            stop_words,
            top_words: DEFAULT_TOP_WORDS,
            reference: None,
        }
    }

    /// Length of the top-words view.
    pub fn with_top_words(mut self, limit: usize) -> Self {
        self.top_words = limit;
        self
    }

    /// Instant used for relative `created_at` values.
    pub fn with_reference_time(mut self, reference: DateTime<Utc>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Compute every view.
    pub fn aggregate<R: Borrow<Record>>(&self, records: &[R]) -> Views {
        let resolved = self.resolve_dates(records);
        let views = Views {
            sentiment: self.sentiment_distribution(records),
            nature: self.nature_distribution(records),
            topics: self.topic_distribution(records),
            timeline: timeline_from(&resolved),
            top_words: self.top_words(records),
            dangerous: self.dangerous_distribution(records),
            sentiment_trend: trend_from(records, &resolved),
            nature_sentiment: self.nature_sentiment(records),
            activity_heatmap: heatmap_from(&resolved),
            subreddit_engagement: self.subreddit_engagement(records),
            risky_subreddits: self.risky_subreddits(records),
        };
        debug!(
            records = records.len(),
            timeline_days = views.timeline.len(),
            words = views.top_words.len(),
            "aggregated views"
        );
        views
    }

    /// Count per upper-cased sentiment, in first-seen order.
    pub fn sentiment_distribution<R: Borrow<Record>>(&self, records: &[R]) -> Vec<LabelCount> {
        let mut tally = Tally::default();
        for r in each(records) {
            tally.add(&r.sentiment.to_uppercase());
        }
        tally.into_entries()
    }

    /// Ten most common nature labels.
    pub fn nature_distribution<R: Borrow<Record>>(&self, records: &[R]) -> Vec<LabelCount> {
        let mut tally = Tally::default();
        for r in each(records) {
            tally.add(&r.nature);
        }
        tally.into_top(CATEGORY_LIMIT)
    }

    /// Ten most common topics.
    pub fn topic_distribution<R: Borrow<Record>>(&self, records: &[R]) -> Vec<LabelCount> {
        let mut tally = Tally::default();
        for r in each(records) {
            tally.add(&topic_label(&r.topic));
        }
        tally.into_top(CATEGORY_LIMIT)
    }

    /// Records per calendar day, ascending.
    pub fn timeline<R: Borrow<Record>>(&self, records: &[R]) -> Vec<TimelinePoint> {
        timeline_from(&self.resolve_dates(records))
    }

    /// Most frequent words in `clean_text` across the collection.
    pub fn top_words<R: Borrow<Record>>(&self, records: &[R]) -> Vec<LabelCount> {
        let mut tally = Tally::default();
        for r in each(records) {
            for word in tokenize(&r.clean_text, self.stop_words) {
                tally.add(&word);
            }
        }
        tally.into_top(self.top_words)
    }

    /// Flagged versus safe posts; empty slices are omitted.
    pub fn dangerous_distribution<R: Borrow<Record>>(&self, records: &[R]) -> Vec<LabelCount> {
        let flagged = each(records).filter(|r| r.dangerous).count();
        let safe = records.len() - flagged;
        [("Flagged", flagged), ("Safe", safe)]
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(label, count)| LabelCount {
                label: label.to_string(),
                count,
            })
            .collect()
    }

    /// Sentiment split per day, ascending.
    pub fn sentiment_trend<R: Borrow<Record>>(&self, records: &[R]) -> Vec<TrendPoint> {
        trend_from(records, &self.resolve_dates(records))
    }

    /// Sentiment split for the ten natures with the most posts.
    pub fn nature_sentiment<R: Borrow<Record>>(&self, records: &[R]) -> Vec<NatureSentiment> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut rows: Vec<NatureSentiment> = Vec::new();
        for r in each(records) {
            let i = *index.entry(r.nature.as_str()).or_insert_with(|| {
                rows.push(NatureSentiment {
                    nature: r.nature.clone(),
                    split: SentimentSplit::default(),
                });
                rows.len() - 1
            });
            rows[i].split.add(&r.sentiment);
        }
        rows.sort_by(|a, b| b.split.total().cmp(&a.split.total()));
        rows.truncate(CATEGORY_LIMIT);
        rows
    }

    /// Posts per (weekday, hour), Monday first.
    pub fn activity_heatmap<R: Borrow<Record>>(&self, records: &[R]) -> Vec<HeatmapCell> {
        heatmap_from(&self.resolve_dates(records))
    }

    /// Ten subreddits with the highest summed score.
    pub fn subreddit_engagement<R: Borrow<Record>>(&self, records: &[R]) -> Vec<Engagement> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut rows: Vec<Engagement> = Vec::new();
        for r in each(records).filter(|r| !r.subreddit.is_empty()) {
            let i = *index.entry(r.subreddit.as_str()).or_insert_with(|| {
                rows.push(Engagement {
                    label: r.subreddit.clone(),
                    total: 0.0,
                });
                rows.len() - 1
            });
            rows[i].total += r.score;
        }
        rows.sort_by(|a, b| b.total.total_cmp(&a.total));
        rows.truncate(CATEGORY_LIMIT);
        rows
    }

    /// Ten subreddits with the most flagged posts.
    pub fn risky_subreddits<R: Borrow<Record>>(&self, records: &[R]) -> Vec<LabelCount> {
        let mut tally = Tally::default();
        for r in each(records).filter(|r| r.dangerous && !r.subreddit.is_empty()) {
            tally.add(&r.subreddit);
        }
        tally.into_top(CATEGORY_LIMIT)
    }

    fn resolve_dates<R: Borrow<Record>>(&self, records: &[R]) -> Vec<Option<DateTime<FixedOffset>>> {
        let now = self.reference.unwrap_or_else(Utc::now);
        each(records)
            .map(|r| dates::interpret_at(&r.created_at, now))
            .collect()
    }
}

fn timeline_from(resolved: &[Option<DateTime<FixedOffset>>]) -> Vec<TimelinePoint> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for dt in resolved.iter().flatten() {
        *days.entry(dt.date_naive()).or_default() += 1;
    }
    days.into_iter()
        .map(|(date, count)| TimelinePoint {
            date: day_key(date),
            count,
        })
        .collect()
}

fn trend_from<R: Borrow<Record>>(
    records: &[R],
    resolved: &[Option<DateTime<FixedOffset>>],
) -> Vec<TrendPoint> {
    let mut days: BTreeMap<NaiveDate, SentimentSplit> = BTreeMap::new();
    for (r, dt) in each(records).zip(resolved) {
        if let Some(dt) = dt {
            days.entry(dt.date_naive()).or_default().add(&r.sentiment);
        }
    }
    days.into_iter()
        .map(|(date, split)| TrendPoint {
            date: day_key(date),
            split,
        })
        .collect()
}

fn heatmap_from(resolved: &[Option<DateTime<FixedOffset>>]) -> Vec<HeatmapCell> {
    let mut cells: BTreeMap<(usize, u32), usize> = BTreeMap::new();
    for dt in resolved.iter().flatten() {
        let day = dt.weekday().num_days_from_monday() as usize;
        *cells.entry((day, dt.hour())).or_default() += 1;
    }
    cells
        .into_iter()
        .map(|((day, hour), count)| HeatmapCell {
            day: WEEKDAYS[day].to_string(),
            hour,
            count,
        })
        .collect()
}
