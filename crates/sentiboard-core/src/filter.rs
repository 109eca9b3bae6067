//! Narrowing predicate over an already-ingested collection.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Criteria selected by a reader. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Exact sentiment label.
    pub sentiment: Option<String>,
    /// Any-of list of nature labels.
    #[serde(default)]
    pub nature: Vec<String>,
    /// Case-insensitive substring of `clean_text`.
    pub word: Option<String>,
    /// Keep only flagged posts, unless another criterion is set.
    #[serde(default)]
    pub dangerous_only: bool,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The flagged-posts list: dangerous posts by default, any post once
    /// another criterion narrows the view.
    pub fn flagged_view() -> Self {
        Self {
            dangerous_only: true,
            ..Self::default()
        }
    }

    pub fn with_sentiment(mut self, sentiment: impl Into<String>) -> Self {
        self.sentiment = Some(sentiment.into());
        self
    }

    pub fn with_nature(mut self, nature: impl Into<String>) -> Self {
        self.nature.push(nature.into());
        self
    }

    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word = Some(word.into());
        self
    }

    fn has_criteria(&self) -> bool {
        self.sentiment.is_some() || !self.nature.is_empty() || self.word.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.dangerous_only && !self.has_criteria()
    }

    pub fn matches(&self, record: &Record) -> bool {
        if self.dangerous_only && !record.dangerous && !self.has_criteria() {
            return false;
        }
        if let Some(sentiment) = &self.sentiment
            && record.sentiment != *sentiment
        {
            return false;
        }
        if !self.nature.is_empty() && !self.nature.iter().any(|n| *n == record.nature) {
            return false;
        }
        if let Some(word) = &self.word
            && !record.clean_text.to_lowercase().contains(&word.to_lowercase())
        {
            return false;
        }
        true
    }

    /// Matching records in source order.
    pub fn apply<'r>(&self, records: &'r [Record]) -> Vec<&'r Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        let rows = [
            ("Kashmir protests today", "Negative", "anti-india", true),
            ("Great win for the team", "Positive", "pro-india", false),
            ("Border news from kashmir", "Neutral", "neutral", false),
        ];
        rows.iter()
            .map(|(text, sentiment, nature, dangerous)| {
                let mut r = Record::with_defaults("2024-01-01T00:00:00.000Z");
                r.clean_text = text.to_string();
                r.sentiment = sentiment.to_string();
                r.nature = nature.to_string();
                r.dangerous = *dangerous;
                r
            })
            .collect()
    }

    fn texts(matched: &[&Record]) -> Vec<String> {
        matched.iter().map(|r| r.clean_text.clone()).collect()
    }

    #[test]
    fn empty_filter_matches_all() {
        let records = records();
        let filter = RecordFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&records).len(), 3);
    }

    #[test]
    fn word_is_case_insensitive() {
        let records = records();
        let matched = RecordFilter::new().with_word("KASHMIR").apply(&records);
        assert_eq!(
            texts(&matched),
            vec!["Kashmir protests today", "Border news from kashmir"]
        );
    }

    #[test]
    fn sentiment_is_exact() {
        let records = records();
        assert_eq!(RecordFilter::new().with_sentiment("Positive").apply(&records).len(), 1);
        assert!(RecordFilter::new().with_sentiment("POSITIVE").apply(&records).is_empty());
    }

    #[test]
    fn nature_is_any_of() {
        let records = records();
        let matched = RecordFilter::new()
            .with_nature("pro-india")
            .with_nature("neutral")
            .apply(&records);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn flagged_view_shows_dangerous_until_narrowed() {
        let records = records();
        let flagged = RecordFilter::flagged_view();
        assert!(!flagged.is_empty());
        assert_eq!(texts(&flagged.apply(&records)), vec!["Kashmir protests today"]);

        let narrowed = RecordFilter::flagged_view().with_sentiment("Positive");
        assert_eq!(texts(&narrowed.apply(&records)), vec!["Great win for the team"]);
    }
}
