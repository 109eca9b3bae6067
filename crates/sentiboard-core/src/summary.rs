//! Headline counts for a collection.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::record::Record;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub flagged: usize,
    pub pro_india: usize,
    pub anti_india: usize,
    /// Zero for an empty collection.
    pub mean_sentiment_score: f64,
}

impl Summary {
    pub fn of<R: Borrow<Record>>(records: &[R]) -> Self {
        let mut summary = Summary {
            total: records.len(),
            ..Summary::default()
        };
        let mut score_sum = 0.0;
        for r in records.iter().map(|r| <R as Borrow<Record>>::borrow(r)) {
            let nature = r.nature.to_lowercase();
            summary.flagged += usize::from(r.dangerous);
            summary.pro_india += usize::from(nature.contains("pro-india"));
            summary.anti_india += usize::from(nature.contains("anti-india"));
            score_sum += r.sentiment_score;
        }
        if summary.total > 0 {
            summary.mean_sentiment_score = score_sum / summary.total as f64;
        }
        summary
    }
}
