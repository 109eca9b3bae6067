use chrono::{DateTime, TimeZone, Utc};

use sentiboard_core::aggregate::CATEGORY_LIMIT;
use sentiboard_core::{Aggregator, Ingestor, LabelCount, Record, RecordFilter, StopWords, Summary};

const REPORT: &str = "\
text,Sentiment,category,created,dangerous
\"Great news today\",Positive,pro-india,2024-01-01,false
\"Scary threat post\",Negative,anti-india,3 days ago,true
,Neutral,neutral,2024-01-02,0
";

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap()
}

fn counts(view: &[LabelCount]) -> Vec<(&str, usize)> {
    view.iter().map(|lc| (lc.label.as_str(), lc.count)).collect()
}

#[test]
fn report_csv_to_views() {
    let records = Ingestor::new()
        .with_reference_time(reference())
        .ingest_csv(REPORT)
        .expect("report parses");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].sentiment, "Positive");
    assert_eq!(records[0].nature, "pro-india");
    assert!(!records[0].dangerous);
    assert!(records[1].dangerous);
    assert_eq!(records[1].created_at, "2024-03-12T08:30:00.000Z");

    let views = Aggregator::default()
        .with_reference_time(reference())
        .aggregate(&records);
    assert_eq!(counts(&views.sentiment), vec![("POSITIVE", 1), ("NEGATIVE", 1)]);
    assert_eq!(counts(&views.nature), vec![("pro-india", 1), ("anti-india", 1)]);
    assert_eq!(counts(&views.topics), vec![("Unknown", 2)]);
    let days: Vec<&str> = views.timeline.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(days, vec!["2024-01-01", "2024-03-12"]);
    assert_eq!(
        counts(&views.top_words),
        vec![("great", 1), ("news", 1), ("today", 1), ("scary", 1), ("threat", 1), ("post", 1)]
            .into_iter()
            .filter(|(w, _)| !StopWords::english().contains(w))
            .collect::<Vec<_>>()
    );
    assert_eq!(counts(&views.dangerous), vec![("Flagged", 1), ("Safe", 1)]);
}

#[test]
fn filtered_reaggregation_skips_ingestion() {
    let records = Ingestor::new()
        .with_reference_time(reference())
        .ingest_csv(REPORT)
        .unwrap();

    let narrowed = RecordFilter::new().with_word("threat").apply(&records);
    let views = Aggregator::default().aggregate(&narrowed);
    assert_eq!(counts(&views.sentiment), vec![("NEGATIVE", 1)]);

    let summary = Summary::of(&narrowed);
    assert_eq!(summary.total, 1);
    assert_eq!(summary.anti_india, 1);
}

#[test]
fn views_serialize_as_plain_lists() {
    let records = Ingestor::new()
        .with_reference_time(reference())
        .ingest_csv(REPORT)
        .unwrap();
    let views = Aggregator::default().aggregate(&records);
    let json = serde_json::to_value(&views).unwrap();
    assert_eq!(json["sentiment"][0]["label"], "POSITIVE");
    assert_eq!(json["sentiment"][0]["count"], 1);
    assert!(json["timeline"].is_array());
}

// ── Generated collections ───────────────────────────────────────────

/// Small deterministic generator so the bound checks cover many shapes.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next() as usize) % items.len()]
    }
}

const WORDS: &[&str] = &[
    "kashmir", "border", "election", "protest", "cricket", "budget", "monsoon", "tariff",
    "summit", "railway", "farmers", "startup", "the", "and", "is", "a", "to",
];

fn generated(seed: u64, len: usize) -> Vec<Record> {
    let mut rng = Lcg(seed);
    let sentiments = ["Positive", "negative", "NEUTRAL", "mixed", "Sarcastic"];
    (0..len)
        .map(|i| {
            let mut r = Record::with_defaults(format!("2024-01-{:02}T10:00:00.000Z", i % 28 + 1));
            r.clean_text = (0..6).map(|_| rng.pick(WORDS)).collect::<Vec<_>>().join(" ");
            r.sentiment = rng.pick(&sentiments).to_string();
            r.nature = format!("nature-{}", rng.next() % 25);
            r.topic = sentiboard_core::Topic::Id((rng.next() % 30) as i64);
            r.dangerous = rng.next() % 4 == 0;
            r
        })
        .collect()
}

#[test]
fn aggregation_totality_and_bounds() {
    let stop_words = StopWords::english();
    for (seed, len) in [(1, 0), (2, 1), (3, 17), (4, 250), (5, 1000)] {
        let records = generated(seed, len);
        for limit in [0, 5, 20] {
            let views = Aggregator::new(stop_words)
                .with_top_words(limit)
                .aggregate(&records);

            let total: usize = views.sentiment.iter().map(|lc| lc.count).sum();
            assert_eq!(total, records.len(), "seed {seed}");
            assert!(views.nature.len() <= CATEGORY_LIMIT);
            assert!(views.topics.len() <= CATEGORY_LIMIT);
            assert!(views.top_words.len() <= limit);
            assert!(views.top_words.windows(2).all(|w| w[0].count >= w[1].count));

            let timeline_total: usize = views.timeline.iter().map(|p| p.count).sum();
            assert_eq!(timeline_total, records.len());
        }
    }
}

#[test]
fn drop_rule_holds_for_every_row() {
    let cells = ["", " ", "\t", "word", " padded ", "x"];
    let mut csv = String::from("text\n");
    for cell in cells {
        csv.push_str(&format!("\"{cell}\"\n"));
    }
    let records = Ingestor::new().ingest_csv(&csv).unwrap();
    let kept: Vec<&str> = records.iter().map(|r| r.clean_text.as_str()).collect();
    assert_eq!(kept, vec!["word", " padded ", "x"]);
}
