//! Plain-text report for the terminal.
//!
//! Renders the summary and the derived views as labelled sections, one
//! `label  value` line per entry. Empty sections are skipped.

use std::io::{self, Write};

use sentiboard_core::{LabelCount, Record, Summary, Views};

const MAX_FLAGGED: usize = 10;
const MAX_EXCERPT_CHARS: usize = 80;

// ── Public API ──

pub fn write_report<W: Write>(
    out: &mut W,
    summary: &Summary,
    views: &Views,
    flagged: &[&Record],
) -> io::Result<()> {
    writeln!(out, "=== Sentiment Report ===")?;
    writeln!(out)?;

    writeln!(out, "Summary")?;
    writeln!(out, "  {:<26} {}", "total posts", summary.total)?;
    writeln!(out, "  {:<26} {}", "flagged posts", summary.flagged)?;
    writeln!(out, "  {:<26} {}", "pro-india", summary.pro_india)?;
    writeln!(out, "  {:<26} {}", "anti-india", summary.anti_india)?;
    writeln!(
        out,
        "  {:<26} {:.3}",
        "mean sentiment score", summary.mean_sentiment_score
    )?;
    writeln!(out)?;

    write_counts(out, "Sentiment", &views.sentiment)?;
    write_counts(out, "Nature", &views.nature)?;
    write_counts(out, "Topics", &views.topics)?;
    write_counts(out, "Top Words", &views.top_words)?;
    write_counts(out, "Risky Subreddits", &views.risky_subreddits)?;

    if !views.timeline.is_empty() {
        writeln!(out, "Timeline")?;
        for point in &views.timeline {
            writeln!(out, "  {:<26} {}", point.date, point.count)?;
        }
        writeln!(out)?;
    }

    if !flagged.is_empty() {
        writeln!(out, "Flagged Posts ({})", flagged.len())?;
        for record in flagged.iter().take(MAX_FLAGGED) {
            let source = if record.subreddit.is_empty() {
                "-".to_string()
            } else {
                format!("r/{}", record.subreddit)
            };
            writeln!(out, "  {:<26} {}", source, excerpt(&record.clean_text))?;
        }
        if flagged.len() > MAX_FLAGGED {
            writeln!(out, "  ... and {} more", flagged.len() - MAX_FLAGGED)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

// ── Section rendering ──

fn write_counts<W: Write>(out: &mut W, header: &str, entries: &[LabelCount]) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(out, "{header}")?;
    for entry in entries {
        writeln!(out, "  {:<26} {}", entry.label, entry.count)?;
    }
    writeln!(out)
}

/// First line of `text`, cut to a readable width.
fn excerpt(text: &str) -> String {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    if line.chars().count() <= MAX_EXCERPT_CHARS {
        return line.to_string();
    }
    let cut: String = line.chars().take(MAX_EXCERPT_CHARS - 3).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiboard_core::{Aggregator, RecordFilter, parse_csv};

    fn render(csv: &str) -> String {
        let records = parse_csv(csv).unwrap();
        let views = Aggregator::default().aggregate(&records);
        let flagged = RecordFilter::flagged_view().apply(&records);
        let mut out = Vec::new();
        write_report(&mut out, &Summary::of(&records), &views, &flagged).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn report_has_sections() {
        let text = render(
            "text,sentiment,nature,dangerous,subreddit\n\
             Border tension rising,Negative,anti-india,true,worldnews\n\
             Cricket victory parade,Positive,pro-india,false,india\n",
        );
        assert!(text.contains("Summary"));
        assert!(text.contains(&format!("  {:<26} {}", "total posts", 2)));
        assert!(text.contains("Sentiment\n  NEGATIVE"));
        assert!(text.contains("Flagged Posts (1)"));
        assert!(text.contains("r/worldnews"));
        assert!(text.contains("Risky Subreddits"));
    }

    #[test]
    fn empty_sections_are_skipped() {
        let text = render("text\n");
        assert!(text.contains("total posts"));
        assert!(!text.contains("Sentiment\n"));
        assert!(!text.contains("Flagged Posts"));
    }

    #[test]
    fn long_text_is_cut() {
        let long = "word ".repeat(40);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), MAX_EXCERPT_CHARS);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("\n  short line \nsecond"), "short line");
    }
}
