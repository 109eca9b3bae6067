//! Column alias resolution.
//!
//! Source exports name their columns freely (`text`, `Sentiment`,
//! `createdAt`, ...). Each header is matched, case-insensitively and after
//! trimming, against a fixed table of lowercase aliases. Matching is exact;
//! there is no fuzzy or partial matching.
//!
//! # Precedence
//!
//! A header equal to a canonical field name always resolves to that field,
//! so `score` is the post score and `sentiment_score` the model score, which
//! is how the backend writes its reports. Other aliases are looked up in
//! table declaration order and the first canonical field listing one wins.
//!
//! Within a header row, canonical-name headers claim their fields before any
//! alias does. A header whose field is already taken becomes a pass-through
//! column. When that name equals a canonical field name or repeats an earlier
//! pass-through name it is renamed `<header>_2`, `<header>_3`, ... so it
//! never shadows a record field.

use std::collections::HashSet;

use crate::record::CanonicalField;

/// Bumped whenever an alias is added, removed, or moved between fields.
pub const ALIAS_TABLE_VERSION: u32 = 2;

/// Canonical field → accepted lowercase aliases, in precedence order.
pub const ALIASES: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::TextForAnalysis,
        &["text_for_analysis", "text", "content", "message"],
    ),
    (
        CanonicalField::CleanText,
        &["clean_text", "cleantext", "cleaned_text", "processed_text"],
    ),
    (CanonicalField::Sentiment, &["sentiment", "sentiment_label"]),
    (
        CanonicalField::SentimentScore,
        &["sentiment_score", "sentimentscore"],
    ),
    (
        CanonicalField::Nature,
        &["nature", "category", "classification"],
    ),
    (CanonicalField::Topic, &["topic", "topic_id"]),
    (CanonicalField::Dangerous, &["dangerous", "flagged", "risk"]),
    (
        CanonicalField::CreatedAt,
        &["created_at", "createdat", "created", "date", "timestamp"],
    ),
    (
        CanonicalField::Score,
        &["upvotes", "ups", "post_score", "engagement"],
    ),
    (CanonicalField::Subreddit, &["subreddit", "source", "community"]),
    (CanonicalField::Username, &["username", "user", "author"]),
    (CanonicalField::Url, &["url", "link", "source_url"]),
];

/// What a source header turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Canonical(CanonicalField),
    /// Unrecognized (or already-claimed) header, kept verbatim.
    Passthrough(String),
}

impl Column {
    /// The working field name: canonical name or the original header.
    pub fn name(&self) -> &str {
        match self {
            Column::Canonical(field) => field.as_str(),
            Column::Passthrough(header) => header,
        }
    }
}

/// Maps raw headers onto canonical fields using an alias table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver {
    table: &'static [(CanonicalField, &'static [&'static str])],
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self { table: ALIASES }
    }
}

impl ColumnResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a single header.
    pub fn resolve(&self, header: &str) -> Column {
        let lower = header.trim().to_lowercase();
        canonical_name(&lower)
            .or_else(|| {
                self.table
                    .iter()
                    .find(|(_, aliases)| aliases.iter().any(|alias| *alias == lower))
                    .map(|(field, _)| *field)
            })
            .map(Column::Canonical)
            .unwrap_or_else(|| Column::Passthrough(header.to_string()))
    }

    /// Resolve a header to its working name: the canonical field name, or
    /// the header unchanged when no alias matches.
    pub fn resolve_name(&self, header: &str) -> String {
        self.resolve(header).name().to_string()
    }

    /// Resolve a full header row.
    ///
    /// Headers spelled as a canonical field name claim that field first.
    /// Among the remaining headers the leftmost alias claims its field. Any
    /// header left over becomes a pass-through column whose name never
    /// collides with a canonical field or another pass-through column.
    pub fn resolve_headers<'h, I>(&self, headers: I) -> Vec<Column>
    where
        I: IntoIterator<Item = &'h str>,
    {
        let headers: Vec<&str> = headers.into_iter().collect();
        let mut claimed = HashSet::new();
        let mut columns: Vec<Option<Column>> = headers
            .iter()
            .map(|header| {
                canonical_name(&header.trim().to_lowercase())
                    .filter(|field| claimed.insert(*field))
                    .map(Column::Canonical)
            })
            .collect();

        let mut used = HashSet::new();
        for (slot, header) in columns.iter_mut().zip(&headers) {
            if slot.is_some() {
                continue;
            }
            let column = match self.resolve(header) {
                Column::Canonical(field) if claimed.insert(field) => Column::Canonical(field),
                _ => Column::Passthrough(passthrough_name(header, &mut used)),
            };
            *slot = Some(column);
        }
        columns.into_iter().flatten().collect()
    }
}

fn canonical_name(lower: &str) -> Option<CanonicalField> {
    CanonicalField::ALL
        .into_iter()
        .find(|field| field.as_str() == lower)
}

/// First of `header`, `header_2`, `header_3`, ... that names neither a
/// canonical field nor an already used pass-through column.
fn passthrough_name(header: &str, used: &mut HashSet<String>) -> String {
    let free = |name: &str, used: &HashSet<String>| {
        canonical_name(&name.trim().to_lowercase()).is_none() && !used.contains(name)
    };
    let name = if free(header, used) {
        header.to_string()
    } else {
        (2..)
            .map(|n| format!("{header}_{n}"))
            .find(|name| free(name.as_str(), used))
            .unwrap_or_else(|| header.to_string())
    };
    used.insert(name.clone());
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_resolves_to_its_field() {
        let resolver = ColumnResolver::new();
        for (field, aliases) in ALIASES {
            for alias in *aliases {
                for variant in [
                    alias.to_string(),
                    alias.to_uppercase(),
                    format!("  {alias}\t"),
                ] {
                    assert_eq!(
                        resolver.resolve(&variant),
                        Column::Canonical(*field),
                        "alias {variant:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn aliases_are_stored_lowercase() {
        for (_, aliases) in ALIASES {
            for alias in *aliases {
                assert_eq!(*alias, alias.to_lowercase());
            }
        }
    }

    #[test]
    fn every_canonical_field_has_an_entry() {
        for field in CanonicalField::ALL {
            assert!(ALIASES.iter().any(|(f, _)| *f == field), "{field}");
        }
    }

    #[test]
    fn canonical_names_resolve_to_themselves() {
        let resolver = ColumnResolver::new();
        for field in CanonicalField::ALL {
            assert_eq!(resolver.resolve_name(field.as_str()), field.as_str());
        }
    }

    #[test]
    fn score_and_sentiment_score_are_distinct() {
        let resolver = ColumnResolver::new();
        assert_eq!(
            resolver.resolve("Score"),
            Column::Canonical(CanonicalField::Score)
        );
        assert_eq!(
            resolver.resolve("upvotes"),
            Column::Canonical(CanonicalField::Score)
        );
        assert_eq!(
            resolver.resolve("sentimentScore"),
            Column::Canonical(CanonicalField::SentimentScore)
        );
    }

    #[test]
    fn mixed_case_headers() {
        let resolver = ColumnResolver::new();
        assert_eq!(resolver.resolve_name("createdAt"), "created_at");
        assert_eq!(resolver.resolve_name("Sentiment"), "sentiment");
        assert_eq!(resolver.resolve_name("Category"), "nature");
    }

    #[test]
    fn unknown_headers_pass_through_verbatim() {
        let resolver = ColumnResolver::new();
        assert_eq!(
            resolver.resolve(" Lang "),
            Column::Passthrough(" Lang ".into())
        );
        assert_eq!(resolver.resolve_name("post_id"), "post_id");
    }

    #[test]
    fn no_partial_matching() {
        let resolver = ColumnResolver::new();
        assert!(matches!(resolver.resolve("texts"), Column::Passthrough(_)));
        assert!(matches!(resolver.resolve("sentiment score"), Column::Passthrough(_)));
    }

    #[test]
    fn leftmost_duplicate_claims_the_field() {
        let resolver = ColumnResolver::new();
        let columns = resolver.resolve_headers(["sentimentscore", "sentiment", "text", "content"]);
        assert_eq!(
            columns,
            vec![
                Column::Canonical(CanonicalField::SentimentScore),
                Column::Canonical(CanonicalField::Sentiment),
                Column::Canonical(CanonicalField::TextForAnalysis),
                Column::Passthrough("content".into()),
            ]
        );
    }

    #[test]
    fn canonical_names_claim_before_aliases() {
        let resolver = ColumnResolver::new();
        let columns = resolver.resolve_headers([
            "clean_text",
            "upvotes",
            "score",
            "sentiment",
            "sentiment_score",
        ]);
        assert_eq!(
            columns,
            vec![
                Column::Canonical(CanonicalField::CleanText),
                Column::Passthrough("upvotes".into()),
                Column::Canonical(CanonicalField::Score),
                Column::Canonical(CanonicalField::Sentiment),
                Column::Canonical(CanonicalField::SentimentScore),
            ]
        );
    }

    #[test]
    fn leftover_headers_never_shadow_fields() {
        let resolver = ColumnResolver::new();
        let columns = resolver.resolve_headers([
            "sentiment_score",
            "sentiment_score",
            "post_id",
            "post_id",
            "sentiment_score_2",
        ]);
        let names: Vec<&str> = columns.iter().map(Column::name).collect();
        assert_eq!(
            names,
            vec![
                "sentiment_score",
                "sentiment_score_2",
                "post_id",
                "post_id_2",
                "sentiment_score_2_2",
            ]
        );
    }
}
