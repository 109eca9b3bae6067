//! Stop-word table for the top-words view.
//!
//! The table is data: a plain text file with whitespace-separated words and
//! `#` comment lines. The English list ships with the crate; a deployment
//! can load its own file in the same format at startup.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::StopWordError;

const BUNDLED_ENGLISH: &str = include_str!("../data/stopwords_en.txt");

static ENGLISH: LazyLock<StopWords> = LazyLock::new(|| StopWords::parse(BUNDLED_ENGLISH));

/// An immutable set of lowercase stop words.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The bundled English table, parsed once per process.
    pub fn english() -> &'static StopWords {
        &ENGLISH
    }

    /// Parse a stop-word table. Words are lowercased; comments and blank
    /// lines are ignored.
    pub fn parse(text: &str) -> Self {
        let words = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#'))
            .flat_map(str::split_whitespace)
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    /// Load a table from disk.
    pub fn from_path(path: &Path) -> Result<Self, StopWordError> {
        let text = std::fs::read_to_string(path).map_err(|source| StopWordError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
