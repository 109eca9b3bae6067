//! Word extraction for frequency counting.

use std::sync::LazyLock;

use regex::Regex;

use crate::stopwords::StopWords;

/// Tokens this short or shorter are never counted.
pub const MIN_TOKEN_CHARS: usize = 3;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_\s]").expect("non-word pattern"));

/// Split `text` into countable words.
///
/// Lowercases, turns punctuation into spaces, splits on whitespace, then
/// drops short tokens and stop words. Only ASCII letters, digits and `_`
/// count as word characters; accented and non-Latin letters split words.
pub fn tokenize(text: &str, stop_words: &StopWords) -> Vec<String> {
    let lower = text.to_lowercase();
    let spaced = NON_WORD.replace_all(&lower, " ");
    spaced
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|word| !stop_words.contains(word))
        .map(str::to_string)
        .collect()
}
