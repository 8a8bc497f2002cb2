//! Text Normalizer: turns extracted resume text into the cleaned corpus the scorer reads.

use crate::analysis::stopwords::is_stop_word;

/// Tokens this short never survive normalization.
const MIN_TOKEN_LEN: usize = 3;

/// Cleans raw text into a space-joined token string.
///
/// 1. Drops every character that is neither an ASCII letter nor whitespace.
///    Nothing is inserted in its place, so `node.js` becomes `nodejs`.
/// 2. Lowercases and splits on whitespace.
/// 3. Drops stop words and tokens of two characters or fewer.
/// 4. Rejoins survivors with single spaces, in original order.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();

    stripped
        .to_ascii_lowercase()
        .split_whitespace()
        .filter(|word| word.len() >= MIN_TOKEN_LEN && !is_stop_word(word))
        .collect::<Vec<_>>()
        .join(" ")
}
