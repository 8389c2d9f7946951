//! Shared filename tokenizer.
//!
//! The classifier and the search index must tokenize identically, otherwise
//! a category learned from one spelling would never match at query time.

/// Splits text into lowercase word tokens. `-` and `_` count as separators.
pub fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
