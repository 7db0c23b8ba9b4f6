// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic local summary: leading sentences plus frequent keywords.

use indexmap::IndexMap;

/// Number of leading sentences kept in the excerpt.
pub const EXCERPT_SENTENCES: usize = 3;

/// Number of keywords listed after the excerpt.
pub const KEYWORD_COUNT: usize = 8;

/// Tokens ignored when ranking keywords.
pub const STOP_WORDS: [&str; 27] = [
    "の", "に", "は", "を", "が", "と", "で", "も", "へ", "や", "から", "まで", "より", "そして",
    "しかし", "また", "です", "ます", "する", "いる", "ある", "こと", "ため", "よう", "これ",
    "それ", "あれ",
];

fn is_sentence_end(c: char) -> bool {
    matches!(c, '。' | '.' | '!' | '?' | '\n')
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The first [`EXCERPT_SENTENCES`] non-empty sentences of the corpus.
///
/// Sentences are joined with `。`; `。…` is appended when more existed.
#[must_use]
pub fn excerpt(texts: &[String]) -> String {
    let joined = texts.join("\n");
    let sentences: Vec<&str> = joined
        .split(is_sentence_end)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let mut out = sentences
        .iter()
        .take(EXCERPT_SENTENCES)
        .copied()
        .collect::<Vec<_>>()
        .join("。");
    if sentences.len() > EXCERPT_SENTENCES {
        out.push_str("。…");
    }
    out
}

/// The `k` most frequent keywords of the corpus.
///
/// Text is lowercased and split on anything that is not a letter, digit or
/// underscore. Single-character tokens and [`STOP_WORDS`] are skipped. Ties
/// keep first-occurrence order.
#[must_use]
pub fn top_keywords(texts: &[String], k: usize) -> Vec<String> {
    let body = texts.join(" ").to_lowercase();
    let mut freq: IndexMap<&str, usize> = IndexMap::new();
    for token in body.split(|c: char| !is_token_char(c)) {
        if token.chars().nth(1).is_none() || STOP_WORDS.contains(&token) {
            continue;
        }
        *freq.entry(token).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = freq.into_iter().collect();
    // Stable, so equal counts stay in first-seen order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(k)
        .map(|(word, _)| word.to_owned())
        .collect()
}

/// Builds the local summary string for a cluster's texts.
///
/// ```rust
/// use kozaneba_summary::local_summary;
///
/// let texts = vec!["Rust is fast. Rust is safe.".to_string()];
/// assert_eq!(
///     local_summary(&texts),
///     "Summary: Rust is fast。Rust is safe\nKeywords: rust, is, fast, safe"
/// );
/// ```
#[must_use]
pub fn local_summary(texts: &[String]) -> String {
    let keywords = top_keywords(texts, KEYWORD_COUNT).join(", ");
    format!("Summary: {}\nKeywords: {keywords}", excerpt(texts))
}

#[cfg(test)]
mod tests {
    use super::{excerpt, local_summary, top_keywords};

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn excerpt_marks_omitted_sentences() {
        let t = texts(&["One. Two! Three? Four.", "Five"]);
        assert_eq!(excerpt(&t), "One。Two。Three。…");
    }

    #[test]
    fn excerpt_splits_on_japanese_full_stop_and_newlines() {
        let t = texts(&["駅前に駐輪場がほしい。バスを増やして", "  ", "夜道が暗い"]);
        assert_eq!(excerpt(&t), "駅前に駐輪場がほしい。バスを増やして。夜道が暗い");
    }

    #[test]
    fn excerpt_of_blank_corpus_is_empty() {
        assert_eq!(excerpt(&texts(&["", " . ! "])), "");
    }

    #[test]
    fn keywords_rank_by_frequency_then_first_occurrence() {
        let t = texts(&["beta alpha beta", "gamma alpha delta beta"]);
        assert_eq!(top_keywords(&t, 3), ["beta", "alpha", "gamma"]);
    }

    #[test]
    fn keywords_skip_short_tokens_and_stop_words() {
        let t = texts(&["a b それ これ 公園 公園 x_y"]);
        assert_eq!(top_keywords(&t, 8), ["公園", "x_y"]);
    }

    #[test]
    fn keywords_are_lowercased() {
        let t = texts(&["Bus BUS bus"]);
        assert_eq!(top_keywords(&t, 8), ["bus"]);
    }

    #[test]
    fn keyword_list_is_capped() {
        let words: Vec<String> = (0..20).map(|i| format!("word{i}")).collect();
        assert_eq!(top_keywords(&words, 8).len(), 8);
    }

    #[test]
    fn summary_is_byte_identical_across_calls() {
        let t = texts(&["Parks need shade. More benches please.", "Shade trees!"]);
        assert_eq!(local_summary(&t), local_summary(&t));
        assert!(local_summary(&t).starts_with("Summary: Parks need shade。"));
    }
}
