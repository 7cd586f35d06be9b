//! Submission scoring strategies for the vowelization harness.
//!
//! Each strategy grades one expected text against one vowelizer response
//! and yields the same breakdown shape the search harness reports:
//! applicable sub-scores plus a combined score.

use super::client::VowelizedResponse;

/// Word- and character-level sub-scores for one (expected, response) pair.
/// `None` marks a sub-score the active strategy does not produce.
#[derive(Debug, Clone, Copy)]
pub struct TextScore {
    pub words: Option<f64>,
    pub chars: Option<f64>,
    pub combined: f64,
}

pub trait ResponseScorer {
    fn score(&self, expected: &str, response: &VowelizedResponse) -> TextScore;
}

/// Whole-text equality, the plainest regression check.
pub struct ExactScorer;

impl ResponseScorer for ExactScorer {
    fn score(&self, expected: &str, response: &VowelizedResponse) -> TextScore {
        let combined = if expected.trim() == response.joined_words() {
            1.0
        } else {
            0.0
        };
        TextScore {
            words: None,
            chars: None,
            combined,
        }
    }
}

/// Positional word-by-word equality. A word-count mismatch fails the whole
/// line outright.
pub struct WordScorer;

impl ResponseScorer for WordScorer {
    fn score(&self, expected: &str, response: &VowelizedResponse) -> TextScore {
        let words = word_score(expected, response);
        TextScore {
            words: Some(words),
            chars: None,
            combined: words,
        }
    }
}

/// Word equality blended 50/50 with per-word character similarity. The
/// character half credits near misses (one wrong mark) that the word half
/// scores as plain failures.
pub struct BlendedScorer;

impl ResponseScorer for BlendedScorer {
    fn score(&self, expected: &str, response: &VowelizedResponse) -> TextScore {
        let expected_words: Vec<&str> = expected.split_whitespace().collect();
        let response_words = response.words();
        if expected_words.len() != response_words.len() {
            return TextScore {
                words: Some(0.0),
                chars: Some(0.0),
                combined: 0.0,
            };
        }

        let words = positional_match_fraction(&expected_words, &response_words);
        let chars = if expected_words.is_empty() {
            1.0
        } else {
            let total: f64 = expected_words
                .iter()
                .zip(response_words.iter())
                .map(|(left, right)| character_similarity(left, right))
                .sum();
            total / expected_words.len() as f64
        };

        TextScore {
            words: Some(words),
            chars: Some(chars),
            combined: (words + chars) / 2.0,
        }
    }
}

fn word_score(expected: &str, response: &VowelizedResponse) -> f64 {
    let expected_words: Vec<&str> = expected.split_whitespace().collect();
    let response_words = response.words();
    if expected_words.len() != response_words.len() {
        return 0.0;
    }

    positional_match_fraction(&expected_words, &response_words)
}

/// Equal-length word sequences compared position by position. Two empty
/// sequences are identical, hence perfect.
fn positional_match_fraction(expected: &[&str], response: &[&str]) -> f64 {
    if expected.is_empty() {
        return 1.0;
    }

    let matches = expected
        .iter()
        .zip(response.iter())
        .filter(|(left, right)| left == right)
        .count();
    matches as f64 / expected.len() as f64
}

/// `1 - levenshtein / max_len` over character counts, 1.0 for two empty
/// words.
fn character_similarity(left: &str, right: &str) -> f64 {
    let max_len = left.chars().count().max(right.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    1.0 - levenshtein(left, right) as f64 / max_len as f64
}

/// Single-row DP edit distance over characters.
fn levenshtein(left: &str, right: &str) -> usize {
    let right_len = right.chars().count();
    if left.is_empty() {
        return right_len;
    }

    let mut dp: Vec<usize> = (0..=right_len).collect();
    for (i, left_ch) in left.chars().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        for (j, right_ch) in right.chars().enumerate() {
            let temp = dp[j + 1];
            let cost = if left_ch == right_ch { 0 } else { 1 };
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
        }
    }

    dp[right_len]
}

/// Average a strategy's output over every expected alternative on the line.
pub fn score_against_alternatives(
    scorer: &dyn ResponseScorer,
    expected_results: &[String],
    response: &VowelizedResponse,
) -> TextScore {
    let scores: Vec<TextScore> = expected_results
        .iter()
        .map(|expected| scorer.score(expected, response))
        .collect();

    TextScore {
        words: mean_present(scores.iter().map(|score| score.words)),
        chars: mean_present(scores.iter().map(|score| score.chars)),
        combined: scores.iter().map(|score| score.combined).sum::<f64>() / scores.len() as f64,
    }
}

fn mean_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        return None;
    }

    Some(present.iter().sum::<f64>() / present.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::super::client::VowelizedResponse;
    use super::{
        BlendedScorer, ExactScorer, ResponseScorer, WordScorer, character_similarity, levenshtein,
        score_against_alternatives,
    };

    fn response_of(words: &[&str]) -> VowelizedResponse {
        let tokens = words
            .iter()
            .map(|word| {
                format!(
                    r#"{{"word": "{}", "options": ["{}"], "sep": false}}"#,
                    word, word
                )
            })
            .collect::<Vec<String>>()
            .join(",");
        VowelizedResponse::from_json(&format!("[{tokens}]")).expect("token list should parse")
    }

    #[test]
    fn exact_scorer_is_all_or_nothing() {
        let response = response_of(&["שָׁלוֹם", "עוֹלָם"]);
        assert_eq!(ExactScorer.score("שָׁלוֹם עוֹלָם", &response).combined, 1.0);
        assert_eq!(ExactScorer.score("שָׁלוֹם", &response).combined, 0.0);

        let score = ExactScorer.score("שָׁלוֹם עוֹלָם", &response);
        assert!(score.words.is_none());
        assert!(score.chars.is_none());
    }

    #[test]
    fn word_scorer_averages_positional_matches() {
        let response = response_of(&["אָלֶף", "בֵּית", "גִּימֶל"]);
        let score = WordScorer.score("אָלֶף בֵּית שִׁין", &response);
        let words = score.words.expect("word scorer always reports words");
        assert!((words - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(score.combined, words);
        assert!(score.chars.is_none());
    }

    #[test]
    fn word_count_mismatch_fails_the_line_even_for_near_identical_words() {
        let response = response_of(&["אָלֶף", "בֵּית"]);

        let word_score = WordScorer.score("אָלֶף", &response);
        assert_eq!(word_score.words, Some(0.0));

        let blended = BlendedScorer.score("אָלֶף", &response);
        assert_eq!(blended.words, Some(0.0));
        assert_eq!(blended.chars, Some(0.0));
        assert_eq!(blended.combined, 0.0);
    }

    #[test]
    fn blended_scorer_credits_near_misses_on_the_character_half() {
        // Second word differs by a single vowel mark.
        let response = response_of(&["טוֹב", "מְאֹד"]);
        let score = BlendedScorer.score("טוֹב מְאֹֽד", &response);

        let words = score.words.expect("blended reports words");
        let chars = score.chars.expect("blended reports chars");
        assert!((words - 0.5).abs() < 1e-12);
        assert!(chars > 0.5, "character half should credit the near miss");
        assert!((score.combined - (words + chars) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn levenshtein_counts_character_edits() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("שלום", "שלום"), 0);
        assert_eq!(levenshtein("שָלוֹם", "שלום"), 2);
    }

    #[test]
    fn character_similarity_is_normalized_by_the_longer_word() {
        assert_eq!(character_similarity("", ""), 1.0);
        assert_eq!(character_similarity("אב", "אב"), 1.0);
        assert!((character_similarity("אבגד", "אבג") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn alternatives_average_componentwise() {
        let response = response_of(&["טוֹב"]);
        let expected = vec!["טוֹב".to_string(), "רַע".to_string()];
        let score = score_against_alternatives(&WordScorer, &expected, &response);

        assert_eq!(score.words, Some(0.5));
        assert!(score.chars.is_none());
        assert_eq!(score.combined, 0.5);
    }
}
