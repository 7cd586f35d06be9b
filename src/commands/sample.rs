//! Regression sample generation.
//!
//! Turns a vowelized source text into harness input: each block becomes one
//! CSV row whose submission is the bare-letter form and whose expected
//! result is the vowelized form, cleaned of punctuation and meteg marks.

use std::fs;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use crate::cli::SampleArgs;
use crate::hebrew::{letters_only, single_spaced};
use crate::report::write_csv_report;

const SAMPLE_HEADER: [&str; 3] = ["submission", "placeholder", "expected_results"];

pub fn run(args: SampleArgs) -> Result<()> {
    info!(input = %args.input_path.display(), "reading source text");
    let raw = fs::read_to_string(&args.input_path)
        .with_context(|| format!("failed to read source text: {}", args.input_path.display()))?;

    let foreign = Regex::new(r"[A-Za-z0-9*\[\]!:();?']")
        .context("failed to compile foreign character regex")?;
    let cleaned = foreign.replace_all(&raw, "");

    let blocks = wrap_blocks(&cleaned, args.block_size);
    info!(blocks = blocks.len(), "blocks of text were read from input");

    let rows: Vec<Vec<String>> = blocks
        .iter()
        .map(|block| {
            vec![
                strip_block(block),
                "placeholder".to_string(),
                expected_block(block),
            ]
        })
        .collect();

    write_csv_report(&args.output_path, &SAMPLE_HEADER, &rows)?;
    info!(output = %args.output_path.display(), "sample file written");

    Ok(())
}

/// Greedy word wrap: blocks hold as many whole words as fit in
/// `block_size` characters; a single oversized word gets its own block.
fn wrap_blocks(text: &str, block_size: usize) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if !current.is_empty() && needed > block_size {
            blocks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// The unvowelized submission: bare letters, word structure intact.
fn strip_block(block: &str) -> String {
    let words: Vec<String> = block.split_whitespace().map(letters_only).collect();
    single_spaced(&words.join(" "))
}

/// The expected result: vowelized text minus sentence punctuation and
/// meteg marks.
fn expected_block(block: &str) -> String {
    let without_punctuation: String = block
        .chars()
        .filter(|ch| !matches!(ch, ',' | '.' | '"'))
        .collect();
    single_spaced(&remove_meteg(&without_punctuation))
}

/// A meteg rides on the vowel before it; both go.
fn remove_meteg(text: &str) -> String {
    let mut out: Vec<char> = Vec::new();
    for ch in text.chars() {
        if ch == '\u{05BD}' {
            out.pop();
            continue;
        }
        out.push(ch);
    }
    out.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::{expected_block, strip_block, wrap_blocks};

    #[test]
    fn blocks_respect_the_size_limit_and_never_split_words() {
        let text = "אחד שתים שלוש ארבע חמש";
        let blocks = wrap_blocks(text, 9);

        assert!(blocks.len() > 1);
        for block in &blocks {
            assert!(block.chars().count() <= 9, "oversized block: {block}");
            assert!(!block.starts_with(' ') && !block.ends_with(' '));
        }
        assert_eq!(blocks.join(" "), text);
    }

    #[test]
    fn oversized_single_word_gets_its_own_block() {
        let blocks = wrap_blocks("קצר ארוכהמאודמאודמאוד", 5);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "קצר");
    }

    #[test]
    fn stripped_block_is_letters_only() {
        assert_eq!(strip_block("בְּרֵאשִׁ֖ית בָּרָ֣א"), "בראשית ברא");
    }

    #[test]
    fn expected_block_keeps_nikud_but_drops_punctuation_and_meteg() {
        assert_eq!(expected_block("וַֽיְהִי־עֶרֶב, טוֹב."), "ויְהִי־עֶרֶב טוֹב");
    }
}
