//! Vowelization service client.
//!
//! The service is reached through an external command: the harness writes
//! the JSON payload `{"data": <submission>}` to its stdin and reads the
//! service's JSON token list from its stdout. Anything from a curl wrapper
//! to a local model runner fits behind that contract.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// One token of the vowelizer's response. Separator tokens carry
/// punctuation and spacing and take no part in scoring.
#[derive(Debug, Clone, Deserialize)]
pub struct VowelizedToken {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub sep: bool,
}

#[derive(Debug, Clone)]
pub struct VowelizedResponse {
    pub tokens: Vec<VowelizedToken>,
}

impl VowelizedResponse {
    pub fn from_json(raw: &str) -> Result<Self> {
        let tokens: Vec<VowelizedToken> =
            serde_json::from_str(raw).context("failed to parse vowelizer response")?;
        Ok(Self { tokens })
    }

    /// The scored word sequence: each non-separator token's first option,
    /// falling back to the raw word when the service offered none.
    pub fn words(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|token| !token.sep)
            .map(|token| {
                token
                    .options
                    .first()
                    .map(String::as_str)
                    .unwrap_or(token.word.as_str())
            })
            .collect()
    }

    pub fn joined_words(&self) -> String {
        self.words().join(" ")
    }
}

pub trait Vowelizer {
    fn vowelize(&self, submission: &str) -> Result<VowelizedResponse>;
}

pub struct CommandVowelizer {
    program: String,
    args: Vec<String>,
}

impl CommandVowelizer {
    pub fn new(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            bail!("vowelizer command is empty");
        };

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl Vowelizer for CommandVowelizer {
    fn vowelize(&self, submission: &str) -> Result<VowelizedResponse> {
        let payload = json!({ "data": submission }).to_string();
        debug!(program = %self.program, bytes = payload.len(), "submitting text to vowelizer");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn vowelizer command '{}'", self.program))?;

        child
            .stdin
            .take()
            .context("vowelizer stdin was not piped")?
            .write_all(payload.as_bytes())
            .context("failed to write payload to vowelizer")?;

        let output = child
            .wait_with_output()
            .with_context(|| format!("failed to run vowelizer command '{}'", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "vowelizer command '{}' returned non-zero exit status: {}",
                self.program,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        VowelizedResponse::from_json(stdout.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandVowelizer, VowelizedResponse};

    #[test]
    fn response_words_drop_separators_and_take_first_option() {
        let raw = r#"[
            {"word": "הנקדן", "options": ["הַנַּקְדָּן", "הֶנְקְדַן"], "sep": false},
            {"word": " ", "options": [], "sep": true},
            {"word": "טוב", "options": ["טוֹב"], "sep": false}
        ]"#;
        let response = VowelizedResponse::from_json(raw).expect("response should parse");

        assert_eq!(response.words(), ["הַנַּקְדָּן", "טוֹב"]);
        assert_eq!(response.joined_words(), "הַנַּקְדָּן טוֹב");
    }

    #[test]
    fn token_without_options_falls_back_to_the_raw_word() {
        let raw = r#"[{"word": "x", "options": [], "sep": false}]"#;
        let response = VowelizedResponse::from_json(raw).expect("response should parse");
        assert_eq!(response.words(), ["x"]);
    }

    #[test]
    fn malformed_response_is_an_error() {
        assert!(VowelizedResponse::from_json("not json").is_err());
    }

    #[test]
    fn command_line_splits_into_program_and_args() {
        let vowelizer =
            CommandVowelizer::new("curl -s -X POST http://localhost:8080/simplemodernnakdan")
                .expect("command line should parse");
        assert_eq!(vowelizer.program, "curl");
        assert_eq!(vowelizer.args.len(), 4);
    }

    #[test]
    fn empty_command_line_is_rejected() {
        assert!(CommandVowelizer::new("   ").is_err());
    }
}
