//! SQLite-backed retrieval for the search harness.
//!
//! The index stores each document's raw text together with `parsed_text`,
//! its mark-stripped and whitespace-normalized form. Matching happens on
//! parsed text, so unvowelized queries find vowelized documents.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OpenFlags, params};
use serde::Deserialize;

use crate::hebrew::{remove_marks, single_spaced};

use super::types::{RetrievedHit, SearchBackend};

/// Phrase containment outranks any token-overlap score.
const PHRASE_BONUS: f64 = 1.0;

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusDocument {
    pub doc_id: String,
    pub doc_type: String,
    pub text: String,
}

pub struct SqliteSearchIndex {
    connection: Connection,
    key_column: &'static str,
}

impl SqliteSearchIndex {
    pub fn open_read_only(path: &Path, key_field: &str) -> Result<Self> {
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open index read-only: {}", path.display()))?;

        Self::from_connection(connection, key_field)
    }

    pub fn from_connection(connection: Connection, key_field: &str) -> Result<Self> {
        Ok(Self {
            connection,
            key_column: column_for_field(key_field)?,
        })
    }
}

impl SearchBackend for SqliteSearchIndex {
    fn search(
        &self,
        query: &str,
        doc_type: &str,
        filter: Option<(&str, &str)>,
        limit: usize,
    ) -> Result<Vec<RetrievedHit>> {
        let query_tokens = search_tokens(query);
        let query_phrase = query_tokens.join(" ");

        let (filter_clause, filter_value) = match filter {
            Some((field, value)) => (
                format!(" AND {} = ?2", column_for_field(field)?),
                value.to_string(),
            ),
            None => (" AND ?2 = ?2".to_string(), String::new()),
        };

        let sql = format!(
            "
            SELECT {key}, parsed_text
            FROM docs
            WHERE (?1 = '' OR doc_type = ?1){filter}
            ",
            key = self.key_column,
            filter = filter_clause,
        );

        let mut statement = self
            .connection
            .prepare(&sql)
            .context("failed to prepare search statement")?;
        let mut rows = statement.query(params![doc_type, filter_value])?;

        let mut hits = Vec::<RetrievedHit>::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let parsed_text: String = row.get(1)?;
            let score = relevance_score(&query_tokens, &query_phrase, &parsed_text);
            if score > 0.0 {
                hits.push(RetrievedHit { key, score });
            }
        }

        hits.sort_by(|left, right| {
            right
                .score
                .total_cmp(&left.score)
                .then(left.key.cmp(&right.key))
        });
        if hits.len() > limit {
            hits.truncate(limit);
        }

        Ok(hits)
    }
}

/// Filter fields map onto a fixed column list; anything else is rejected
/// before it can reach the SQL text.
fn column_for_field(field: &str) -> Result<&'static str> {
    match field {
        "doc_id" => Ok("doc_id"),
        "doc_type" => Ok("doc_type"),
        "text" => Ok("text"),
        "parsed_text" => Ok("parsed_text"),
        other => bail!("unsupported index field: '{}'", other),
    }
}

pub fn search_tokens(text: &str) -> Vec<String> {
    normalize_for_matching(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn normalize_for_matching(text: &str) -> String {
    let stripped: String = remove_marks(text)
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch.is_whitespace() || ch == '-' || ch == '\u{05BE}' {
                ch
            } else {
                ' '
            }
        })
        .collect();
    single_spaced(&stripped)
}

fn relevance_score(query_tokens: &[String], query_phrase: &str, parsed_text: &str) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }

    let doc_tokens: HashSet<&str> = parsed_text.split_whitespace().collect();
    let overlap = query_tokens
        .iter()
        .filter(|token| doc_tokens.contains(token.as_str()))
        .count();
    let base = overlap as f64 / query_tokens.len() as f64;

    if base > 0.0 && parsed_text.contains(query_phrase) {
        base + PHRASE_BONUS
    } else {
        base
    }
}

pub fn ensure_index_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS docs (
              doc_id TEXT PRIMARY KEY,
              doc_type TEXT NOT NULL,
              text TEXT NOT NULL,
              parsed_text TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_docs_doc_type ON docs(doc_type);
            ",
        )
        .context("failed to create index schema")
}

pub fn upsert_document(connection: &Connection, document: &CorpusDocument) -> Result<()> {
    let parsed_text = normalize_for_matching(&document.text);
    connection
        .execute(
            "
            INSERT INTO docs (doc_id, doc_type, text, parsed_text)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(doc_id) DO UPDATE SET
              doc_type=excluded.doc_type,
              text=excluded.text,
              parsed_text=excluded.parsed_text
            ",
            params![
                document.doc_id,
                document.doc_type,
                document.text,
                parsed_text
            ],
        )
        .with_context(|| format!("failed to upsert document '{}'", document.doc_id))?;

    Ok(())
}
