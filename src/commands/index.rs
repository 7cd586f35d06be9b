use std::fs;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use crate::cli::IndexArgs;
use crate::commands::search::{CorpusDocument, ensure_index_schema, upsert_document};

pub fn run(args: IndexArgs) -> Result<()> {
    if args.replace && args.index_path.exists() {
        fs::remove_file(&args.index_path).with_context(|| {
            format!("failed to remove existing index: {}", args.index_path.display())
        })?;
    }

    let connection = Connection::open(&args.index_path)
        .with_context(|| format!("failed to open index: {}", args.index_path.display()))?;
    configure_connection(&connection)?;
    ensure_index_schema(&connection)?;

    let raw = fs::read_to_string(&args.corpus_path)
        .with_context(|| format!("failed to read corpus: {}", args.corpus_path.display()))?;

    let mut inserted = 0_usize;
    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let document: CorpusDocument = serde_json::from_str(line).with_context(|| {
            format!(
                "failed to parse corpus line {} in {}",
                index + 1,
                args.corpus_path.display()
            )
        })?;
        upsert_document(&connection, &document)?;
        inserted += 1;
    }

    info!(
        corpus = %args.corpus_path.display(),
        index = %args.index_path.display(),
        documents = inserted,
        "index build finished"
    );

    Ok(())
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}
