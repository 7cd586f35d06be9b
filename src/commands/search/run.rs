use anyhow::Result;
use tracing::info;

use crate::cli::SearchArgs;
use crate::report::{
    format_optional_score, format_score, summary_path_for, write_csv_report, write_run_summary,
    RunSummary,
};
use crate::varcsv::parse_varlines_file;

use super::backend::SqliteSearchIndex;
use super::scoring::score_query_line;
use super::types::{ComponentWeights, QueryLine, query_line_schema};

const REPORT_HEADER: [&str; 6] = ["query", "precision", "recall", "order", "negatives", "combined"];

pub fn run(args: SearchArgs) -> Result<()> {
    info!(input = %args.input_path.display(), "reading query lines");
    let records = parse_varlines_file(&args.input_path, &query_line_schema(), !args.no_header)?;
    info!(count = records.len(), "query lines read from input");

    let backend = SqliteSearchIndex::open_read_only(&args.index_path, &args.key_field)?;
    let weights = ComponentWeights {
        precision: args.precision_weight,
        recall: args.recall_weight,
        order: args.order_weight,
        negatives: args.negatives_weight,
    };

    info!("performing queries and calculating results");
    let mut rows = Vec::with_capacity(records.len());
    let mut combined_scores = Vec::with_capacity(records.len());
    for record in &records {
        let line = QueryLine::from_record(record);
        let breakdown = score_query_line(&backend, &args.key_field, &line, &weights)?;

        combined_scores.push(breakdown.combined);
        rows.push(vec![
            line.query,
            format_optional_score(breakdown.precision),
            format_optional_score(breakdown.recall),
            format_optional_score(breakdown.order),
            format_optional_score(breakdown.negatives),
            format_score(breakdown.combined),
        ]);
    }

    write_csv_report(&args.report_path, &REPORT_HEADER, &rows)?;

    let summary = RunSummary::for_run(
        "search",
        &args.input_path,
        &args.report_path,
        &combined_scores,
    )?;
    let summary_path = summary_path_for(&args.report_path, args.summary_path.as_deref());
    write_run_summary(&summary_path, &summary)?;

    info!(
        total_score = ?summary.mean_combined_score,
        perfect = summary.perfect_count,
        total = summary.record_count,
        report = %args.report_path.display(),
        "search regression finished"
    );

    Ok(())
}
