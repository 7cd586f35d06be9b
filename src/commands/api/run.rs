use anyhow::Result;
use tracing::info;

use crate::cli::{ApiArgs, ScoringMode};
use crate::error::HarnessError;
use crate::report::{
    format_optional_score, format_score, summary_path_for, write_csv_report, write_run_summary,
    RunSummary,
};
use crate::varcsv::{RecordSchema, parse_varlines_file};

use super::client::{CommandVowelizer, Vowelizer};
use super::scoring::{
    BlendedScorer, ExactScorer, ResponseScorer, WordScorer, score_against_alternatives,
};

pub const SUBMISSION_FIXED_FIELDS: [&str; 2] = ["submission", "placeholder"];
pub const SUBMISSION_VARIABLE_FIELD: &str = "all_results";

const REPORT_HEADER: [&str; 4] = ["submission", "words_score", "chars_score", "final_score"];

pub fn submission_line_schema() -> RecordSchema {
    RecordSchema::new(&SUBMISSION_FIXED_FIELDS, SUBMISSION_VARIABLE_FIELD)
}

fn scorer_for(mode: ScoringMode) -> Box<dyn ResponseScorer> {
    match mode {
        ScoringMode::Exact => Box::new(ExactScorer),
        ScoringMode::Words => Box::new(WordScorer),
        ScoringMode::WordsChars => Box::new(BlendedScorer),
    }
}

pub fn run(args: ApiArgs) -> Result<()> {
    info!(input = %args.input_path.display(), "reading submission lines");
    let records =
        parse_varlines_file(&args.input_path, &submission_line_schema(), !args.no_header)?;
    info!(count = records.len(), "submission lines read from input");

    let vowelizer = CommandVowelizer::new(&args.vowelizer_cmd)?;
    let scorer = scorer_for(args.mode);
    info!(mode = args.mode.as_str(), "performing submissions and calculating results");

    let mut rows = Vec::with_capacity(records.len());
    let mut combined_scores = Vec::with_capacity(records.len());
    for record in &records {
        let submission = record.field("submission").unwrap_or_default().to_string();
        let expected_results = record.variable();
        if expected_results.is_empty() {
            return Err(HarnessError::MissingSubmissionExpectations { submission }.into());
        }

        let response = vowelizer.vowelize(&submission)?;
        let score = score_against_alternatives(scorer.as_ref(), expected_results, &response);

        combined_scores.push(score.combined);
        rows.push(vec![
            submission,
            format_optional_score(score.words),
            format_optional_score(score.chars),
            format_score(score.combined),
        ]);
    }

    write_csv_report(&args.report_path, &REPORT_HEADER, &rows)?;

    let summary = RunSummary::for_run(
        "api",
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
        "api regression finished"
    );

    Ok(())
}
