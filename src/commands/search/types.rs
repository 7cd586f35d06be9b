use anyhow::Result;

use crate::varcsv::{RecordSchema, VarRecord};

pub const QUERY_FIXED_FIELDS: [&str; 3] = ["query", "doc_type", "prepended_negatives"];
pub const QUERY_VARIABLE_FIELD: &str = "all_results";

pub fn query_line_schema() -> RecordSchema {
    RecordSchema::new(&QUERY_FIXED_FIELDS, QUERY_VARIABLE_FIELD)
}

/// One parsed query row. The first `prepended_negatives` entries of
/// `all_results` are identifiers that must NOT be retrievable under a
/// targeted filter; the rest are positive expectations in target rank order.
#[derive(Debug, Clone)]
pub struct QueryLine {
    pub query: String,
    pub doc_type: String,
    pub prepended_negatives: usize,
    pub all_results: Vec<String>,
}

impl QueryLine {
    pub fn from_record(record: &VarRecord) -> Self {
        let all_results = record.variable().to_vec();
        let declared = parse_negative_count(record.field("prepended_negatives").unwrap_or(""));

        Self {
            query: record.field("query").unwrap_or_default().to_string(),
            doc_type: record.field("doc_type").unwrap_or_default().to_string(),
            prepended_negatives: declared.min(all_results.len()),
            all_results,
        }
    }

    pub fn negatives(&self) -> &[String] {
        &self.all_results[..self.prepended_negatives]
    }

    pub fn expected(&self) -> &[String] {
        &self.all_results[self.prepended_negatives..]
    }
}

/// A declared count that is not a plain digit string falls back to zero.
fn parse_negative_count(raw: &str) -> usize {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        trimmed.parse().unwrap_or(0)
    } else {
        0
    }
}

/// Per-query score breakdown. `None` marks a sub-score that was not
/// applicable for this record; `combined` is always computable.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub order: Option<f64>,
    pub negatives: Option<f64>,
    pub combined: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ComponentWeights {
    pub precision: f64,
    pub recall: f64,
    pub order: f64,
    pub negatives: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            precision: 0.3,
            recall: 0.4,
            order: 0.1,
            negatives: 0.3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetrievedHit {
    pub key: String,
    pub score: f64,
}

/// Retrieval capability consumed by the scorer. Results are sorted by
/// descending relevance with a deterministic tie-break. An empty `doc_type`
/// searches every type; `filter` restricts matches to one (field, value)
/// pair and is how negative expectations are probed.
pub trait SearchBackend {
    fn search(
        &self,
        query: &str,
        doc_type: &str,
        filter: Option<(&str, &str)>,
        limit: usize,
    ) -> Result<Vec<RetrievedHit>>;
}

#[cfg(test)]
mod tests {
    use super::{QueryLine, parse_negative_count, query_line_schema};
    use crate::varcsv::parse_varlines_file;
    use std::io::Write;

    #[test]
    fn negative_count_defaults_to_zero_for_non_digit_strings() {
        assert_eq!(parse_negative_count("3"), 3);
        assert_eq!(parse_negative_count(" 2 "), 2);
        assert_eq!(parse_negative_count(""), 0);
        assert_eq!(parse_negative_count("x"), 0);
        assert_eq!(parse_negative_count("-1"), 0);
        assert_eq!(parse_negative_count("+1"), 0);
        assert_eq!(parse_negative_count("1.5"), 0);
    }

    #[test]
    fn declared_count_is_clamped_to_result_list_length() {
        let path = std::env::temp_dir().join("nikud-regress-types-clamp.csv");
        let mut file = std::fs::File::create(&path).expect("fixture file should be writable");
        file.write_all("q,small,10,a,b,c\n".as_bytes())
            .expect("fixture content should write");

        let records = parse_varlines_file(&path, &query_line_schema(), false)
            .expect("fixture should parse");
        let line = QueryLine::from_record(&records[0]);

        assert_eq!(line.prepended_negatives, 3);
        assert_eq!(line.negatives(), ["a", "b", "c"]);
        assert!(line.expected().is_empty());
    }

    #[test]
    fn results_split_between_negatives_and_expected() {
        let path = std::env::temp_dir().join("nikud-regress-types-split.csv");
        let mut file = std::fs::File::create(&path).expect("fixture file should be writable");
        file.write_all("q,,1,n1,p1,p2\n".as_bytes())
            .expect("fixture content should write");

        let records = parse_varlines_file(&path, &query_line_schema(), false)
            .expect("fixture should parse");
        let line = QueryLine::from_record(&records[0]);

        assert_eq!(line.doc_type, "");
        assert_eq!(line.negatives(), ["n1"]);
        assert_eq!(line.expected(), ["p1", "p2"]);
    }
}
