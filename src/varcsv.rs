//! Variable-arity CSV records.
//!
//! Input files for both harnesses share one shape: N fixed columns bound to
//! declared field names, then any number of trailing columns that form one
//! variable-length field. A line ending right after the N-th column yields
//! an empty trailing sequence; a line ending with a comma yields a sequence
//! holding one empty string.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::HarnessError;

#[derive(Debug, Clone)]
pub struct RecordSchema {
    fixed: Vec<String>,
    variable: String,
}

impl RecordSchema {
    pub fn new(fixed: &[&str], variable: &str) -> Self {
        Self {
            fixed: fixed.iter().map(|name| name.to_string()).collect(),
            variable: variable.to_string(),
        }
    }

    pub fn fixed_len(&self) -> usize {
        self.fixed.len()
    }

    pub fn variable_name(&self) -> &str {
        &self.variable
    }
}

#[derive(Debug, Clone)]
pub struct VarRecord {
    fixed: Vec<(String, String)>,
    variable: Vec<String>,
}

impl VarRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fixed
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn variable(&self) -> &[String] {
        &self.variable
    }
}

/// Parse a whole input file into records, in file order.
///
/// Record numbers in errors are 1-based and count data records, i.e. the
/// first line after a skipped header is record 1. Arity is validated here;
/// field content is not.
pub fn parse_varlines_file(
    path: &Path,
    schema: &RecordSchema,
    skip_header: bool,
) -> Result<Vec<VarRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file: {}", path.display()))?;

    let mut lines = raw.lines();
    if skip_header {
        lines.next();
    }

    let mut records = Vec::new();
    for (index, line) in lines.enumerate() {
        let number = index + 1;
        let mut values = split_csv_line(line);
        for value in &mut values {
            *value = value.trim().to_string();
        }

        if values.len() < schema.fixed_len() {
            return Err(HarnessError::MalformedRecord {
                file: path.to_path_buf(),
                line: number,
                expected: schema.fixed_len(),
                found: values.len(),
            }
            .into());
        }

        let variable = values.split_off(schema.fixed_len());
        let fixed = schema.fixed.iter().cloned().zip(values).collect();
        records.push(VarRecord { fixed, variable });
    }

    debug!(
        file = %path.display(),
        fixed = schema.fixed_len(),
        variable = schema.variable_name(),
        records = records.len(),
        "parsed variable-arity csv"
    );

    Ok(records)
}

/// Split one physical line on commas, honoring double-quoted fields and
/// `""` escapes. An empty line has no fields at all.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    if line.is_empty() {
        return fields;
    }

    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            }
        }
    }
    fields.push(current);

    fields
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{RecordSchema, parse_varlines_file, split_csv_line};
    use crate::error::HarnessError;

    fn write_fixture(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("nikud-regress-varcsv-{name}"));
        let mut file = std::fs::File::create(&path).expect("fixture file should be writable");
        file.write_all(content.as_bytes())
            .expect("fixture content should write");
        path
    }

    fn schema() -> RecordSchema {
        RecordSchema::new(&["field1", "field2"], "varfield")
    }

    #[test]
    fn split_honors_quotes_and_escapes() {
        assert_eq!(split_csv_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_csv_line(r#""a,b",c"#), vec!["a,b", "c"]);
        assert_eq!(split_csv_line(r#""he said ""hi""",x"#), vec![
            r#"he said "hi""#,
            "x"
        ]);
        assert!(split_csv_line("").is_empty());
    }

    #[test]
    fn parses_one_record_per_line_with_trimmed_values() {
        let path = write_fixture("basic.csv", "a,b, 1,\t2,3\nc,d\ne,f,bla,blabla\ng,h,\n");
        let records =
            parse_varlines_file(&path, &schema(), false).expect("fixture should parse cleanly");

        assert_eq!(records.len(), 4);
        for record in &records {
            assert!(record.field("field1").is_some());
            assert!(record.field("missing").is_none());
        }
        assert_eq!(records[0].variable(), ["1", "2", "3"]);
        assert_eq!(records[2].field("field2"), Some("f"));
        assert_eq!(records[2].variable(), ["bla", "blabla"]);
    }

    #[test]
    fn trailing_comma_and_exact_arity_stay_distinct() {
        let path = write_fixture("trailing.csv", "c,d\ng,h,\n");
        let records = parse_varlines_file(&path, &schema(), false).expect("fixture should parse");

        assert!(records[0].variable().is_empty());
        assert_eq!(records[1].variable(), [""]);
    }

    #[test]
    fn short_line_reports_record_number_and_file() {
        let path = write_fixture("short.csv", "a,b,x\nonly-one-field\n");
        let err = parse_varlines_file(&path, &schema(), false)
            .expect_err("second record should be rejected");

        match err.downcast_ref::<HarnessError>() {
            Some(HarnessError::MalformedRecord {
                line,
                expected,
                found,
                ..
            }) => {
                assert_eq!(*line, 2);
                assert_eq!(*expected, 2);
                assert_eq!(*found, 1);
            }
            other => panic!("unexpected error shape: {other:?}"),
        }
    }

    #[test]
    fn header_skip_discards_exactly_one_line() {
        let path = write_fixture("header.csv", "field1,field2,varfield\na,b,c\n");
        let records = parse_varlines_file(&path, &schema(), true).expect("fixture should parse");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("field1"), Some("a"));
        assert_eq!(records[0].variable(), ["c"]);
    }

    #[test]
    fn record_numbers_count_from_first_data_line_after_header() {
        let path = write_fixture("header-short.csv", "field1,field2,varfield\nbad\n");
        let err = parse_varlines_file(&path, &schema(), true)
            .expect_err("short record should be rejected");

        match err.downcast_ref::<HarnessError>() {
            Some(HarnessError::MalformedRecord { line, .. }) => assert_eq!(*line, 1),
            other => panic!("unexpected error shape: {other:?}"),
        }
    }
}
