//! Files exchanged with the ILP solver.
//!
//! The solver reads one block per problem from an input file and writes one
//! `q<id:03>.txt.out` file per problem. An output file has three header
//! lines, then one row per solution, then a trailing summary line. Rows are
//! `" | "`-separated:
//!
//! ```text
//! EXPR: 1 | POS | FRA | 0 | 17.5 | 17.5 | 70*0.25=x | 70 0.25 * | ...
//!       ^label          ^count       ^answer ^equation
//! ```

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use eqrank_core::equation::solver_confidence;
use eqrank_core::{CandidateEquation, Label, QuantitySet};

use tracing::warn;

use crate::error::{ensure_parent, read_file, Result};

const HEADER_LINES: usize = 3;
const FIELD_SEPARATOR: &str = " | ";

/// Path of the solver output for problem `id`.
pub fn output_path(dir: &Path, id: usize) -> PathBuf {
    dir.join(format!("q{:03}.txt.out", id))
}

/// Parses solver output text into candidates.
///
/// Reads at most `max_rows` rows. A repeated equation keeps its first row
/// and a malformed row is skipped. Each candidate's rank is its row index.
pub fn parse_output(text: &str, max_rows: usize) -> Vec<CandidateEquation> {
    let lines: Vec<&str> = text.lines().collect();
    let body = match lines.len() {
        n if n > HEADER_LINES => &lines[HEADER_LINES..n - 1],
        _ => &[][..],
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for (row, line) in body.iter().take(max_rows).enumerate() {
        match parse_row(line, row) {
            Ok(candidate) => {
                if seen.insert(candidate.text()) {
                    candidates.push(candidate);
                }
            }
            Err(reason) => warn!(
                event = "solver_row_skipped",
                line = row + HEADER_LINES + 1,
                reason = %reason,
            ),
        }
    }
    candidates
}

fn parse_row(line: &str, row: usize) -> std::result::Result<CandidateEquation, String> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < 7 {
        return Err(format!("expected at least 7 fields, found {}", fields.len()));
    }
    let flag = fields[0]
        .split(": ")
        .nth(1)
        .ok_or_else(|| format!("no label in {:?}", fields[0]))?;
    let label = match flag.trim() {
        "1" => Label::Positive,
        "0" => Label::Negative,
        other => return Err(format!("label {:?} is not 0 or 1", other)),
    };
    let count = parse_count(fields[3]).ok_or_else(|| format!("count {:?} is not a number", fields[3]))?;

    Ok(CandidateEquation::parse(fields[6])
        .with_label(label)
        .with_confidence(solver_confidence(count))
        .with_answer(fields[5].trim())
        .with_rank(row))
}

// Objective values are integral but may be printed as `3` or `3.0`.
fn parse_count(field: &str) -> Option<i64> {
    let field = field.trim();
    field
        .parse::<i64>()
        .ok()
        .or_else(|| field.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v as i64))
}

/// Reads the candidates of problem `id` from `dir`.
pub fn read_candidates(dir: &Path, id: usize, max_rows: usize) -> Result<Vec<CandidateEquation>> {
    Ok(parse_output(&read_file(&output_path(dir, id))?, max_rows))
}

/// Renders the solver input block of one problem.
///
/// # Example
///
/// ```
/// use eqrank_core::{Quantity, QuantitySet};
/// use eqrank_data::ilp::input_block;
///
/// let set = QuantitySet::new(vec![
///     Quantity::number("70", 0).unwrap().with_unit("seashell"),
///     Quantity::unknown(1).with_unit("seashell"),
/// ]).unwrap();
/// assert_eq!(
///     input_block(3, &set, "17.5"),
///     "\n3\nquantities : 70 x\ntypes : \"seashell\" \"seashell\"\noperators : + - * / =\nn : 3\nanswer : 17.5\n"
/// );
/// ```
pub fn input_block(id: usize, quantities: &QuantitySet, answer: &str) -> String {
    let mut block = format!("\n{}\nquantities :", id);
    for q in quantities.iter() {
        block.push(' ');
        block.push_str(q.raw());
    }
    block.push_str("\ntypes :");
    for q in quantities.iter() {
        block.push_str(&format!(" \"{}\"", q.unit().unwrap_or_default()));
    }
    block.push_str("\noperators : + - * / =");
    block.push_str(&format!(
        "\nn : {}",
        (quantities.len() * 2).saturating_sub(1)
    ));
    block.push_str(&format!("\nanswer : {}\n", answer));
    block
}

/// Appends problem blocks to the solver input file.
#[derive(Debug, Clone)]
pub struct IlpInputWriter {
    path: PathBuf,
}

impl IlpInputWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Empties the file so a new parse run starts from scratch.
    pub fn reset(&self) -> Result<()> {
        ensure_parent(&self.path)?;
        std::fs::write(&self.path, "")?;
        Ok(())
    }

    /// Appends the block of problem `id`, creating the file if needed.
    pub fn append(&self, id: usize, quantities: &QuantitySet, answer: &str) -> Result<()> {
        ensure_parent(&self.path)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(input_block(id, quantities, answer).as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqrank_test::ilp;
    use eqrank_test::quantity_set;

    #[test]
    fn test_parse_percent_output() {
        let candidates = parse_output(&ilp::percent_output(), 100);
        let texts: Vec<String> = candidates.iter().map(|c| c.text()).collect();
        assert_eq!(
            texts,
            vec![
                "70 * 0.25 = x",
                "70 - 0.25 = x",
                "0.25 * 70 = x",
                "70 / 0.25 = x",
                "70 + 2 = x",
            ]
        );
        assert_eq!(candidates[0].label(), Some(Label::Positive));
        assert_eq!(candidates[1].label(), Some(Label::Negative));
        assert_eq!(candidates[0].solver_confidence(), 1.0);
        assert_eq!(candidates[1].solver_confidence(), 0.5);
        assert_eq!(candidates[3].solver_confidence(), 0.25);
        assert_eq!(candidates[3].proposed_answer(), "280");
        // duplicate row 4 is dropped; row 5 keeps its own rank
        assert_eq!(candidates[4].rank(), 5);
    }

    #[test]
    fn test_row_limit() {
        let candidates = parse_output(&ilp::percent_output(), 2);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_header_and_trailer_only() {
        let text = format!("{}{}", ilp::HEADER, ilp::TRAILER);
        assert!(parse_output(&text, 100).is_empty());
        assert!(parse_output("", 100).is_empty());
    }

    #[test]
    fn test_float_count() {
        let text = ilp::output(&[(true, 0, "8", "5+3=x")]).replace("| 0 |", "| 2.0 |");
        let candidates = parse_output(&text, 100);
        assert!((candidates[0].solver_confidence() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let text = format!(
            "{}EXPR: 1 | POS | FRA\n{}EXPR: 7 | POS | FRA | 0 | 8 | 8 | 3+5=x | - | -\n{}",
            ilp::HEADER,
            ilp::row(true, 0, "8", "5+3=x"),
            ilp::TRAILER
        );
        let candidates = parse_output(&text, 100);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text(), "5 + 3 = x");
        // rank stays the row index in the file
        assert_eq!(candidates[0].rank(), 1);
    }

    #[test]
    fn test_read_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(output_path(dir.path(), 7), ilp::percent_output()).unwrap();
        assert!(output_path(dir.path(), 7).ends_with("q007.txt.out"));
        assert_eq!(read_candidates(dir.path(), 7, 100).unwrap().len(), 5);
        assert!(read_candidates(dir.path(), 8, 100).is_err());
    }

    #[test]
    fn test_input_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let writer = IlpInputWriter::new(dir.path().join("data").join("ILP.input"));
        let set = quantity_set(&["5", "3", "x"]);
        writer.append(0, &set, "8").unwrap();
        writer.append(1, &set, "2").unwrap();
        let text = std::fs::read_to_string(writer.path()).unwrap();
        assert!(text.starts_with("\n0\nquantities : 5 3 x\ntypes : \"\" \"\" \"\"\n"));
        assert!(text.contains("n : 5\nanswer : 8\n\n1\n"));

        writer.reset().unwrap();
        assert_eq!(std::fs::read_to_string(writer.path()).unwrap(), "");
    }
}
