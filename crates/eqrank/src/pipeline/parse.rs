//! Parse step: NLP parses, quantity sets and the solver input file.

use eqrank_data::{
    extract_quantities, normalize_text, IlpInputWriter, ParseStore, QuantityStore, SentenceParser,
};
use serde::Serialize;
use tracing::{info, warn};

use super::Pipeline;
use crate::error::{PipelineError, Result};

/// What the parse step did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    /// Problems whose parse and quantities were cached.
    pub parsed: Vec<usize>,
    /// Problems skipped after a parse or extraction failure.
    pub failed: Vec<usize>,
}

impl Pipeline {
    /// Parses every dataset problem with `parser`.
    ///
    /// Each problem is normalized and parsed; its parse and quantity set are
    /// cached and its block is appended to the solver input file, which is
    /// emptied first.
    ///
    /// # Errors
    ///
    /// `ServiceUnavailable` when the very first request cannot reach the
    /// service. Later failures only skip their problem.
    pub fn parse<P: SentenceParser>(&self, parser: &P) -> Result<ParseReport> {
        let data = &self.config.data;
        let parses = ParseStore::new(&data.parse_dir);
        let quantities = QuantityStore::new(&data.quantity_dir);
        let writer = IlpInputWriter::new(&data.ilp_input);
        writer.reset()?;

        let mut report = ParseReport::default();
        for (id, record) in self.dataset.iter() {
            let text = normalize_text(&record.question);
            let parse = match parser.parse(&text) {
                Ok(parse) => parse,
                Err(e) if id == 0 && e.is_connection_failure() => {
                    return Err(PipelineError::ServiceUnavailable(e));
                }
                Err(e) => {
                    warn!(event = "parse_failed", problem_id = id, error = %e);
                    report.failed.push(id);
                    continue;
                }
            };
            parses.store(id, &parse)?;

            let set = match extract_quantities(&parse) {
                Ok(set) => set,
                Err(e) => {
                    warn!(event = "extraction_failed", problem_id = id, error = %e);
                    report.failed.push(id);
                    continue;
                }
            };
            quantities.store(id, &set)?;
            writer.append(id, &set, &record.reference_answer().unwrap_or_default())?;

            info!(
                event = "problem_parsed",
                problem_id = id,
                sentences = parse.len(),
                quantities = set.len(),
            );
            report.parsed.push(id);
        }

        info!(
            event = "parse_done",
            parsed = report.parsed.len(),
            failed = report.failed.len(),
            ilp_input = %writer.path().display(),
        );
        Ok(report)
    }
}
