//! Assembles complete problems from the dataset, the caches and the solver
//! output.

use eqrank_config::DataConfig;
use eqrank_core::Problem;

use crate::cache::{ParseStore, QuantityStore};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::ilp;
use crate::preprocess::normalize_text;

/// Reads everything the scorer needs for one problem id.
#[derive(Debug, Clone)]
pub struct ProblemLoader<'a> {
    dataset: &'a Dataset,
    config: &'a DataConfig,
    parses: ParseStore,
    quantities: QuantityStore,
}

impl<'a> ProblemLoader<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a DataConfig) -> Self {
        Self {
            dataset,
            config,
            parses: ParseStore::new(&config.parse_dir),
            quantities: QuantityStore::new(&config.quantity_dir),
        }
    }

    /// Loads problem `id` with its cached parse, cached quantities and
    /// solver candidates.
    pub fn load(&self, id: usize) -> Result<Problem> {
        let record = self.dataset.get(id)?;
        let mut problem = Problem::new(id, normalize_text(&record.question))
            .with_parse(self.parses.load(id)?)
            .with_quantities(self.quantities.load(id)?)
            .with_candidates(ilp::read_candidates(
                &self.config.ilp_dir,
                id,
                self.config.max_candidates,
            )?);
        problem.answer = record.reference_answer();
        Ok(problem)
    }
}
