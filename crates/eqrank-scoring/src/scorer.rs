//! Candidate scoring.
//!
//! A candidate's score is the product of the local probabilities of its
//! arithmetic nodes, multiplied by the global classifier's positive
//! probability for the final equality:
//!
//! ```text
//! score = p_local(node_1) * ... * p_local(node_k) * p_global(positive)
//! ```

use eqrank_config::ScoringConfig;
use eqrank_core::tree::resolve;
use eqrank_core::{CandidateEquation, EquationTree, Label, Problem, Quantity, QuantitySet};
use tracing::{debug, warn};

use crate::classifier::{expect_classes, Classifier, GLOBAL_CLASSES, LOCAL_CLASSES};
use crate::error::{Result, ScoringError};
use crate::features::{FeatureAssembler, FeatureContext};
use crate::outcome::{ProblemOutcome, Rejection};
use crate::ranking::{NodeScore, Ranking, ScoredCandidate};

/// The trained local and global classifiers.
#[derive(Debug, Clone)]
pub struct ScoringModels<L, G> {
    local: L,
    global: G,
}

impl<L: Classifier, G: Classifier> ScoringModels<L, G> {
    /// Pairs the models, checking their class counts.
    pub fn new(local: L, global: G) -> Result<Self> {
        expect_classes(&local, LOCAL_CLASSES)?;
        expect_classes(&global, GLOBAL_CLASSES)?;
        Ok(Self { local, global })
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn global(&self) -> &G {
        &self.global
    }
}

/// Local probabilities of one candidate's tree.
#[derive(Debug, Clone)]
pub struct LocalPass {
    pub tree: EquationTree,
    /// Combined values, indexed by node id.
    pub values: Vec<Quantity>,
    /// Product of the node probabilities; `1` without arithmetic nodes.
    pub local_score: f64,
    pub nodes: Vec<NodeScore>,
}

impl LocalPass {
    /// Resolved operands of the equality node.
    pub fn sides<'a>(&'a self, quantities: &'a QuantitySet) -> Result<(&'a Quantity, &'a Quantity)> {
        let eq = self.tree.equality();
        let left = resolve(eq.left, quantities, &self.values)?;
        let right = resolve(eq.right, quantities, &self.values)?;
        Ok((left, right))
    }
}

/// Builds the tree of `candidate` and scores each arithmetic node with `local`.
///
/// A node's probability is the one `local` gives to the node's own operator.
pub fn local_pass<L: Classifier + ?Sized>(
    local: &L,
    assembler: &FeatureAssembler,
    candidate: &CandidateEquation,
    quantities: &QuantitySet,
    context: &FeatureContext<'_>,
) -> Result<LocalPass> {
    let tree = EquationTree::build(candidate.tokens(), quantities)?;
    let mut local_score = 1.0;
    let mut nodes = Vec::with_capacity(tree.len().saturating_sub(1));

    let values = tree.walk(quantities, |node, left, right| -> Result<()> {
        let Some(class) = node.operator.class_index() else {
            return Ok(());
        };
        let features = assembler.local_vector(left, right, context);
        let probability = local.class_probability(&features, class)?;
        local_score *= probability;
        nodes.push(NodeScore {
            label: node.label.clone(),
            operator: node.operator,
            probability,
        });
        Ok(())
    })?;

    Ok(LocalPass {
        tree,
        values,
        local_score,
        nodes,
    })
}

/// Runs [`local_pass`] and assembles the global feature vector of the
/// candidate's equality: `[order, local_score, confidence]` followed by the
/// local features of its two sides.
pub fn global_pass<L: Classifier + ?Sized>(
    local: &L,
    assembler: &FeatureAssembler,
    candidate: &CandidateEquation,
    quantities: &QuantitySet,
    context: &FeatureContext<'_>,
) -> Result<(LocalPass, Vec<f64>)> {
    let pass = local_pass(local, assembler, candidate, quantities, context)?;
    let (left, right) = pass.sides(quantities)?;
    let features = assembler.global_vector(
        left,
        right,
        context,
        candidate.order_matches(quantities),
        pass.local_score,
        candidate.solver_confidence(),
    );
    Ok((pass, features))
}

/// Scores and ranks the candidates of a problem.
#[derive(Debug)]
pub struct EquationScorer<'m, L, G> {
    models: &'m ScoringModels<L, G>,
    assembler: FeatureAssembler,
    require_order_match: bool,
}

impl<'m, L: Classifier, G: Classifier> EquationScorer<'m, L, G> {
    /// Creates a scorer that keeps only order-matching candidates.
    pub fn new(models: &'m ScoringModels<L, G>) -> Self {
        Self {
            models,
            assembler: FeatureAssembler::default(),
            require_order_match: true,
        }
    }

    /// Creates a scorer following the candidate filter of `config`.
    pub fn from_config(models: &'m ScoringModels<L, G>, config: &ScoringConfig) -> Self {
        Self::new(models).with_order_match(config.require_order_match)
    }

    pub fn with_assembler(mut self, assembler: FeatureAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Whether candidates out of text-discovery order are dropped.
    pub fn with_order_match(mut self, required: bool) -> Self {
        self.require_order_match = required;
        self
    }

    /// Intake: the candidates that may be scored.
    ///
    /// # Errors
    ///
    /// The rejection reason when the problem has no single unknown or no
    /// candidate survives the filters.
    pub fn admit<'p>(&self, problem: &'p Problem) -> std::result::Result<Vec<&'p CandidateEquation>, Rejection> {
        if let Err(e) = problem.quantities.target() {
            return Err(Rejection::from_target_error(&e).unwrap_or(Rejection::NoSolveTarget));
        }
        let survivors: Vec<&CandidateEquation> = problem
            .usable_candidates()
            .filter(|c| !self.require_order_match || c.order_matches(&problem.quantities))
            .collect();
        if survivors.is_empty() {
            return Err(Rejection::CandidateSetEmpty);
        }
        Ok(survivors)
    }

    /// Scores one candidate against its problem's quantities.
    pub fn score_candidate(
        &self,
        candidate: &CandidateEquation,
        quantities: &QuantitySet,
        context: &FeatureContext<'_>,
    ) -> Result<ScoredCandidate> {
        let (pass, features) =
            global_pass(&self.models.local, &self.assembler, candidate, quantities, context)?;
        let global_score = self
            .models
            .global
            .class_probability(&features, Label::Positive.class_index())?;

        Ok(ScoredCandidate {
            score: pass.local_score * global_score,
            local_score: pass.local_score,
            global_score,
            label: candidate.label(),
            equation: candidate.text(),
            proposed_answer: candidate.proposed_answer().to_string(),
            nodes: pass.nodes,
        })
    }

    /// Runs intake, scores every surviving candidate and ranks them.
    ///
    /// Candidates whose tree cannot be built are skipped. A classifier error
    /// fails the whole problem.
    pub fn score_problem(&self, problem: &Problem) -> ProblemOutcome {
        let survivors = match self.admit(problem) {
            Ok(survivors) => survivors,
            Err(rejection) => return ProblemOutcome::Rejected(rejection),
        };
        let target = match problem.quantities.target() {
            Ok(target) => target,
            Err(e) => {
                return ProblemOutcome::Rejected(
                    Rejection::from_target_error(&e).unwrap_or(Rejection::NoSolveTarget),
                )
            }
        };
        let context = FeatureContext::new(&problem.parse, target);

        let mut scored = Vec::with_capacity(survivors.len());
        for candidate in survivors {
            match self.score_candidate(candidate, &problem.quantities, &context) {
                Ok(s) => {
                    debug!(
                        event = "candidate_scored",
                        problem_id = problem.id,
                        equation = %s.equation,
                        score = s.score,
                        local = s.local_score,
                        global = s.global_score,
                    );
                    scored.push(s);
                }
                Err(ScoringError::Core(e)) => {
                    warn!(
                        event = "candidate_skipped",
                        problem_id = problem.id,
                        equation = %candidate,
                        error = %e,
                    );
                }
                Err(e) => return ProblemOutcome::Failed(e.to_string()),
            }
        }

        if scored.is_empty() {
            return ProblemOutcome::Rejected(Rejection::CandidateSetEmpty);
        }
        ProblemOutcome::Scored(Ranking::new(scored))
    }
}
