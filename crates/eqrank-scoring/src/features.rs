//! Feature vectors for operation nodes.
//!
//! A local vector describes the two operands of one arithmetic node in the
//! context of the parsed problem. A global vector describes the two sides of
//! the final equality, prefixed with `[order_match, local_score, confidence]`.

use std::collections::BTreeSet;

use eqrank_core::{ParseResult, Quantity};

/// Length of a local feature vector.
pub const LOCAL_FEATURE_COUNT: usize = 31;

/// Length of a global feature vector.
pub const GLOBAL_FEATURE_COUNT: usize = LOCAL_FEATURE_COUNT + 3;

/// Default number of tokens on each side of a mention.
pub const DEFAULT_WINDOW: usize = 3;

const ADD_CUES: &[&str] = &[
    "more", "add", "plus", "total", "increase", "sum", "altogether", "together", "gain", "buy",
    "receive", "raise", "additional", "combine",
];
const SUB_CUES: &[&str] = &[
    "less", "left", "remain", "decrease", "minus", "lose", "give", "spend", "fewer", "difference",
    "discount", "reduce", "sell", "off",
];
const MUL_CUES: &[&str] = &[
    "times", "time", "percent", "each", "every", "per", "of", "twice", "double", "rate", "multiply",
    "product",
];
const DIV_CUES: &[&str] = &[
    "divide", "split", "share", "half", "ratio", "average", "equally", "quarter", "among", "out",
];

const CUE_GROUPS: [&[&str]; 4] = [ADD_CUES, SUB_CUES, MUL_CUES, DIV_CUES];

/// Problem-level inputs shared by every node of every candidate.
#[derive(Debug, Clone, Copy)]
pub struct FeatureContext<'a> {
    pub parse: &'a ParseResult,
    pub target: &'a Quantity,
}

impl<'a> FeatureContext<'a> {
    pub fn new(parse: &'a ParseResult, target: &'a Quantity) -> Self {
        Self { parse, target }
    }

    fn question_lemmas(&self) -> BTreeSet<String> {
        self.parse
            .question_index()
            .and_then(|i| self.parse.sentence(i))
            .map(|s| s.lemmas().into_iter().collect())
            .unwrap_or_default()
    }

    fn relative_sentence(&self, sentence: Option<usize>) -> f64 {
        match (sentence, self.parse.len()) {
            (Some(s), n) if n > 1 => (s.min(n - 1)) as f64 / (n - 1) as f64,
            _ => 0.0,
        }
    }
}

/// Builds local and global feature vectors.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAssembler {
    window: usize,
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

impl FeatureAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the context window radius in tokens.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Features of an arithmetic node with operands `left` and `right`.
    ///
    /// Always [`LOCAL_FEATURE_COUNT`] finite values.
    pub fn local_vector(&self, left: &Quantity, right: &Quantity, context: &FeatureContext<'_>) -> Vec<f64> {
        let mut v = Vec::with_capacity(LOCAL_FEATURE_COUNT);
        let question = context.parse.question_index();
        let target = context.target;

        // positions
        v.push(context.relative_sentence(left.sentence()));
        v.push(context.relative_sentence(right.sentence()));
        v.push(context.relative_sentence(target.sentence()));
        v.push(flag(left.sentence().is_some() && left.sentence() == right.sentence()));
        v.push(flag(mentioned_before(left, right)));
        v.push(flag(question.is_some() && left.sentence() == question));
        v.push(flag(question.is_some() && right.sentence() == question));

        // units
        v.push(flag(same_unit(left.unit(), right.unit())));
        v.push(flag(same_unit(left.unit(), target.unit())));
        v.push(flag(same_unit(right.unit(), target.unit())));
        v.push(flag(left.unit().is_none() || right.unit().is_none()));

        // symbolic operands
        v.push(flag(left.value().is_symbolic()));
        v.push(flag(right.value().is_symbolic()));
        v.push(flag(left.is_target()));
        v.push(flag(right.is_target()));

        // lexical overlap
        let left_words = self.context_words(left, context);
        let right_words = self.context_words(right, context);
        let question_words = context.question_lemmas();
        let both: BTreeSet<String> = left_words.union(&right_words).cloned().collect();
        v.push(jaccard(&left_words, &right_words));
        v.push(jaccard(&both, &question_words));

        // operator cues
        for words in [&left_words, &right_words, &question_words] {
            for cues in CUE_GROUPS {
                v.push(flag(cues.iter().any(|c| words.contains(*c))));
            }
        }

        // magnitudes
        let (l, r) = (left.value().numeric(), right.value().numeric());
        v.push(flag(matches!((l, r), (Some(l), Some(r)) if l > r)));
        v.push(flag([l, r].iter().flatten().any(|n| *n > 0.0 && *n < 1.0)));

        debug_assert_eq!(v.len(), LOCAL_FEATURE_COUNT);
        v
    }

    /// Features of the equality node joining `left` and `right`.
    ///
    /// Always [`GLOBAL_FEATURE_COUNT`] values, `[order_match, local_score,
    /// confidence]` first.
    pub fn global_vector(
        &self,
        left: &Quantity,
        right: &Quantity,
        context: &FeatureContext<'_>,
        order_match: bool,
        local_score: f64,
        solver_confidence: f64,
    ) -> Vec<f64> {
        let mut v = Vec::with_capacity(GLOBAL_FEATURE_COUNT);
        v.push(flag(order_match));
        v.push(finite(local_score));
        v.push(finite(solver_confidence));
        v.extend(self.local_vector(left, right, context));
        v
    }

    // Lemmas around every mention of `quantity`. A mention without a token
    // index contributes its whole sentence.
    fn context_words(&self, quantity: &Quantity, context: &FeatureContext<'_>) -> BTreeSet<String> {
        let mut words = BTreeSet::new();
        for position in quantity.positions() {
            let Some(sentence) = context.parse.sentence(position.sentence) else {
                continue;
            };
            match position.token {
                Some(token) => words.extend(sentence.window(token, self.window)),
                None => words.extend(sentence.lemmas()),
            }
        }
        words
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn same_unit(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.eq_ignore_ascii_case(b))
}

fn mentioned_before(left: &Quantity, right: &Quantity) -> bool {
    match (left.position(), right.position()) {
        (Some(l), Some(r)) => (l.sentence, l.token) < (r.sentence, r.token),
        _ => false,
    }
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqrank_core::combine;
    use eqrank_core::Operator;
    use eqrank_test::problems::percent_problem;

    #[test]
    fn test_vector_lengths_and_finiteness() {
        let problem = percent_problem();
        let target = problem.quantities.target().unwrap();
        let context = FeatureContext::new(&problem.parse, target);
        let assembler = FeatureAssembler::new();

        let a = problem.quantities.get(0).unwrap();
        let b = problem.quantities.get(1).unwrap();
        let local = assembler.local_vector(a, b, &context);
        assert_eq!(local.len(), LOCAL_FEATURE_COUNT);
        assert!(local.iter().all(|v| v.is_finite()));

        let product = combine(a, b, Operator::Mul);
        let global = assembler.global_vector(&product, target, &context, true, f64::NAN, 0.5);
        assert_eq!(global.len(), GLOBAL_FEATURE_COUNT);
        assert_eq!(&global[..3], &[1.0, 0.0, 0.5]);
        assert!(global.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_cue_words_and_units() {
        let problem = percent_problem();
        let target = problem.quantities.target().unwrap();
        let context = FeatureContext::new(&problem.parse, target);
        let assembler = FeatureAssembler::new();

        // 70 seashells, 0.25 times
        let a = problem.quantities.by_key("70").unwrap();
        let b = problem.quantities.by_key("0.25").unwrap();
        let v = assembler.local_vector(a, b, &context);

        assert_eq!(v[4], 1.0, "70 is mentioned before 0.25");
        assert_eq!(v[8], 1.0, "70 shares the target unit");
        // right window holds "times": multiplication cue
        assert_eq!(v[17 + 4 + 2], 1.0);
        // 70 > 0.25 and 0.25 is a fraction
        assert_eq!(v[29], 1.0);
        assert_eq!(v[30], 1.0);
    }

    #[test]
    fn test_empty_parse() {
        let parse = ParseResult::default();
        let x = Quantity::unknown(0);
        let context = FeatureContext::new(&parse, &x);
        let two = Quantity::number("2", 0).unwrap();
        let v = FeatureAssembler::new().local_vector(&two, &x, &context);
        assert_eq!(v.len(), LOCAL_FEATURE_COUNT);
        assert!(v.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn test_jaccard() {
        let a: BTreeSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let b: BTreeSet<String> = ["b", "c"].iter().map(|s| s.to_string()).collect();
        assert!((jaccard(&a, &b) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }
}
