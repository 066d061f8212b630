//! Complete sample problems.
//!
//! Each problem carries a hand-tagged parse in the layout of the NLP
//! service, quantities with token positions and units, and the candidates
//! the solver would propose.

use eqrank_core::{CandidateEquation, Label, ParseResult, Problem, Quantity, QuantitySet, Sentence, Word};

/// Builds a sentence from `(text, part of speech, lemma)` triples.
pub fn sentence(words: &[(&str, &str, &str)]) -> Sentence {
    Sentence::from_words(
        words
            .iter()
            .map(|(text, pos, lemma)| Word::new(*text, *pos).with_lemma(*lemma))
            .collect(),
    )
}

fn candidate(raw: &str, positive: bool, confidence: f64, rank: usize, answer: &str) -> CandidateEquation {
    CandidateEquation::parse(raw)
        .with_label(Label::from_flag(positive))
        .with_confidence(confidence)
        .with_rank(rank)
        .with_answer(answer)
}

/// "Tom had 70 seashells. He gave 25% of them to Jessica. How many seashells
/// did he give?" after percentage rewriting.
///
/// Candidates: `70 * 0.25 = x` (positive, in order), `70 - 0.25 = x`,
/// `0.25 * 70 = x` (positive, out of order), `70 / 0.25 = x` and
/// `70 + 2 = x` (names an unknown quantity).
pub fn percent_problem() -> Problem {
    let parse = ParseResult::new(vec![
        sentence(&[
            ("Tom", "NNP", "Tom"),
            ("had", "VBD", "have"),
            ("70", "CD", "70"),
            ("seashells", "NNS", "seashell"),
            (".", ".", "."),
        ]),
        sentence(&[
            ("He", "PRP", "he"),
            ("gave", "VBD", "give"),
            ("0.25", "CD", "0.25"),
            ("times", "NNS", "time"),
            ("of", "IN", "of"),
            ("them", "PRP", "they"),
            ("to", "TO", "to"),
            ("Jessica", "NNP", "Jessica"),
            (".", ".", "."),
        ]),
        sentence(&[
            ("How", "WRB", "how"),
            ("many", "JJ", "many"),
            ("seashells", "NNS", "seashell"),
            ("did", "VBD", "do"),
            ("he", "PRP", "he"),
            ("give", "VB", "give"),
            ("?", ".", "?"),
        ]),
    ]);
    let quantities = QuantitySet::new(vec![
        Quantity::number("70", 0)
            .expect("number")
            .at_token(2)
            .with_unit("seashell"),
        Quantity::number("0.25", 1)
            .expect("number")
            .at_token(2)
            .with_unit("time"),
        Quantity::unknown(2).at_token(1).with_unit("seashell"),
    ])
    .expect("unique keys");

    Problem::new(
        0,
        " Tom had 70 seashells . He gave 0.25 times of them to Jessica . How many seashells did he give ? ",
    )
    .with_answer("17.5")
    .with_parse(parse)
    .with_quantities(quantities)
    .with_candidates(vec![
        candidate("70*0.25=x", true, 1.0, 0, "17.5"),
        candidate("70-0.25=x", false, 0.5, 1, "69.75"),
        candidate("0.25*70=x", true, 1.0 / 3.0, 2, "17.5"),
        candidate("70/0.25=x", false, 0.25, 3, "280"),
        candidate("70+2=x", false, 1.0 / 6.0, 5, "72"),
    ])
}

/// "Mary has 5 apples. She buys 3 more apples. How many apples does she
/// have now?"
///
/// Candidates: `5 + 3 = x` (positive), `5 - 3 = x`, `5 * 3 = x` and
/// `3 + 5 = x` (positive, out of order).
pub fn sum_problem() -> Problem {
    let parse = ParseResult::new(vec![
        sentence(&[
            ("Mary", "NNP", "Mary"),
            ("has", "VBZ", "have"),
            ("5", "CD", "5"),
            ("apples", "NNS", "apple"),
            (".", ".", "."),
        ]),
        sentence(&[
            ("She", "PRP", "she"),
            ("buys", "VBZ", "buy"),
            ("3", "CD", "3"),
            ("more", "JJR", "more"),
            ("apples", "NNS", "apple"),
            (".", ".", "."),
        ]),
        sentence(&[
            ("How", "WRB", "how"),
            ("many", "JJ", "many"),
            ("apples", "NNS", "apple"),
            ("does", "VBZ", "do"),
            ("she", "PRP", "she"),
            ("have", "VB", "have"),
            ("now", "RB", "now"),
            ("?", ".", "?"),
        ]),
    ]);
    let quantities = QuantitySet::new(vec![
        Quantity::number("5", 0).expect("number").at_token(2).with_unit("apple"),
        Quantity::number("3", 1).expect("number").at_token(2).with_unit("apple"),
        Quantity::unknown(2).at_token(1).with_unit("apple"),
    ])
    .expect("unique keys");

    Problem::new(
        1,
        " Mary has 5 apples . She buys 3 more apples . How many apples does she have now ? ",
    )
    .with_answer("8")
    .with_parse(parse)
    .with_quantities(quantities)
    .with_candidates(vec![
        candidate("5+3=x", true, 1.0, 0, "8"),
        candidate("5-3=x", false, 0.5, 1, "2"),
        candidate("5*3=x", false, 1.0 / 3.0, 2, "15"),
        candidate("3+5=x", true, 0.25, 3, "8"),
    ])
}

/// Dataset JSON holding the two sample problems in their original wording.
pub const SAMPLE_DATASET: &str = r#"[
  {
    "iIndex": 0,
    "sQuestion": "Tom had 70 seashells. He gave 25% of them to Jessica. How many seashells did he give?",
    "lSolutions": [17.5]
  },
  {
    "iIndex": 1,
    "sQuestion": "Mary has 5 apples. She buys 3 more apples. How many apples does she have now?",
    "lSolutions": [8]
  }
]"#;
