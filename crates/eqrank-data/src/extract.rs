//! Quantity extraction from a parsed problem.
//!
//! Every cardinal number (`CD`) becomes a quantity keyed by its cleaned
//! text, with the first noun after it as unit. The question sentence adds
//! the unknown `x`, whose unit is the first noun after `many`/`much` or the
//! question word.

use std::collections::HashSet;

use eqrank_core::quantity::clean_key;
use eqrank_core::{ParseResult, Quantity, QuantitySet, Sentence};
use tracing::debug;

use crate::error::Result;

/// Tokens searched after a number for its unit noun.
const UNIT_LOOKAHEAD: usize = 3;

/// Builds the quantity set of a parsed problem in text order.
///
/// Repeated numbers keep their first mention. The unknown takes the place
/// of its anchor token, so question numbers before the anchor precede it.
pub fn extract_quantities(parse: &ParseResult) -> Result<QuantitySet> {
    let question = parse.question_index();
    let mut seen = HashSet::new();
    let mut quantities = Vec::new();

    for (s, sentence) in parse.sentences.iter().enumerate() {
        let anchor = (Some(s) == question).then(|| question_anchor(sentence));
        let mut unknown_pending = anchor.is_some();

        for (t, word) in sentence.words.iter().enumerate() {
            if unknown_pending && anchor.is_some_and(|a| t >= a) {
                quantities.push(unknown(sentence, s, anchor.unwrap_or(t)));
                unknown_pending = false;
            }
            if !word.is_number() {
                continue;
            }
            let key = clean_key(word.text());
            if key.is_empty() || key.contains('x') || key.parse::<f64>().is_err() {
                debug!(event = "number_skipped", text = word.text(), sentence = s);
                continue;
            }
            if !seen.insert(key.clone()) {
                debug!(event = "duplicate_number", key = %key, sentence = s);
                continue;
            }
            let mut quantity = Quantity::number(&key, s)?.at_token(t);
            if let Some(unit) = unit_after(sentence, t) {
                quantity = quantity.with_unit(unit);
            }
            quantities.push(quantity);
        }
        if unknown_pending {
            quantities.push(unknown(sentence, s, anchor.unwrap_or(0)));
        }
    }

    Ok(QuantitySet::new(quantities)?)
}

fn unknown(sentence: &Sentence, s: usize, anchor: usize) -> Quantity {
    let x = Quantity::unknown(s).at_token(anchor);
    match unit_after(sentence, anchor) {
        Some(unit) => x.with_unit(unit),
        None => x,
    }
}

// Token the unknown is attached to: `many`/`much`, else the first wh-word,
// else the start of the sentence.
fn question_anchor(sentence: &Sentence) -> usize {
    let words = &sentence.words;
    words
        .iter()
        .position(|w| matches!(w.lemma().as_str(), "many" | "much"))
        .or_else(|| words.iter().position(|w| w.pos().starts_with('W')))
        .unwrap_or(0)
}

fn unit_after(sentence: &Sentence, token: usize) -> Option<String> {
    sentence
        .words
        .iter()
        .skip(token + 1)
        .take(UNIT_LOOKAHEAD)
        .find(|w| w.is_noun())
        .map(|w| w.lemma())
}
