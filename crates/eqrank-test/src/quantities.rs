//! Quantity set builders.

use eqrank_core::{Quantity, QuantitySet, UNKNOWN_MARKER};

/// Builds a set from keys; `"x"` becomes the unknown, everything else a number.
///
/// All quantities are placed in sentence 0 without token positions.
///
/// # Panics
///
/// Panics on a key that is neither `"x"` nor a number, or on duplicates.
pub fn quantity_set(keys: &[&str]) -> QuantitySet {
    let quantities = keys
        .iter()
        .map(|k| {
            if *k == UNKNOWN_MARKER {
                Quantity::unknown(0)
            } else {
                Quantity::number(k, 0).expect("numeric key")
            }
        })
        .collect();
    QuantitySet::new(quantities).expect("unique keys")
}
