//! Quantities mentioned in a word problem.
//!
//! A [`Quantity`] is a number or the unknown mentioned in the problem text.
//! The [`QuantitySet`] holds every quantity of one problem, in the order the
//! quantities were discovered in the text.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EqRankError, Result};

/// Sentinel raw value of the quantity an equation solves for.
pub const UNKNOWN_MARKER: &str = "x";

/// Value carried by a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuantityValue {
    /// A literal number; `text` preserves the original formatting.
    Number { text: String, value: f64 },
    /// The solve target.
    Unknown,
    /// A deferred combination that involves the unknown.
    Symbolic { expr: String },
}

impl QuantityValue {
    /// Parses raw text: the unknown marker or a literal number.
    ///
    /// # Example
    ///
    /// ```
    /// use eqrank_core::QuantityValue;
    ///
    /// assert_eq!(QuantityValue::parse("x").unwrap(), QuantityValue::Unknown);
    /// assert_eq!(QuantityValue::parse("2.5").unwrap().numeric(), Some(2.5));
    /// assert!(QuantityValue::parse("two").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw == UNKNOWN_MARKER {
            return Ok(QuantityValue::Unknown);
        }
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|value| QuantityValue::Number {
                text: raw.to_string(),
                value,
            })
            .ok_or_else(|| EqRankError::InvalidNumber(raw.to_string()))
    }

    /// Creates a number value, formatting integral values without a fraction.
    pub fn from_f64(value: f64) -> Self {
        QuantityValue::Number {
            text: format_number(value),
            value,
        }
    }

    /// Raw textual form: the number text, `"x"`, or the symbolic expression.
    pub fn raw(&self) -> &str {
        match self {
            QuantityValue::Number { text, .. } => text,
            QuantityValue::Unknown => UNKNOWN_MARKER,
            QuantityValue::Symbolic { expr } => expr,
        }
    }

    pub fn numeric(&self) -> Option<f64> {
        match self {
            QuantityValue::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, QuantityValue::Unknown)
    }

    /// True for the unknown itself and for combinations involving it.
    pub fn is_symbolic(&self) -> bool {
        !matches!(self, QuantityValue::Number { .. })
    }
}

/// Formats a number the way equation text writes it (`3`, `0.25`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Reduces a raw mention to the characters used as an equation operand key.
///
/// Keeps digits, `.` and the unknown marker, so `"$1,200"` becomes `"1200"`.
pub fn clean_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == 'x')
        .collect()
}

/// Where a quantity was mentioned in the parsed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Sentence index in the parse result.
    pub sentence: usize,
    /// Token index within the sentence, when known.
    #[serde(default)]
    pub token: Option<usize>,
}

impl Position {
    pub fn new(sentence: usize, token: Option<usize>) -> Self {
        Self { sentence, token }
    }
}

/// A number or unknown mentioned in a problem.
///
/// # Example
///
/// ```
/// use eqrank_core::Quantity;
///
/// let q = Quantity::number("70", 0).unwrap().with_unit("seashell");
/// assert_eq!(q.key(), "70");
/// assert_eq!(q.value().numeric(), Some(70.0));
/// assert_eq!(q.unit(), Some("seashell"));
///
/// let x = Quantity::unknown(2);
/// assert!(x.is_target());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    key: String,
    value: QuantityValue,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    positions: Vec<Position>,
}

impl Quantity {
    /// Creates a quantity from its parts.
    pub fn new(
        key: impl Into<String>,
        value: QuantityValue,
        unit: Option<String>,
        positions: Vec<Position>,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            unit,
            positions,
        }
    }

    /// A literal number mentioned in `sentence`; the key is the number text.
    pub fn number(text: &str, sentence: usize) -> Result<Self> {
        let value = QuantityValue::parse(text)?;
        if value.is_unknown() {
            return Err(EqRankError::InvalidNumber(text.to_string()));
        }
        Ok(Self::new(
            text.trim(),
            value,
            None,
            vec![Position::new(sentence, None)],
        ))
    }

    /// The solve target, keyed by the unknown marker.
    pub fn unknown(sentence: usize) -> Self {
        Self::new(
            UNKNOWN_MARKER,
            QuantityValue::Unknown,
            None,
            vec![Position::new(sentence, None)],
        )
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Sets the token index of the first mention.
    pub fn at_token(mut self, token: usize) -> Self {
        match self.positions.first_mut() {
            Some(position) => position.token = Some(token),
            None => self.positions.push(Position::new(0, Some(token))),
        }
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &QuantityValue {
        &self.value
    }

    pub fn raw(&self) -> &str {
        self.value.raw()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// First mention of the quantity.
    pub fn position(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    /// Sentence index of the first mention.
    pub fn sentence(&self) -> Option<usize> {
        self.position().map(|p| p.sentence)
    }

    pub fn is_target(&self) -> bool {
        self.value.is_unknown()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} [{}]", self.raw(), unit),
            None => f.write_str(self.raw()),
        }
    }
}

/// All quantities of one problem, in text-discovery order.
///
/// Keys are unique. Serialized as an array of `[key, quantity]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(String, Quantity)>", into = "Vec<(String, Quantity)>")]
pub struct QuantitySet {
    quantities: Vec<Quantity>,
    index: HashMap<String, usize>,
}

impl QuantitySet {
    /// Creates a set, rejecting duplicate keys.
    pub fn new(quantities: Vec<Quantity>) -> Result<Self> {
        let mut index = HashMap::with_capacity(quantities.len());
        for (i, q) in quantities.iter().enumerate() {
            if index.insert(q.key.clone(), i).is_some() {
                return Err(EqRankError::DuplicateQuantity(q.key.clone()));
            }
        }
        Ok(Self { quantities, index })
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quantity> {
        self.quantities.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Quantity> {
        self.quantities.get(index)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn by_key(&self, key: &str) -> Option<&Quantity> {
        self.index_of(key).map(|i| &self.quantities[i])
    }

    /// Keys in discovery order.
    pub fn keys(&self) -> Vec<&str> {
        self.quantities.iter().map(|q| q.key.as_str()).collect()
    }

    /// Returns the single solve target.
    ///
    /// # Errors
    ///
    /// `NoSolveTarget` or `MultipleSolveTargets` when the set does not hold
    /// exactly one unknown.
    pub fn target(&self) -> Result<&Quantity> {
        let mut targets = self.quantities.iter().filter(|q| q.is_target());
        let first = targets.next().ok_or(EqRankError::NoSolveTarget)?;
        let extra = targets.count();
        if extra > 0 {
            return Err(EqRankError::MultipleSolveTargets(extra + 1));
        }
        Ok(first)
    }

    /// True when `operands` names every key exactly once and nothing else.
    pub fn matches_operands<S: AsRef<str>>(&self, operands: &[S]) -> bool {
        if operands.len() != self.quantities.len() {
            return false;
        }
        let mut seen = vec![false; self.quantities.len()];
        for operand in operands {
            match self.index_of(operand.as_ref()) {
                Some(i) if !seen[i] => seen[i] = true,
                _ => return false,
            }
        }
        true
    }

    /// True when `operands` lists the keys in exactly discovery order.
    pub fn matches_order<S: AsRef<str>>(&self, operands: &[S]) -> bool {
        operands.len() == self.quantities.len()
            && operands
                .iter()
                .zip(&self.quantities)
                .all(|(o, q)| o.as_ref() == q.key)
    }
}

impl TryFrom<Vec<(String, Quantity)>> for QuantitySet {
    type Error = EqRankError;

    fn try_from(pairs: Vec<(String, Quantity)>) -> Result<Self> {
        let quantities = pairs
            .into_iter()
            .map(|(key, mut q)| {
                q.key = key;
                q
            })
            .collect();
        QuantitySet::new(quantities)
    }
}

impl From<QuantitySet> for Vec<(String, Quantity)> {
    fn from(set: QuantitySet) -> Self {
        set.quantities
            .into_iter()
            .map(|q| (q.key.clone(), q))
            .collect()
    }
}
