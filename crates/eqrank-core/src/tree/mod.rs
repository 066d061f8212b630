//! Expression tree reconstruction.
//!
//! Converts a flat equation token sequence into a bottom-up list of
//! [`OperationNode`]s. Each side of the `=` is reduced independently:
//!
//! 1. While a parenthesis remains, the group opened by the rightmost `(` is
//!    reduced. Its contents must be exactly `operand operator operand`.
//! 2. Without parentheses, the first three tokens are reduced.
//! 3. A reduced group is replaced by a single operand referring to the new
//!    node, so enclosing groups see it as a leaf.
//!
//! The two side roots are joined by a final `=` node.
//!
//! Nodes live in an arena indexed by [`NodeId`]; operands refer either to a
//! quantity of the problem or to an earlier node. Every node therefore only
//! refers to nodes with a smaller id.

use std::fmt;

use crate::combine::combine;
use crate::error::{EqRankError, Result};
use crate::operator::Operator;
use crate::quantity::{Quantity, QuantitySet};

#[cfg(test)]
mod tests;

/// Index of a node in an [`EquationTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Operand of an operation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandRef {
    /// Index into the problem's [`QuantitySet`].
    Leaf(usize),
    /// Result of an earlier node.
    Node(NodeId),
}

/// One `(operator, left, right)` triple of the reduced equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationNode {
    pub id: NodeId,
    pub operator: Operator,
    pub left: OperandRef,
    pub right: OperandRef,
    /// Synthetic key of the reduced group, e.g. `(3+x)`.
    pub label: String,
}

impl OperationNode {
    pub fn is_equality(&self) -> bool {
        self.operator == Operator::Eq
    }
}

impl fmt::Display for OperationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id.0, self.label)
    }
}

/// Bottom-up operation nodes of one candidate equation.
///
/// # Example
///
/// ```
/// use eqrank_core::{EquationTree, Operator, Quantity, QuantitySet};
///
/// let quantities = QuantitySet::new(vec![
///     Quantity::number("3", 0).unwrap(),
///     Quantity::unknown(0),
///     Quantity::number("2", 0).unwrap(),
///     Quantity::number("70", 1).unwrap(),
/// ]).unwrap();
/// let tokens = ["(", "3", "+", "x", ")", "*", "2", "=", "70"];
///
/// let tree = EquationTree::build(&tokens, &quantities).unwrap();
/// let labels: Vec<&str> = tree.nodes().iter().map(|n| n.label.as_str()).collect();
/// assert_eq!(labels, vec!["(3+x)", "((3+x)*2)", "((3+x)*2)=70"]);
/// assert_eq!(tree.equality().operator, Operator::Eq);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationTree {
    nodes: Vec<OperationNode>,
}

impl EquationTree {
    /// Reduces `tokens` against the known `quantities`.
    ///
    /// # Errors
    ///
    /// - `MalformedEquation` for unbalanced parentheses, groups that are not
    ///   `operand operator operand`, a missing or repeated `=`, or an empty side.
    /// - `UnknownOperand` when an operand token names no quantity.
    pub fn build<S: AsRef<str>>(tokens: &[S], quantities: &QuantitySet) -> Result<Self> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let eq_positions: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == "=")
            .map(|(i, _)| i)
            .collect();
        let split = match eq_positions.as_slice() {
            [i] => *i,
            [] => return Err(malformed("missing '='")),
            _ => return Err(malformed("more than one '='")),
        };

        let mut nodes = Vec::new();
        let (left, left_label) = reduce_side(&tokens[..split], quantities, &mut nodes)?;
        let (right, right_label) = reduce_side(&tokens[split + 1..], quantities, &mut nodes)?;

        let id = NodeId(nodes.len());
        nodes.push(OperationNode {
            id,
            operator: Operator::Eq,
            left,
            right,
            label: format!("{}={}", left_label, right_label),
        });
        Ok(Self { nodes })
    }

    /// Reduces one side of an equation (no `=`) and returns its nodes,
    /// bottom-up. The last node is the side's root; a single operand yields
    /// no nodes.
    pub fn reduce_side<S: AsRef<str>>(tokens: &[S], quantities: &QuantitySet) -> Result<Vec<OperationNode>> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        if tokens.contains(&"=") {
            return Err(malformed("'=' inside one side"));
        }
        let mut nodes = Vec::new();
        reduce_side(&tokens, quantities, &mut nodes)?;
        Ok(nodes)
    }

    /// All nodes, bottom-up; the equality node is last.
    pub fn nodes(&self) -> &[OperationNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&OperationNode> {
        self.nodes.get(id.0)
    }

    /// Nodes other than the final equality.
    pub fn arithmetic_nodes(&self) -> &[OperationNode] {
        &self.nodes[..self.nodes.len() - 1]
    }

    /// The final `=` node.
    pub fn equality(&self) -> &OperationNode {
        // build() always pushes the equality node
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolves every node bottom-up with [`combine`].
    ///
    /// The returned arena is indexed by node id.
    pub fn evaluate(&self, quantities: &QuantitySet) -> Result<Vec<Quantity>> {
        self.walk(quantities, |_, _, _| Ok::<(), EqRankError>(()))
    }

    /// Visits every node bottom-up with its resolved operands, then stores the
    /// combined value for enclosing nodes.
    ///
    /// Returns the value arena indexed by node id.
    pub fn walk<E, F>(&self, quantities: &QuantitySet, mut visit: F) -> std::result::Result<Vec<Quantity>, E>
    where
        E: From<EqRankError>,
        F: FnMut(&OperationNode, &Quantity, &Quantity) -> std::result::Result<(), E>,
    {
        let mut values: Vec<Quantity> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let left = resolve(node.left, quantities, &values)?;
            let right = resolve(node.right, quantities, &values)?;
            visit(node, left, right)?;
            let value = combine(left, right, node.operator);
            values.push(value);
        }
        Ok(values)
    }
}

/// Looks up an operand in the quantity set or an already resolved arena.
pub fn resolve<'a>(
    operand: OperandRef,
    quantities: &'a QuantitySet,
    values: &'a [Quantity],
) -> Result<&'a Quantity> {
    match operand {
        OperandRef::Leaf(i) => quantities
            .get(i)
            .ok_or_else(|| EqRankError::UnknownOperand(format!("quantity #{}", i))),
        OperandRef::Node(id) => values
            .get(id.0)
            .ok_or_else(|| malformed(&format!("node #{} used before it was reduced", id.0))),
    }
}

fn malformed(msg: &str) -> EqRankError {
    EqRankError::MalformedEquation(msg.to_string())
}

#[derive(Debug, Clone)]
enum Item {
    Open,
    Close,
    Op(Operator),
    Operand { operand: OperandRef, label: String },
}

fn lex(tokens: &[&str], quantities: &QuantitySet) -> Result<Vec<Item>> {
    tokens
        .iter()
        .map(|t| match *t {
            "(" => Ok(Item::Open),
            ")" => Ok(Item::Close),
            "=" => Err(malformed("'=' inside one side")),
            other => match other.parse::<Operator>() {
                Ok(op) => Ok(Item::Op(op)),
                Err(_) => quantities
                    .index_of(other)
                    .map(|i| Item::Operand {
                        operand: OperandRef::Leaf(i),
                        label: other.to_string(),
                    })
                    .ok_or_else(|| EqRankError::UnknownOperand(other.to_string())),
            },
        })
        .collect()
}

// Finds the group to reduce next: the rightmost '(' with its matching ')'.
//
// The stack matcher rejects unbalanced input; for balanced input the match of
// the rightmost '(' is the first ')' after it.
fn innermost_group(items: &[Item]) -> Result<Option<(usize, usize)>> {
    let mut stack = Vec::new();
    let mut best: Option<(usize, usize)> = None;
    for (i, item) in items.iter().enumerate() {
        match item {
            Item::Open => stack.push(i),
            Item::Close => {
                let open = stack.pop().ok_or_else(|| malformed("unmatched ')'"))?;
                if best.map_or(true, |(o, _)| open > o) {
                    best = Some((open, i));
                }
            }
            _ => {}
        }
    }
    if !stack.is_empty() {
        return Err(malformed("unmatched '('"));
    }
    Ok(best)
}

fn triple(items: &[Item]) -> Result<(OperandRef, String, Operator, OperandRef, String)> {
    match items {
        [Item::Operand { operand: l, label: ll }, Item::Op(op), Item::Operand { operand: r, label: rl }] => {
            Ok((*l, ll.clone(), *op, *r, rl.clone()))
        }
        _ => Err(malformed(&format!(
            "expected 'operand operator operand', found {} tokens",
            items.len()
        ))),
    }
}

fn reduce_side(
    tokens: &[&str],
    quantities: &QuantitySet,
    nodes: &mut Vec<OperationNode>,
) -> Result<(OperandRef, String)> {
    let mut items = lex(tokens, quantities)?;
    if items.is_empty() {
        return Err(malformed("empty side"));
    }

    while items.len() > 1 {
        let span = match innermost_group(&items)? {
            Some((open, close)) => (open, close + 1, &items[open + 1..close]),
            None if items.len() >= 3 => (0, 3, &items[0..3]),
            None => return Err(malformed("dangling tokens")),
        };
        let (start, end, inner) = span;
        let (left, left_label, operator, right, right_label) = triple(inner)?;

        let id = NodeId(nodes.len());
        let label = format!("({}{}{})", left_label, operator.symbol(), right_label);
        nodes.push(OperationNode {
            id,
            operator,
            left,
            right,
            label: label.clone(),
        });
        items.splice(
            start..end,
            [Item::Operand {
                operand: OperandRef::Node(id),
                label,
            }],
        );
    }

    match items.pop() {
        Some(Item::Operand { operand, label }) => Ok((operand, label)),
        _ => Err(malformed("side does not reduce to an operand")),
    }
}
