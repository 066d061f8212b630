//! Value resolution for combined operands.

use crate::operator::Operator;
use crate::quantity::{Position, Quantity, QuantityValue};

/// Combines two operands into the quantity produced by `operator`.
///
/// Two literal numbers are evaluated directly (`left - right`, `left / right`).
/// Anything else, including division by zero, is deferred as the symbolic
/// expression `(left op right)`. Never fails.
///
/// The result takes the unit shared by both operands, or the first unit
/// present, and the mentions of both operands.
///
/// # Example
///
/// ```
/// use eqrank_core::{combine, Operator, Quantity};
///
/// let three = Quantity::number("3", 0).unwrap();
/// let x = Quantity::unknown(1);
/// let sum = combine(&three, &x, Operator::Add);
/// assert_eq!(sum.raw(), "(3 + x)");
///
/// let two = Quantity::number("2", 0).unwrap();
/// assert_eq!(combine(&three, &two, Operator::Sub).value().numeric(), Some(1.0));
/// ```
pub fn combine(left: &Quantity, right: &Quantity, operator: Operator) -> Quantity {
    let value = match (left.value().numeric(), right.value().numeric()) {
        (Some(l), Some(r)) => evaluate(l, r, operator)
            .map(QuantityValue::from_f64)
            .unwrap_or_else(|| symbolic(left, right, operator)),
        _ => symbolic(left, right, operator),
    };

    let unit = match (left.unit(), right.unit()) {
        (Some(l), Some(r)) if l == r => Some(l.to_string()),
        (Some(l), _) => Some(l.to_string()),
        (None, r) => r.map(str::to_string),
    };

    let mut positions: Vec<Position> = left.positions().to_vec();
    for p in right.positions() {
        if !positions.contains(p) {
            positions.push(*p);
        }
    }

    let key = format!("({}{}{})", left.key(), operator.symbol(), right.key());
    Quantity::new(key, value, unit, positions)
}

fn evaluate(l: f64, r: f64, operator: Operator) -> Option<f64> {
    let result = match operator {
        Operator::Add => l + r,
        Operator::Sub => l - r,
        Operator::Mul => l * r,
        Operator::Div if r == 0.0 => return None,
        Operator::Div => l / r,
        Operator::Eq => return None,
    };
    result.is_finite().then_some(result)
}

fn symbolic(left: &Quantity, right: &Quantity, operator: Operator) -> QuantityValue {
    QuantityValue::Symbolic {
        expr: format!("({} {} {})", left.raw(), operator.symbol(), right.raw()),
    }
}
