//! Tests for expression tree reconstruction.

use proptest::prelude::*;

use super::*;
use crate::quantity::{Quantity, QuantitySet};

fn quantities(keys: &[&str]) -> QuantitySet {
    QuantitySet::new(
        keys.iter()
            .map(|k| {
                if *k == "x" {
                    Quantity::unknown(0)
                } else {
                    Quantity::number(k, 0).unwrap()
                }
            })
            .collect(),
    )
    .unwrap()
}

fn tokens(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

fn labels(tree: &EquationTree) -> Vec<&str> {
    tree.nodes().iter().map(|n| n.label.as_str()).collect()
}

#[test]
fn test_parenthesized_product() {
    let set = quantities(&["3", "x", "2", "70"]);
    let tree = EquationTree::build(&tokens("( 3 + x ) * 2 = 70"), &set).unwrap();

    assert_eq!(tree.len(), 3);
    let nodes = tree.nodes();
    assert_eq!(nodes[0].operator, Operator::Add);
    assert_eq!(nodes[0].left, OperandRef::Leaf(0));
    assert_eq!(nodes[0].right, OperandRef::Leaf(1));
    assert_eq!(nodes[0].label, "(3+x)");

    assert_eq!(nodes[1].operator, Operator::Mul);
    assert_eq!(nodes[1].left, OperandRef::Node(NodeId(0)));
    assert_eq!(nodes[1].right, OperandRef::Leaf(2));
    assert_eq!(nodes[1].label, "((3+x)*2)");

    assert!(nodes[2].is_equality());
    assert_eq!(nodes[2].left, OperandRef::Node(NodeId(1)));
    assert_eq!(nodes[2].right, OperandRef::Leaf(3));
}

#[test]
fn test_rightmost_group_reduced_first() {
    let set = quantities(&["1", "2", "3", "4", "x"]);
    let tree = EquationTree::build(&tokens("( 1 + 2 ) * ( 3 - 4 ) = x"), &set).unwrap();
    assert_eq!(
        labels(&tree),
        vec!["(3-4)", "(1+2)", "((1+2)*(3-4))", "((1+2)*(3-4))=x"]
    );
}

#[test]
fn test_nested_groups() {
    let set = quantities(&["100", "20", "x", "5"]);
    let tree = EquationTree::build(&tokens("( 100 - ( 20 * x ) ) / 5 = 4"), &set);
    // "4" is not a known quantity
    assert_eq!(tree, Err(EqRankError::UnknownOperand("4".into())));

    let set = quantities(&["100", "20", "x", "5", "4"]);
    let tree = EquationTree::build(&tokens("( 100 - ( 20 * x ) ) / 5 = 4"), &set).unwrap();
    assert_eq!(
        labels(&tree),
        vec!["(20*x)", "(100-(20*x))", "((100-(20*x))/5)", "((100-(20*x))/5)=4"]
    );
}

#[test]
fn test_unparenthesized_left_to_right() {
    let set = quantities(&["x", "10", "2", "3"]);
    let tree = EquationTree::build(&tokens("x = 10 - 2 * 3"), &set).unwrap();
    assert_eq!(labels(&tree), vec!["(10-2)", "((10-2)*3)", "x=((10-2)*3)"]);
    assert_eq!(tree.equality().left, OperandRef::Leaf(0));
}

#[test]
fn test_malformed_inputs() {
    let set = quantities(&["1", "2", "3", "x"]);
    let cases = [
        "( 1 + 2 = x",
        "1 + 2 ) = x",
        "( 1 + 2 + 3 ) = x",
        "( x ) = 1",
        "1 + = x",
        "1 + 2",
        "1 = 2 = x",
        "= x",
        "1 2 = x",
    ];
    for case in cases {
        let result = EquationTree::build(&tokens(case), &set);
        assert!(
            matches!(result, Err(EqRankError::MalformedEquation(_))),
            "{case:?} gave {result:?}"
        );
    }
}

#[test]
fn test_reduce_one_side() {
    let set = quantities(&["1", "2", "3", "x"]);
    let nodes = EquationTree::reduce_side(&tokens("1 * ( 2 + 3 )"), &set).unwrap();
    let labels: Vec<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["(2+3)", "(1*(2+3))"]);

    assert!(EquationTree::reduce_side(&tokens("x"), &set).unwrap().is_empty());
    assert!(EquationTree::reduce_side(&tokens("1 + 2 = x"), &set).is_err());
}

#[test]
fn test_unknown_operand() {
    let set = quantities(&["1", "x"]);
    let result = EquationTree::build(&tokens("1 + 9 = x"), &set);
    assert_eq!(result, Err(EqRankError::UnknownOperand("9".into())));
}

#[test]
fn test_evaluate() {
    let set = quantities(&["3", "x", "2", "70"]);
    let tree = EquationTree::build(&tokens("( 3 + x ) * 2 = 70"), &set).unwrap();
    let values = tree.evaluate(&set).unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[0].raw(), "(3 + x)");
    assert_eq!(values[1].raw(), "((3 + x) * 2)");
    assert_eq!(values[2].raw(), "(((3 + x) * 2) = 70)");

    let set = quantities(&["4", "5", "x"]);
    let tree = EquationTree::build(&tokens("4 * 5 = x"), &set).unwrap();
    let values = tree.evaluate(&set).unwrap();
    assert_eq!(values[0].value().numeric(), Some(20.0));
}

// Random fully parenthesized expressions over distinct operand keys.
#[derive(Debug, Clone)]
enum Expr {
    Leaf,
    Bin(Box<Expr>, &'static str, Box<Expr>),
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = Just(Expr::Leaf);
    leaf.prop_recursive(4, 16, 2, |inner| {
        (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/"]), inner)
            .prop_map(|(l, op, r)| Expr::Bin(Box::new(l), op, Box::new(r)))
    })
}

fn render(expr: &Expr, next: &mut usize, out: &mut Vec<String>, top: bool) {
    match expr {
        Expr::Leaf => {
            *next += 1;
            out.push(format!("{}", *next));
        }
        Expr::Bin(l, op, r) => {
            if !top {
                out.push("(".into());
            }
            render(l, next, out, false);
            out.push((*op).into());
            render(r, next, out, false);
            if !top {
                out.push(")".into());
            }
        }
    }
}

proptest! {
    #[test]
    fn node_count_matches_operator_count(expr in arb_expr()) {
        let mut next = 0;
        let mut toks = Vec::new();
        render(&expr, &mut next, &mut toks, true);
        toks.push("=".into());
        toks.push("x".into());

        let mut keys: Vec<String> = (1..=next).map(|i| i.to_string()).collect();
        keys.push("x".into());
        let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let set = quantities(&key_refs);

        let tree = EquationTree::build(&toks, &set).unwrap();
        let operators = toks.iter().filter(|t| ["+", "-", "*", "/"].contains(&t.as_str())).count();
        prop_assert_eq!(tree.len(), operators + 1);

        // bottom-up: node operands only refer to earlier nodes
        for node in tree.nodes() {
            for operand in [node.left, node.right] {
                if let OperandRef::Node(id) = operand {
                    prop_assert!(id < node.id);
                }
            }
        }

        // deterministic
        let again = EquationTree::build(&toks, &set).unwrap();
        prop_assert_eq!(tree, again);
    }
}
