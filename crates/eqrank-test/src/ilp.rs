//! Solver output text fixtures.

/// Header lines written before the solution rows.
pub const HEADER: &str = "TOTAL 6 solutions found\n\
    parameters: n=3 l=1 k=2 p=0 q=0 m=0\n\
    SOLN: CORRECT | POS/NEG | INT/FRA | OBJ-SCORE | TRUE-ANS | ANS | INFIX | POSTFIX | TYPED-POSTFIX\n";

/// Trailing summary line.
pub const TRAILER: &str = "NET 5 unique, non-negative solutions found out of 6 total solutions\n";

/// One `EXPR:` row.
pub fn row(correct: bool, objective: i64, answer: &str, infix: &str) -> String {
    format!(
        "EXPR: {} | POS | FRA | {} | 17.5 | {} | {} | - | -\n",
        u8::from(correct),
        objective,
        answer,
        infix
    )
}

/// Complete output file from `(correct, objective, answer, infix)` rows.
pub fn output(rows: &[(bool, i64, &str, &str)]) -> String {
    let mut text = String::from(HEADER);
    for (correct, objective, answer, infix) in rows {
        text.push_str(&row(*correct, *objective, answer, infix));
    }
    text.push_str(TRAILER);
    text
}

/// Solver output for [`crate::percent_problem`].
///
/// Holds a duplicate of the first equation and one row naming an unknown
/// quantity.
pub fn percent_output() -> String {
    output(&[
        (true, 0, "17.5", "70*0.25=x"),
        (false, 1, "69.75", "70-0.25=x"),
        (true, 2, "17.5", "0.25*70=x"),
        (false, 3, "280", "70/0.25=x"),
        (true, 4, "17.5", "70*0.25=x"),
        (false, 5, "72", "70+2=x"),
    ])
}

/// Solver output for [`crate::sum_problem`].
pub fn sum_output() -> String {
    output(&[
        (true, 0, "8", "5+3=x"),
        (false, 1, "2", "5-3=x"),
        (false, 2, "15", "5*3=x"),
        (true, 3, "8", "3+5=x"),
    ])
}
