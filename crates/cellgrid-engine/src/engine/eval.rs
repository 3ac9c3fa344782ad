//! Formula evaluation.
//!
//! A formula body is either a call to one of the built-in functions
//! (`SUM(A1:A3, 4)`) or an arithmetic expression over numbers and cell
//! references (`A1*2+B1`). Evaluation never fails outward: anything that goes
//! wrong yields the `#ERROR` sentinel.

use regex::Regex;
use std::sync::OnceLock;

use super::arith::evaluate_arithmetic;
use super::cell::Grid;
use super::cell_ref::{CellRef, is_reference};
use super::range::expand_range;
use super::value::{Value, parse_number};
use crate::builtins;

fn function_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_]+)\((.*)\)$").expect("function call regex must compile")
    })
}

fn numeric_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("literal regex must compile"))
}

/// Evaluate a formula body (the text after `=`) against the grid.
///
/// Returns `None` when the formula has no value: an unknown function, an
/// aggregate over no numbers, or an empty body.
pub fn evaluate_formula(body: &str, grid: &Grid) -> Option<Value> {
    if let Some(caps) = function_call_re().captures(body) {
        let name = &caps[1];
        let Some(builtin) = builtins::lookup(name) else {
            tracing::debug!(function = name, "unknown function");
            return None;
        };
        let args: Vec<Option<Value>> = split_arguments(&caps[2])
            .iter()
            .flat_map(|arg| {
                if arg.contains(':') {
                    expand_range(arg)
                } else {
                    vec![arg.clone()]
                }
            })
            .map(|arg| resolve_argument(&arg, grid))
            .collect();
        return (builtin.call)(&args);
    }

    if body.trim().is_empty() {
        return None;
    }
    match evaluate_arithmetic(body, |id| numeric_reference(id, grid)) {
        Ok(n) => Some(Value::Number(n)),
        Err(err) => {
            tracing::debug!(formula = body, error = %err, "formula evaluation failed");
            Some(Value::error())
        }
    }
}

/// Split an argument list on commas that are not inside quotes.
///
/// Quote characters stay in their segment. Segments are trimmed; a trailing
/// empty segment is dropped, so `""` yields no arguments.
pub fn split_arguments(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in args.chars() {
        match c {
            '"' | '\'' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn unquote(text: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find_map(|q| text.strip_prefix(q)?.strip_suffix(q))
}

/// Resolve one function argument: a numeric literal, a quoted string, or a
/// cell reference. Missing cells resolve to `None`.
pub fn resolve_argument(text: &str, grid: &Grid) -> Option<Value> {
    if numeric_literal_re().is_match(text) {
        return text.parse::<f64>().ok().map(Value::Number);
    }
    if let Some(inner) = unquote(text) {
        return Some(Value::Text(inner.to_string()));
    }
    resolve_reference(text, grid)
}

/// The value a cell contributes to a formula: its cached result if it has one
/// (numeric-looking text becomes a number), otherwise its raw value read as a
/// number when possible.
pub fn resolve_reference(id: &str, grid: &Grid) -> Option<Value> {
    if !is_reference(id) {
        return None;
    }
    let cell = grid.get(&CellRef::parse(id).ok()?)?;
    if let Some(computed) = &cell.computed {
        return Some(computed.clone().coerce_numeric());
    }
    Some(match parse_number(&cell.value) {
        Some(n) => Value::Number(n),
        None => Value::Text(cell.value.clone()),
    })
}

/// Numeric value of a reference inside an arithmetic expression; anything
/// missing or non-numeric counts as 0.
fn numeric_reference(id: &str, grid: &Grid) -> f64 {
    match resolve_reference(id, grid) {
        Some(Value::Number(n)) => n,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Cell;
    use pretty_assertions::assert_eq;

    fn grid(entries: &[(&str, &str)]) -> Grid {
        let mut grid = Grid::new();
        for (id, raw) in entries {
            let mut cell = Cell::default();
            cell.set_raw(raw);
            grid.insert(CellRef::parse(id).unwrap(), cell);
        }
        grid
    }

    #[test]
    fn test_split_arguments_respects_quotes() {
        assert_eq!(split_arguments("A1, \"a,b\" ,'c'"), vec!["A1", "\"a,b\"", "'c'"]);
        assert_eq!(split_arguments(""), Vec::<String>::new());
        assert_eq!(split_arguments("A1,"), vec!["A1"]);
        assert_eq!(split_arguments(",A1"), vec!["", "A1"]);
    }

    #[test]
    fn test_sum_over_mixed_range() {
        let g = grid(&[("A1", "2"), ("A2", "x"), ("A3", "4")]);
        assert_eq!(evaluate_formula("SUM(A1:A3)", &g), Some(Value::Number(6.0)));
    }

    #[test]
    fn test_functions_mix_literals_and_ranges() {
        let g = grid(&[("A1", "1"), ("B1", "2")]);
        assert_eq!(
            evaluate_formula("SUM(A1:B1, 10, -2.5)", &g),
            Some(Value::Number(10.5))
        );
        assert_eq!(evaluate_formula("COUNT(C1:C5)", &g), Some(Value::Number(0.0)));
        assert_eq!(evaluate_formula("AVERAGE(C1:C5)", &g), None);
        assert_eq!(evaluate_formula("SUM()", &g), None);
    }

    #[test]
    fn test_text_functions_and_quoted_literals() {
        let g = grid(&[("A1", "  padded  ")]);
        assert_eq!(evaluate_formula("TRIM(A1)", &g), Some(Value::from("padded")));
        assert_eq!(
            evaluate_formula("UPPER(\"hello, world\")", &g),
            Some(Value::from("HELLO, WORLD"))
        );
        assert_eq!(evaluate_formula("LOWER('ABC')", &g), Some(Value::from("abc")));
    }

    #[test]
    fn test_unknown_function_is_inert() {
        let g = grid(&[("A1", "1")]);
        assert_eq!(evaluate_formula("FOO(A1)", &g), None);
        assert_eq!(evaluate_formula("sum(A1)", &g), None);
    }

    #[test]
    fn test_computed_values_are_preferred() {
        let mut g = grid(&[("A1", "=1+1"), ("A2", "=UPPER(\"x\")")]);
        g.get_mut(&CellRef::parse("A1").unwrap()).unwrap().computed = Some(Value::from("2"));
        g.get_mut(&CellRef::parse("A2").unwrap()).unwrap().computed = Some(Value::from("X"));
        assert_eq!(resolve_reference("A1", &g), Some(Value::Number(2.0)));
        assert_eq!(resolve_reference("A2", &g), Some(Value::from("X")));
        assert_eq!(resolve_reference("a1", &g), None);
        assert_eq!(resolve_reference("B9", &g), None);
    }

    #[test]
    fn test_arithmetic_fallback() {
        let g = grid(&[("A1", "3"), ("B1", "text"), ("C1", "-2")]);
        assert_eq!(evaluate_formula("A1*2+1", &g), Some(Value::Number(7.0)));
        assert_eq!(evaluate_formula("A1+B1+Z99", &g), Some(Value::Number(3.0)));
        assert_eq!(evaluate_formula("A1-C1", &g), Some(Value::Number(5.0)));
        assert_eq!(evaluate_formula("5", &g), Some(Value::Number(5.0)));
    }

    #[test]
    fn test_failures_become_error_sentinel() {
        let g = Grid::new();
        assert_eq!(evaluate_formula("1/0", &g), Some(Value::error()));
        assert_eq!(evaluate_formula("1+", &g), Some(Value::error()));
        assert_eq!(evaluate_formula("alert(1)+", &g), Some(Value::error()));
        assert_eq!(evaluate_formula("", &g), None);
    }

    #[test]
    fn test_pathological_nesting_is_an_error_not_a_crash() {
        let g = Grid::new();
        let deep = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
        assert_eq!(evaluate_formula(&deep, &g), Some(Value::error()));
        let signs = format!("{}1", "-".repeat(200_000));
        assert_eq!(evaluate_formula(&signs, &g), Some(Value::Number(1.0)));
    }
}
