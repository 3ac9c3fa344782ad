//! Built-in spreadsheet functions and their metadata.
//!
//! Conventions:
//! - Names are ALL CAPS and matched case-sensitively (`SUM`, not `sum`).
//! - Every function receives its resolved arguments in order, with `None`
//!   standing for an empty cell, and returns `None` for "no value".

use crate::engine::{Value, parse_number};

pub type BuiltinFn = fn(&[Option<Value>]) -> Option<Value>;

pub struct Builtin {
    pub name: &'static str,
    pub description: &'static str,
    pub call: BuiltinFn,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        description: "Sum of the numeric arguments",
        call: sum,
    },
    Builtin {
        name: "AVERAGE",
        description: "Arithmetic mean of the numeric arguments",
        call: average,
    },
    Builtin {
        name: "MAX",
        description: "Largest numeric argument",
        call: max,
    },
    Builtin {
        name: "MIN",
        description: "Smallest numeric argument",
        call: min,
    },
    Builtin {
        name: "COUNT",
        description: "Number of numeric arguments",
        call: count,
    },
    Builtin {
        name: "TRIM",
        description: "First argument as text without surrounding whitespace",
        call: trim,
    },
    Builtin {
        name: "UPPER",
        description: "First argument as upper-case text",
        call: upper,
    },
    Builtin {
        name: "LOWER",
        description: "First argument as lower-case text",
        call: lower,
    },
];

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// Numeric view of the arguments: numbers, plus text that reads as a number.
fn numbers(args: &[Option<Value>]) -> Vec<f64> {
    args.iter()
        .flatten()
        .filter_map(|value| match value {
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_number(s),
        })
        .collect()
}

fn aggregate(args: &[Option<Value>], f: impl FnOnce(&[f64]) -> f64) -> Option<Value> {
    let nums = numbers(args);
    if nums.is_empty() {
        None
    } else {
        Some(Value::Number(f(&nums)))
    }
}

fn sum(args: &[Option<Value>]) -> Option<Value> {
    aggregate(args, |nums| nums.iter().sum())
}

fn average(args: &[Option<Value>]) -> Option<Value> {
    aggregate(args, |nums| nums.iter().sum::<f64>() / nums.len() as f64)
}

fn max(args: &[Option<Value>]) -> Option<Value> {
    aggregate(args, |nums| nums.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

fn min(args: &[Option<Value>]) -> Option<Value> {
    aggregate(args, |nums| nums.iter().copied().fold(f64::INFINITY, f64::min))
}

fn count(args: &[Option<Value>]) -> Option<Value> {
    Some(Value::Number(numbers(args).len() as f64))
}

/// Text form of the first argument; an empty cell reads as "".
fn first_text(args: &[Option<Value>]) -> Option<String> {
    let first = args.first()?;
    Some(first.as_ref().map(|v| v.to_string()).unwrap_or_default())
}

fn trim(args: &[Option<Value>]) -> Option<Value> {
    first_text(args).map(|s| Value::Text(s.trim().to_string()))
}

fn upper(args: &[Option<Value>]) -> Option<Value> {
    first_text(args).map(|s| Value::Text(s.to_uppercase()))
}

fn lower(args: &[Option<Value>]) -> Option<Value> {
    first_text(args).map(|s| Value::Text(s.to_lowercase()))
}
