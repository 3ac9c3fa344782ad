use super::cell::NumberFormat;
use super::value::Value;

/// Format a computed value for display under a cell's number format.
///
/// Only numbers are affected by the format; text is shown as is.
pub fn format_value(value: &Value, number_format: Option<NumberFormat>) -> String {
    match (value, number_format) {
        (Value::Number(n), Some(NumberFormat::Currency)) => format_currency(*n),
        (Value::Number(n), Some(NumberFormat::Percent)) => format!("{:.2}%", n * 100.0),
        _ => value.to_string(),
    }
}

/// Format a number as US dollars with thousands separators: `-$1,234.50`.
pub fn format_currency(n: f64) -> String {
    let fixed = format!("{:.2}", n.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if n < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
