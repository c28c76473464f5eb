//! Predicate builders for the backend's select-style query language.
//!
//! Builders return `None` when there is nothing to constrain, so callers can
//! collect optional clauses and let the combinators drop the empty ones.

use std::fmt::Display;

/// Single-quoted literal with `\` and `'` escaped.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// `field contains 'value'`
pub fn contains(field: &str, value: &str) -> String {
    format!("{field} contains {}", quote(value))
}

/// `(field contains 'a' OR field contains 'b' ...)`, or `None` for no values.
pub fn contains_any(field: &str, values: &[String]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let preds: Vec<String> = values.iter().map(|v| contains(field, v)).collect();
    Some(format!("({})", preds.join(" OR ")))
}

/// Numeric range: two-sided `range(...)`, one-sided `>=`/`<=`, or nothing.
pub fn range<T: Display>(field: &str, lo: Option<T>, hi: Option<T>) -> Option<String> {
    match (lo, hi) {
        (Some(lo), Some(hi)) => Some(format!("(range({field}, {lo}, {hi}))")),
        (Some(lo), None) => Some(format!("({field} >= {lo})")),
        (None, Some(hi)) => Some(format!("({field} <= {hi})")),
        (None, None) => None,
    }
}

/// Conjunction of the given clauses, parenthesized; `None` when empty.
pub fn all_of(clauses: Vec<String>) -> Option<String> {
    join(clauses, " AND ")
}

/// Ranked, non-exclusionary OR evaluated against the top `target_hits` by this signal.
pub fn weak_and(target_hits: u32, preds: Vec<String>) -> Option<String> {
    if preds.is_empty() {
        return None;
    }
    Some(format!("({{targetHits:{target_hits}}}weakAnd({}))", preds.join(",")))
}

/// Approximate nearest-neighbor match of `index` against query tensor `tensor`.
pub fn nearest_neighbor(index: &str, tensor: &str, target_hits: u32) -> String {
    format!("({{targetHits:{target_hits}}}nearestNeighbor({index},{tensor}))")
}

/// Backend-side embedding directive for a query tensor input.
pub fn embed(model: &str, text: &str) -> String {
    format!("embed({model},{})", quote(text))
}

/// `input.query(<name>)`
pub fn query_input(name: &str) -> String {
    format!("input.query({name})")
}

fn join(clauses: Vec<String>, sep: &str) -> Option<String> {
    if clauses.is_empty() {
        return None;
    }
    Some(format!("({})", clauses.join(sep)))
}
