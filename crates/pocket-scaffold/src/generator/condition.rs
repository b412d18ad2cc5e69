//! Dotted-path conditions gating structure items and actions
//!
//! A condition is a single lookup such as `features.testing`. There is no
//! negation or boolean algebra; manifests needing more expose a feature flag.

use super::context::ContextValue;

/// Resolve a dotted path, returning `None` as soon as a segment is missing
pub fn lookup<'a>(value: &'a ContextValue, segments: &[&str]) -> Option<&'a ContextValue> {
    match segments.split_first() {
        None => Some(value),
        Some((head, rest)) => lookup(value.get(head.trim())?, rest),
    }
}

/// Evaluate a condition against the context; missing paths are false
///
/// An empty condition string always holds.
pub fn evaluate_condition(condition: &str, context: &ContextValue) -> bool {
    let condition = condition.trim();
    if condition.is_empty() {
        return true;
    }

    let segments: Vec<&str> = condition.split('.').collect();
    lookup(context, &segments)
        .map(ContextValue::is_truthy)
        .unwrap_or(false)
}

/// Evaluate an optional condition; an absent condition always holds
pub fn condition_holds(condition: Option<&str>, context: &ContextValue) -> bool {
    condition.map_or(true, |c| evaluate_condition(c, context))
}
