// src/similarity.rs
//! Near-duplicate titles across sources.
//!
//! Heuristic word overlap, not Jaccard: every whitespace token of `a`
//! (repeats included) that occurs anywhere in `b` counts once, and the count
//! is divided by the longer token list. Not strictly symmetric when `a` repeats
//! words.

use std::collections::HashSet;

pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.7;

fn tokens(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_lowercase).collect()
}

/// Overlap ratio in `[0, 1]`; two empty titles score 0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let ta = tokens(a);
    let tb = tokens(b);
    let longest = ta.len().max(tb.len());
    if longest == 0 {
        return 0.0;
    }
    let in_b: HashSet<&str> = tb.iter().map(String::as_str).collect();
    let shared = ta.iter().filter(|t| in_b.contains(t.as_str())).count();
    (shared as f64 / longest as f64).min(1.0)
}

/// Strictly above `threshold` counts as the same story.
pub fn is_duplicate(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) > threshold
}

/// Keep the first of every near-duplicate group, preserving order.
/// Returns the survivors and how many were dropped.
pub fn dedup_by_title<T, F>(items: Vec<T>, threshold: f64, title: F) -> (Vec<T>, usize)
where
    F: Fn(&T) -> &str,
{
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for it in items {
        let dup = kept
            .iter()
            .any(|k| is_duplicate(title(&it), title(k), threshold));
        if dup {
            dropped += 1;
        } else {
            kept.push(it);
        }
    }
    (kept, dropped)
}
