//! Fuzzy title search and display ordering for the snippet list.

use crate::models::{settings::SortMode, snippet::Snippet};
use std::cmp::Ordering;

/// Highest normalized edit distance still counted as a match.
pub const MATCH_THRESHOLD: f64 = 0.4;

/// Score how well `query` matches somewhere inside `title`.
///
/// The score is the smallest edit distance between the query and any
/// substring of the title, divided by the query length; `0.0` is an exact
/// (case-insensitive) substring hit.
///
/// # Returns
/// `Some(score)` when the score is within [`MATCH_THRESHOLD`], else `None`.
pub fn fuzzy_score(query: &str, title: &str) -> Option<f64> {
    let pattern: Vec<char> = query.trim().to_lowercase().chars().collect();
    if pattern.is_empty() {
        return Some(0.0);
    }
    let text: Vec<char> = title.to_lowercase().chars().collect();

    // Column per pattern prefix; row 0 is free so a match may start anywhere.
    let mut previous: Vec<usize> = (0..=pattern.len()).collect();
    let mut best = previous[pattern.len()];
    for &text_char in &text {
        let mut current = vec![0usize; pattern.len() + 1];
        for (i, &pattern_char) in pattern.iter().enumerate() {
            let substitution = previous[i] + usize::from(pattern_char != text_char);
            let deletion = previous[i + 1] + 1;
            let insertion = current[i] + 1;
            current[i + 1] = substitution.min(deletion).min(insertion);
        }
        best = best.min(current[pattern.len()]);
        previous = current;
    }

    let score = best as f64 / pattern.len() as f64;
    (score <= MATCH_THRESHOLD).then_some(score)
}

/// Filter snippets by fuzzy title match, best match first.
///
/// A blank query returns every snippet in store order. Ties keep store order.
pub fn search<'a>(snippets: &'a [Snippet], query: &str) -> Vec<&'a Snippet> {
    if query.trim().is_empty() {
        return snippets.iter().collect();
    }
    let mut hits: Vec<(f64, &Snippet)> = snippets
        .iter()
        .filter_map(|snippet| fuzzy_score(query, &snippet.title).map(|score| (score, snippet)))
        .collect();
    hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    hits.into_iter().map(|(_, snippet)| snippet).collect()
}

/// Apply the user's sort preference to a list about to be displayed.
pub fn display_order(mut snippets: Vec<&Snippet>, sort: SortMode) -> Vec<&Snippet> {
    if sort == SortMode::Alpha {
        snippets.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title))
        });
    }
    snippets
}
