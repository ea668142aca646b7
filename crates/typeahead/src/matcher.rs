//! Candidate matching.
//!
//! Matching is a pure prefix filter: a candidate is suggested when it begins
//! with the query. No ranking happens and no limit is applied; the store's
//! relative order is kept and the presentation surface decides how much of
//! the list to show.
//!
//! # Length and casing
//!
//! Lengths are counted in Unicode scalar values (`char`s). Case-insensitive
//! comparison is done one character at a time using Unicode's full lower- and
//! upper-case mappings, so the matched part of every suggestion spans exactly
//! as many characters as the query.

use typeahead_core::logging::targets;

use crate::candidates::CandidateStore;

/// Controls how completion matching handles letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    /// Case-sensitive matching (e.g., "App" won't match "apple").
    CaseSensitive,
    /// Case-insensitive matching (e.g., "App" will match "apple").
    #[default]
    CaseInsensitive,
}

/// One matched candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    value: String,
    prefix_len: usize,
}

impl Suggestion {
    /// The full candidate string. This is what gets committed on selection.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Number of leading characters that matched the query.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// The matched part, in the candidate's own casing.
    pub fn bold_prefix(&self) -> &str {
        &self.value[..self.split_at()]
    }

    /// Everything after the matched part.
    pub fn remainder(&self) -> &str {
        &self.value[self.split_at()..]
    }

    /// Build the display form handed to the presentation surface.
    pub fn to_entry(&self) -> SuggestionEntry {
        SuggestionEntry {
            bold_prefix: self.bold_prefix().to_string(),
            remainder: self.remainder().to_string(),
            tag: self.value.clone(),
        }
    }

    fn split_at(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.prefix_len)
            .map_or(self.value.len(), |(index, _)| index)
    }
}

/// A drop-down row as the presentation surface renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionEntry {
    /// Matched prefix, typically drawn emphasized.
    pub bold_prefix: String,
    /// Unmatched rest of the candidate.
    pub remainder: String,
    /// The full candidate value carried by the row.
    pub tag: String,
}

/// Match `query` against `candidates`.
///
/// Returns an empty list when the query has fewer than `threshold` characters
/// or there are no candidates. Otherwise returns every candidate that starts
/// with the query, in store order.
pub fn match_candidates(
    query: &str,
    candidates: Option<&CandidateStore>,
    threshold: usize,
    case_sensitivity: CaseSensitivity,
) -> Vec<Suggestion> {
    let query_len = query.chars().count();
    let Some(candidates) = candidates else {
        tracing::trace!(target: targets::MATCHER, "no candidate source");
        return Vec::new();
    };
    if query_len < threshold || candidates.is_empty() {
        return Vec::new();
    }

    let matches: Vec<Suggestion> = candidates
        .iter()
        .filter(|candidate| starts_with(candidate, query, case_sensitivity))
        .map(|candidate| Suggestion {
            value: candidate.to_string(),
            prefix_len: query_len,
        })
        .collect();

    tracing::trace!(
        target: targets::MATCHER,
        query,
        candidates = candidates.len(),
        matches = matches.len(),
        "matched candidates"
    );
    matches
}

/// Whether `candidate` begins with `prefix` under the given case rule.
pub fn starts_with(candidate: &str, prefix: &str, case_sensitivity: CaseSensitivity) -> bool {
    let mut candidate_chars = candidate.chars();
    prefix.chars().all(|p| {
        candidate_chars
            .next()
            .is_some_and(|c| chars_equal(c, p, case_sensitivity))
    })
}

fn chars_equal(a: char, b: char, case_sensitivity: CaseSensitivity) -> bool {
    if a == b {
        return true;
    }
    match case_sensitivity {
        CaseSensitivity::CaseSensitive => false,
        CaseSensitivity::CaseInsensitive => {
            a.to_lowercase().eq(b.to_lowercase()) || a.to_uppercase().eq(b.to_uppercase())
        }
    }
}
