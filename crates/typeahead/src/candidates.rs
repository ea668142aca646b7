//! Candidate store: the host-supplied pool of completion strings.

use std::sync::Arc;

/// An immutable, ordered snapshot of candidate strings.
///
/// The store is never mutated in place. Hosts replace it wholesale, and a
/// match cycle that already holds a snapshot keeps seeing the old contents.
/// Cloning is cheap (reference counted).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateStore {
    items: Arc<[String]>,
}

impl CandidateStore {
    /// Create a store from an ordered list of candidates.
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Create an empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store has no candidates.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate candidates in store order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Get the candidates as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl From<Vec<String>> for CandidateStore {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}

impl From<Vec<&str>> for CandidateStore {
    fn from(items: Vec<&str>) -> Self {
        items.into_iter().collect()
    }
}

impl From<&[&str]> for CandidateStore {
    fn from(items: &[&str]) -> Self {
        items.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for CandidateStore {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

static_assertions::assert_impl_all!(CandidateStore: Send, Sync);
