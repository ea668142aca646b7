//! Property tests for matching and debounce coalescing.

use std::time::Duration;

use quickcheck::{QuickCheck, TestResult};
use typeahead::matcher::{match_candidates, starts_with};
use typeahead::prelude::*;

fn store(items: &[String]) -> CandidateStore {
    items.iter().cloned().collect()
}

#[test]
fn test_prop_every_match_starts_with_query() {
    fn prop(query: String, items: Vec<String>) -> bool {
        let candidates = store(&items);
        match_candidates(&query, Some(&candidates), 0, CaseSensitivity::CaseInsensitive)
            .iter()
            .all(|s| starts_with(s.value(), &query, CaseSensitivity::CaseInsensitive))
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String, Vec<String>) -> bool);
}

#[test]
fn test_prop_matches_keep_store_order() {
    fn prop(query: String, items: Vec<String>) -> bool {
        let candidates = store(&items);
        let expected: Vec<&str> = items
            .iter()
            .map(String::as_str)
            .filter(|item| starts_with(item, &query, CaseSensitivity::CaseInsensitive))
            .collect();
        let actual = match_candidates(&query, Some(&candidates), 0, CaseSensitivity::CaseInsensitive);
        actual.iter().map(|s| s.value()).eq(expected)
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String, Vec<String>) -> bool);
}

#[test]
fn test_prop_short_query_matches_nothing() {
    fn prop(query: String, items: Vec<String>, extra: u8) -> TestResult {
        let threshold = query.chars().count() + 1 + usize::from(extra % 4);
        let candidates = store(&items);
        TestResult::from_bool(
            match_candidates(&query, Some(&candidates), threshold, CaseSensitivity::CaseInsensitive)
                .is_empty(),
        )
    }
    QuickCheck::new().quickcheck(prop as fn(String, Vec<String>, u8) -> TestResult);
}

#[test]
fn test_prop_display_split_rebuilds_value() {
    fn prop(query: String, items: Vec<String>) -> bool {
        let candidates = store(&items);
        let query_len = query.chars().count();
        match_candidates(&query, Some(&candidates), 0, CaseSensitivity::CaseInsensitive)
            .iter()
            .all(|s| {
                let entry = s.to_entry();
                s.prefix_len() == query_len
                    && format!("{}{}", entry.bold_prefix, entry.remainder) == entry.tag
                    && entry.bold_prefix.chars().count() == query_len
            })
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String, Vec<String>) -> bool);
}

#[test]
fn test_prop_ascii_case_does_not_matter() {
    fn prop(query: String, items: Vec<String>) -> TestResult {
        if !query.is_ascii() {
            return TestResult::discard();
        }
        let candidates = store(&items);
        let lower = match_candidates(
            &query.to_ascii_lowercase(),
            Some(&candidates),
            0,
            CaseSensitivity::CaseInsensitive,
        );
        let upper = match_candidates(
            &query.to_ascii_uppercase(),
            Some(&candidates),
            0,
            CaseSensitivity::CaseInsensitive,
        );
        let values = |matches: &[Suggestion]| matches.iter().map(|s| s.value().to_string()).collect::<Vec<_>>();
        TestResult::from_bool(values(&lower) == values(&upper))
    }
    QuickCheck::new()
        .tests(200)
        .max_tests(1000)
        .quickcheck(prop as fn(String, Vec<String>) -> TestResult);
}

#[test]
fn test_prop_matching_is_repeatable() {
    fn prop(query: String, items: Vec<String>, threshold: u8) -> bool {
        let candidates = store(&items);
        let threshold = usize::from(threshold % 4);
        let first = match_candidates(&query, Some(&candidates), threshold, CaseSensitivity::CaseInsensitive);
        let second = match_candidates(&query, Some(&candidates), threshold, CaseSensitivity::CaseInsensitive);
        first == second
    }
    QuickCheck::new().quickcheck(prop as fn(String, Vec<String>, u8) -> bool);
}

/// Counts match cycles that put rows on screen.
#[derive(Default)]
struct CountingSurface {
    cycles: usize,
}

impl PresentationSurface for CountingSurface {
    fn render_suggestions(&mut self, entries: &[SuggestionEntry]) {
        if !entries.is_empty() {
            self.cycles += 1;
        }
    }

    fn set_drop_down_open(&mut self, _open: bool) {}

    fn set_selected_index(&mut self, _index: Option<usize>) {}

    fn set_field_text(&mut self, _text: &str) {}
}

#[test]
fn test_prop_one_cycle_per_pause() {
    const DELAY_MS: u64 = 300;

    fn prop(gaps: Vec<u16>) -> TestResult {
        if gaps.len() > 40 {
            return TestResult::discard();
        }
        let gaps: Vec<u64> = gaps.iter().map(|gap| u64::from(*gap % 600)).collect();

        let clock = ManualClock::new();
        let timer_clock = clock.clone();
        let config = AutoCompleteConfig::default()
            .with_delay(Duration::from_millis(DELAY_MS))
            .with_threshold(0)
            .unwrap();
        let mut text_box = AutoCompleteTextBox::with_timer(
            CountingSurface::default(),
            config,
            move |handler| ManualDebounceTimer::new(&timer_clock, handler),
        )
        .unwrap();
        text_box.set_candidates(vec!["x".repeat(64)]);

        let mut query = String::from("x");
        text_box.on_user_input(query.clone());
        for gap in &gaps {
            clock.advance(Duration::from_millis(*gap));
            text_box.process_events();
            query.push('x');
            text_box.on_user_input(query.clone());
        }
        clock.advance(Duration::from_millis(DELAY_MS));
        text_box.process_events();

        let pauses = gaps.iter().filter(|gap| **gap >= DELAY_MS).count();
        TestResult::from_bool(text_box.surface().cycles == pauses + 1)
    }
    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<u16>) -> TestResult);
}
