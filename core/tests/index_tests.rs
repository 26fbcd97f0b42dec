use index_core::{IndexError, InvertedIndex, WordDetails};
use std::collections::BTreeSet;

fn sense(word: &str) -> Vec<WordDetails> {
    vec![WordDetails::new(word, "n.", format!("Definition of {word}."))]
}

/// apple:4 pages, avocado:2, banana:2, cherry:1, date:1, elder:3
fn sample() -> InvertedIndex {
    let idx = InvertedIndex::new();
    for (word, pages) in [("apple", 4u32), ("avocado", 2), ("banana", 2), ("cherry", 1), ("date", 1), ("elder", 3)] {
        for page in 1..=pages {
            idx.add_index(word, page, &sense(word));
        }
    }
    idx
}

#[test]
fn repeated_insert_is_idempotent() {
    let idx = sample();
    let before = idx.get_frequency("apple");
    assert!(!idx.add_index("apple", 1, &sense("apple")));
    assert_eq!(idx.get_frequency("apple"), before);
}

#[test]
fn frequency_counts_distinct_pages() {
    let idx = InvertedIndex::new();
    for _ in 0..5 {
        idx.add_index("java", 7, &sense("java"));
    }
    assert_eq!(idx.get_frequency("java"), 1);
    assert_eq!(idx.get_frequency("missing"), 0);
}

#[test]
fn headings_sorted_both_ways() {
    let idx = sample();
    let asc = idx.get_headings_asc();
    assert_eq!(asc, vec!["apple", "avocado", "banana", "cherry", "date", "elder"]);
    let mut desc = idx.get_headings_desc();
    desc.reverse();
    assert_eq!(desc, asc);
}

#[test]
fn frequency_ranking_covers_every_heading() {
    let idx = sample();
    let asc = idx.sort_frequency(true);
    let desc = idx.sort_frequency(false);
    assert_eq!(asc.len(), idx.indices_total());
    assert_eq!(desc.len(), idx.indices_total());
    assert_eq!(asc, vec!["cherry", "date", "avocado", "banana", "elder", "apple"]);
    assert_eq!(desc, vec!["apple", "elder", "avocado", "banana", "cherry", "date"]);
    let a: BTreeSet<_> = asc.into_iter().collect();
    let d: BTreeSet<_> = desc.into_iter().collect();
    assert_eq!(a, d);
}

#[test]
fn top_k_extends_through_ties() {
    let idx = sample();
    // 3rd most frequent is avocado (2), banana ties with it.
    assert_eq!(idx.get_x_frequent(3, false), vec!["apple", "elder", "avocado", "banana"]);
    assert_eq!(idx.get_x_frequent(1, true), vec!["cherry", "date"]);
    assert_eq!(idx.get_x_frequent(2, false), vec!["apple", "elder"]);
    assert_eq!(idx.get_x_frequent(100, false).len(), 6);
    assert!(idx.get_x_frequent(0, false).is_empty());
}

#[test]
fn top_k_dominates_the_rest() {
    let idx = sample();
    for k in 1..=6 {
        let top = idx.get_x_frequent(k, false);
        assert!(top.len() >= k);
        let min_top = top.iter().map(|h| idx.get_frequency(h)).min().unwrap();
        for h in idx.get_headings_asc().iter().filter(|h| !top.contains(h)) {
            assert!(idx.get_frequency(h) <= min_top);
        }
    }
}

#[test]
fn word_lookup_keeps_caller_order_and_casing() {
    let idx = sample();
    let found = idx.get_word(["Elder", "zucchini", "APPLE"]);
    assert_eq!(found, vec!["Elder", "APPLE"]);
}

#[test]
fn regex_matches_whole_headings() {
    let idx = sample();
    assert_eq!(idx.get_words_with_regex("a.*").unwrap(), vec!["apple", "avocado"]);
    assert_eq!(idx.get_words_with_regex("A.*E").unwrap(), vec!["apple"]);
    assert!(idx.get_words_with_regex("an").unwrap().is_empty());
}

#[test]
fn invalid_regex_is_reported_and_index_untouched() {
    let idx = sample();
    let before = idx.entries();
    match idx.get_words_with_regex("a(") {
        Err(IndexError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "a("),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
    assert_eq!(idx.entries(), before);
    assert_eq!(idx.get_words_given_frequency(1), vec!["cherry", "date"]);
}

#[test]
fn unbalanced_parentheses_are_invalid_even_when_anchoring_would_balance_them() {
    let idx = sample();
    idx.add_index("ab", 1, &sense("ab"));
    for pattern in ["a)(b", "(a))"] {
        assert!(
            matches!(idx.get_words_with_regex(pattern), Err(IndexError::InvalidPattern { .. })),
            "{pattern} should be rejected"
        );
    }
    assert_eq!(idx.get_words_with_regex("a(b)").unwrap(), vec!["ab"]);
}

#[test]
fn exact_frequency_lookup() {
    let idx = sample();
    assert_eq!(idx.get_words_given_frequency(2), vec!["avocado", "banana"]);
    assert!(idx.get_words_given_frequency(9).is_empty());
}

#[test]
fn concurrent_inserts_on_one_heading_are_not_lost() {
    let idx = InvertedIndex::new();
    let details = sense("java");
    std::thread::scope(|s| {
        for t in 0..8u32 {
            let idx = &idx;
            let details = &details;
            s.spawn(move || {
                for page in 0..250u32 {
                    idx.add_index("java", t * 250 + page + 1, details);
                }
            });
        }
    });
    assert_eq!(idx.get_frequency("java"), 2000);
}
