//! Concurrent page index: heading → (page set, dictionary senses).

use crate::error::{IndexError, Result};
use crate::{Heading, Locator, WordDetails};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub locators: BTreeSet<Locator>,
    /// Senses as given on first insertion, never modified afterwards.
    pub details: Vec<WordDetails>,
}

impl IndexEntry {
    pub fn frequency(&self) -> usize { self.locators.len() }
}

/// Inverted index over the pages of one document.
///
/// Writers go through [`InvertedIndex::add_index`], which holds the shard
/// lock of the heading for the whole insert-or-merge, so concurrent inserts
/// of different pages for the same heading never lose an update.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    entries: DashMap<Heading, IndexEntry>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record `heading` on page `locator`. Returns `true` when the call
    /// created the heading or added a new page to it.
    ///
    /// `details` is stored only when the heading is created; a heading with
    /// no senses is never created.
    pub fn add_index(&self, heading: &str, locator: Locator, details: &[WordDetails]) -> bool {
        match self.entries.entry(heading.to_lowercase()) {
            Entry::Occupied(mut entry) => entry.get_mut().locators.insert(locator),
            Entry::Vacant(entry) => {
                if details.is_empty() {
                    return false;
                }
                entry.insert(IndexEntry { locators: BTreeSet::from([locator]), details: details.to_vec() });
                true
            }
        }
    }

    pub fn indices_total(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Number of distinct pages the heading occurs on, 0 when absent.
    pub fn get_frequency(&self, heading: &str) -> usize {
        self.entries.get(&heading.to_lowercase()).map_or(0, |e| e.frequency())
    }

    pub fn locators(&self, heading: &str) -> Option<Vec<Locator>> {
        self.entries.get(&heading.to_lowercase()).map(|e| e.locators.iter().copied().collect())
    }

    pub fn definitions(&self, heading: &str) -> Option<Vec<WordDetails>> {
        self.entries.get(&heading.to_lowercase()).map(|e| e.details.clone())
    }

    /// Ordered copy of every entry.
    pub fn entries(&self) -> BTreeMap<Heading, IndexEntry> {
        self.entries.iter().map(|e| (e.key().clone(), e.value().clone())).collect()
    }

    pub fn get_headings_asc(&self) -> Vec<Heading> {
        let mut headings: Vec<Heading> = self.entries.iter().map(|e| e.key().clone()).collect();
        headings.sort_unstable();
        headings
    }

    pub fn get_headings_desc(&self) -> Vec<Heading> {
        let mut headings = self.get_headings_asc();
        headings.reverse();
        headings
    }

    /// Every heading ranked by frequency; equal frequencies stay alphabetical
    /// in both directions.
    pub fn sort_frequency(&self, ascending: bool) -> Vec<Heading> {
        self.ranked(ascending).into_iter().map(|(_, h)| h).collect()
    }

    /// The `min_amount` most (or least) frequent headings, extended with every
    /// further heading that ties with the last one taken.
    pub fn get_x_frequent(&self, min_amount: usize, least_frequent: bool) -> Vec<Heading> {
        let mut ranked = self.ranked(least_frequent);
        if min_amount == 0 {
            return Vec::new();
        }
        if min_amount < ranked.len() {
            let cut = ranked[min_amount - 1].0;
            let ties = ranked[min_amount..].iter().take_while(|(f, _)| *f == cut).count();
            ranked.truncate(min_amount + ties);
        }
        ranked.into_iter().map(|(_, h)| h).collect()
    }

    /// The words that are headings, compared case-insensitively, in the
    /// caller's order and casing.
    pub fn get_word<I, S>(&self, words: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .filter(|w| self.entries.contains_key(&w.as_ref().to_lowercase()))
            .map(|w| w.as_ref().to_string())
            .collect()
    }

    /// Headings fully matching `pattern`, case-insensitive, alphabetical.
    pub fn get_words_with_regex(&self, pattern: &str) -> Result<Vec<Heading>> {
        let invalid = |source: regex::Error| IndexError::InvalidPattern { pattern: pattern.to_string(), source };
        // Anchoring can balance stray parentheses, so the bare pattern is checked first.
        Regex::new(pattern).map_err(invalid)?;
        let re = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(true)
            .build()
            .map_err(invalid)?;
        Ok(self.get_headings_asc().into_iter().filter(|h| re.is_match(h)).collect())
    }

    pub fn get_words_given_frequency(&self, freq: usize) -> Vec<Heading> {
        let mut headings: Vec<Heading> = self
            .entries
            .iter()
            .filter(|e| e.frequency() == freq)
            .map(|e| e.key().clone())
            .collect();
        headings.sort_unstable();
        headings
    }

    fn ranked(&self, ascending: bool) -> Vec<(usize, Heading)> {
        let mut ranked: Vec<(usize, Heading)> =
            self.entries.iter().map(|e| (e.frequency(), e.key().clone())).collect();
        ranked.sort_unstable_by(|a, b| {
            let by_freq = if ascending { a.0.cmp(&b.0) } else { b.0.cmp(&a.0) };
            match by_freq {
                Ordering::Equal => a.1.cmp(&b.1),
                other => other,
            }
        });
        ranked
    }
}
