use crate::error::{IndexError, Result};
use crate::index::InvertedIndex;
use crate::Heading;

/// One lookup against a built index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    HeadingsAsc,
    HeadingsDesc,
    FrequencyAsc,
    FrequencyDesc,
    /// Exact words; matches keep the given casing and order.
    Words(Vec<String>),
    Pattern(String),
    /// Headings occurring on exactly this many pages.
    Frequency(usize),
    MostFrequent(usize),
    LeastFrequent(usize),
    Total,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Headings(Vec<Heading>),
    Count(usize),
}

impl QueryOutcome {
    pub fn headings(&self) -> &[Heading] {
        match self {
            QueryOutcome::Headings(h) => h,
            QueryOutcome::Count(_) => &[],
        }
    }
}

pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self { Self { index } }

    pub fn run(&self, query: &Query) -> Result<QueryOutcome> {
        let idx = self.index;
        let headings = match query {
            Query::HeadingsAsc => idx.get_headings_asc(),
            Query::HeadingsDesc => idx.get_headings_desc(),
            Query::FrequencyAsc => idx.sort_frequency(true),
            Query::FrequencyDesc => idx.sort_frequency(false),
            Query::Words(words) => idx.get_word(words),
            Query::Pattern(pattern) => idx.get_words_with_regex(pattern)?,
            Query::Frequency(freq) => idx.get_words_given_frequency(positive("frequency", *freq)?),
            Query::MostFrequent(n) => idx.get_x_frequent(positive("count", *n)?, false),
            Query::LeastFrequent(n) => idx.get_x_frequent(positive("count", *n)?, true),
            Query::Total => return Ok(QueryOutcome::Count(idx.indices_total())),
        };
        Ok(QueryOutcome::Headings(headings))
    }
}

fn positive(what: &str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(IndexError::InvalidArgument(format!("{what} must be greater than 0")));
    }
    Ok(value)
}
