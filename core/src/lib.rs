pub mod builder;
pub mod error;
pub mod index;
pub mod query;
pub mod tokenizer;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub use builder::{build, BuildConfig, BuildReport, CancellationToken, IndexBuilder};
pub use error::{IndexError, Result};
pub use index::{IndexEntry, InvertedIndex};
pub use query::{Query, QueryEngine, QueryOutcome};

/// Lower-cased word used as the index key.
pub type Heading = String;
/// Page number a heading occurs on. Pages start at 1.
pub type Locator = u32;

/// Word → senses, keys lower case, senses in source order.
pub type Dictionary = HashMap<String, Vec<WordDetails>>;
pub type Stopwords = HashSet<String>;

/// One dictionary sense of a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordDetails {
    pub word: String,
    pub word_type: String,
    pub definition: String,
}

impl WordDetails {
    pub fn new(
        word: impl Into<String>,
        word_type: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self { word: word.into(), word_type: word_type.into(), definition: definition.into() }
    }
}
