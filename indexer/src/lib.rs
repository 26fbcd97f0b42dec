pub mod format;
pub mod sources;

use anyhow::{Context, Result};
use index_core::{BuildConfig, BuildReport, IndexBuilder, InvertedIndex};
use sources::Source;
use std::path::Path;

/// Load the word lists, read the document and build its index.
pub fn build_from_source(
    source: &Source,
    dictionary: &Path,
    stopwords: &Path,
    config: BuildConfig,
) -> Result<(InvertedIndex, BuildReport)> {
    let dictionary = sources::load_dictionary(dictionary)?;
    let stopwords = sources::load_stopwords(stopwords)?;
    let lines = source.open()?;
    IndexBuilder::new(config)
        .build(lines, &dictionary, &stopwords)
        .with_context(|| format!("indexing {source:?}"))
}
