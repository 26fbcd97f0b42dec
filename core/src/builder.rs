//! Index population: tokenize, filter, then fan admitted words out to a
//! fixed pool of workers through a bounded queue.

use crate::error::{IndexError, Result};
use crate::index::InvertedIndex;
use crate::tokenizer::{tokenize_pages, PageTokens, DEFAULT_PAGE_SIZE};
use crate::{Dictionary, Locator, Stopwords, WordDetails};
use crossbeam_channel::{bounded, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Queue slots per worker when no capacity is configured.
const QUEUE_SLOTS_PER_WORKER: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Lines per page.
    pub page_size: usize,
    pub workers: usize,
    /// Admitted words that may wait for a worker before the tokenizer blocks.
    pub queue_capacity: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        let workers = thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
        Self { page_size: DEFAULT_PAGE_SIZE, workers, queue_capacity: workers * QUEUE_SLOTS_PER_WORKER }
    }
}

impl BuildConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the pool size and resizes the queue to match.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self.queue_capacity = workers.max(1) * QUEUE_SLOTS_PER_WORKER;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(IndexError::InvalidConfig("page size must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(IndexError::InvalidConfig("worker count must be at least 1".into()));
        }
        if self.queue_capacity == 0 {
            return Err(IndexError::InvalidConfig("queue capacity must be at least 1".into()));
        }
        Ok(())
    }
}

/// Stops a running build from dispatching further words.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self { Self::default() }
    pub fn cancel(&self) { self.0.store(true, Ordering::SeqCst) }
    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::SeqCst) }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub lines: usize,
    pub tokens: usize,
    pub admitted: usize,
    /// Insertions that created a heading or added a page.
    pub inserted: usize,
    /// Insertions of a page the heading already had.
    pub duplicates: usize,
    pub filtered_stopwords: usize,
    pub filtered_unknown: usize,
    pub cancelled: bool,
}

type Job<'d> = (&'d str, Locator, &'d [WordDetails]);

pub struct IndexBuilder {
    config: BuildConfig,
    cancel: Option<CancellationToken>,
}

impl IndexBuilder {
    pub fn new(config: BuildConfig) -> Self { Self { config, cancel: None } }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &BuildConfig { &self.config }

    /// Build an index from `lines`. Blocks until every admitted word has been
    /// inserted. A failing line source yields an error and no index.
    pub fn build<I>(
        &self,
        lines: I,
        dictionary: &Dictionary,
        stopwords: &Stopwords,
    ) -> Result<(InvertedIndex, BuildReport)>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        self.config.validate()?;
        let index = InvertedIndex::new();
        let inserted = AtomicUsize::new(0);
        let duplicates = AtomicUsize::new(0);
        let mut tokens = tokenize_pages(lines, self.config.page_size);

        let dispatched = thread::scope(|scope| {
            let (tx, rx) = bounded::<Job<'_>>(self.config.queue_capacity);
            for worker in 0..self.config.workers {
                let rx = rx.clone();
                let index = &index;
                let inserted = &inserted;
                let duplicates = &duplicates;
                scope.spawn(move || {
                    let mut handled = 0usize;
                    for (heading, locator, details) in rx.iter() {
                        if index.add_index(heading, locator, details) {
                            inserted.fetch_add(1, Ordering::Relaxed);
                        } else {
                            duplicates.fetch_add(1, Ordering::Relaxed);
                        }
                        handled += 1;
                    }
                    debug!(worker, handled, "index worker finished");
                });
            }
            drop(rx);
            // Workers drain whatever is queued once the sender is dropped.
            self.dispatch(&mut tokens, dictionary, stopwords, tx)
        });

        let mut report = dispatched?;
        report.lines = tokens.lines_read();
        report.inserted = inserted.into_inner();
        report.duplicates = duplicates.into_inner();
        info!(
            lines = report.lines,
            tokens = report.tokens,
            admitted = report.admitted,
            headings = index.indices_total(),
            duplicates = report.duplicates,
            cancelled = report.cancelled,
            "index build complete"
        );
        Ok((index, report))
    }

    fn dispatch<'d, I>(
        &self,
        tokens: &mut PageTokens<I>,
        dictionary: &'d Dictionary,
        stopwords: &Stopwords,
        tx: Sender<Job<'d>>,
    ) -> Result<BuildReport>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let mut report = BuildReport::default();
        for item in tokens.by_ref() {
            if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                debug!(tokens = report.tokens, "build cancelled, no further words dispatched");
                report.cancelled = true;
                break;
            }
            let (word, page) = match item {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "line source failed, abandoning build");
                    return Err(IndexError::SourceRead(e));
                }
            };
            report.tokens += 1;
            if stopwords.contains(&word) {
                report.filtered_stopwords += 1;
                continue;
            }
            let Some((heading, details)) = dictionary.get_key_value(&word) else {
                report.filtered_unknown += 1;
                continue;
            };
            report.admitted += 1;
            if tx.send((heading.as_str(), page, details.as_slice())).is_err() {
                // Every worker is gone; the scope will surface the panic.
                break;
            }
        }
        Ok(report)
    }
}

/// Build with the default pool size and the given page size.
pub fn build<I>(
    lines: I,
    dictionary: &Dictionary,
    stopwords: &Stopwords,
    page_size: usize,
) -> Result<InvertedIndex>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let builder = IndexBuilder::new(BuildConfig::default().with_page_size(page_size));
    builder.build(lines, dictionary, stopwords).map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_page_size() {
        let cfg = BuildConfig::default().with_page_size(0);
        assert!(matches!(cfg.validate(), Err(IndexError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_workers() {
        let builder = IndexBuilder::new(BuildConfig::default().with_workers(0));
        let res = builder.build(Vec::<io::Result<String>>::new(), &Dictionary::new(), &Stopwords::new());
        assert!(matches!(res, Err(IndexError::InvalidConfig(_))));
    }

    #[test]
    fn default_queue_scales_with_workers() {
        let cfg = BuildConfig::default().with_workers(3);
        assert_eq!(cfg.queue_capacity, 3 * QUEUE_SLOTS_PER_WORKER);
        assert!(cfg.validate().is_ok());
    }
}
