use crate::Locator;
use lazy_static::lazy_static;
use regex::Regex;
use std::io;

/// Lines per page when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: usize = 40;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9 ]").expect("valid regex");
}

/// Normalize one line into words: strip everything outside `[A-Za-z0-9 ]`,
/// lowercase, split on runs of spaces.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let cleaned = NON_WORD.replace_all(line, "").to_ascii_lowercase();
    cleaned.split(' ').filter(|t| !t.is_empty()).map(str::to_owned).collect()
}

/// Lazy `(word, page)` stream over a line source.
///
/// The page counter advances after every `page_size` lines, whether or not a
/// line produced any words. A read error is yielded once and ends the stream.
pub struct PageTokens<I> {
    lines: I,
    page_size: usize,
    lines_read: usize,
    page: Locator,
    pending: std::vec::IntoIter<String>,
    pending_page: Locator,
    done: bool,
}

/// Tokenize a line source into `(word, page)` pairs. A `page_size` of 0 is
/// treated as 1.
pub fn tokenize_pages<I>(lines: I, page_size: usize) -> PageTokens<I::IntoIter>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    PageTokens {
        lines: lines.into_iter(),
        page_size: page_size.max(1),
        lines_read: 0,
        page: 1,
        pending: Vec::new().into_iter(),
        pending_page: 1,
        done: false,
    }
}

impl<I> PageTokens<I> {
    pub fn lines_read(&self) -> usize { self.lines_read }
}

impl<I> Iterator for PageTokens<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<(String, Locator)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(word) = self.pending.next() {
                return Some(Ok((word, self.pending_page)));
            }
            if self.done {
                return None;
            }
            match self.lines.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(line)) => {
                    self.pending = tokenize_line(&line).into_iter();
                    self.pending_page = self.page;
                    self.lines_read += 1;
                    if self.lines_read % self.page_size == 0 {
                        self.page += 1;
                    }
                }
            }
        }
    }
}
