use anyhow::{Context, Result};
use index_core::tokenizer::tokenize_line;
use index_core::{Dictionary, Stopwords, WordDetails};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Line stream handed to the index builder.
pub type Lines = Box<dyn Iterator<Item = io::Result<String>>>;

/// Where the document to index comes from.
#[derive(Debug, Clone)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    pub fn open(&self) -> Result<Lines> {
        match self {
            Source::File(path) => open_file(path),
            Source::Url(url) => open_url(url),
        }
    }
}

pub fn open_file(path: &Path) -> Result<Lines> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(lossy_lines(f))
}

pub fn open_url(url: &str) -> Result<Lines> {
    let resp = reqwest::blocking::get(url)
        .with_context(|| format!("fetching {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?;
    Ok(lossy_lines(resp))
}

/// Split on `\n`, dropping a trailing `\r`. Bytes that are not UTF-8 become
/// U+FFFD, which the tokenizer strips like any other non-word character.
pub fn lossy_lines<R: Read + 'static>(reader: R) -> Lines {
    Box::new(BufReader::new(reader).split(b'\n').map(|line| -> io::Result<String> {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }))
}

pub fn load_dictionary(path: &Path) -> Result<Dictionary> {
    let f = File::open(path).with_context(|| format!("opening dictionary {}", path.display()))?;
    let dict = parse_dictionary(BufReader::new(f))?;
    tracing::info!(path = %path.display(), words = dict.len(), "loaded dictionary");
    Ok(dict)
}

pub fn load_stopwords(path: &Path) -> Result<Stopwords> {
    let f = File::open(path).with_context(|| format!("opening stopwords {}", path.display()))?;
    let words = parse_stopwords(BufReader::new(f))?;
    tracing::info!(path = %path.display(), words = words.len(), "loaded stopwords");
    Ok(words)
}

/// Parse `"word","type","definition"` records.
///
/// A record starts on a line beginning with `"` and runs until a line that
/// ends with `"` completes it; continuation lines are trimmed and joined with
/// `\n`. Lines outside a record are skipped. Senses of the same word keep
/// file order under the lower-cased key.
pub fn parse_dictionary<R: BufRead>(reader: R) -> Result<Dictionary> {
    let mut dict = Dictionary::new();
    let mut record: Option<String> = None;
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('"') {
            record = Some(line.clone());
        } else if let Some(rec) = record.as_mut() {
            rec.push('\n');
            rec.push_str(line.trim());
        } else {
            continue;
        }
        if !line.ends_with('"') {
            continue;
        }
        if let Some(details) = record.as_deref().and_then(parse_record) {
            dict.entry(details.word.to_lowercase()).or_default().push(details);
            record = None;
        }
    }
    Ok(dict)
}

fn parse_record(record: &str) -> Option<WordDetails> {
    let rest = record.strip_prefix('"')?;
    let (word, rest) = rest.split_once('"')?;
    let (_, rest) = rest.split_once('"')?;
    let (word_type, rest) = rest.split_once('"')?;
    let (_, rest) = rest.split_once('"')?;
    let definition = rest.strip_suffix('"')?;
    Some(WordDetails::new(word, word_type, definition))
}

/// Every word of every line, normalized like document text.
pub fn parse_stopwords<R: BufRead>(reader: R) -> Result<Stopwords> {
    let mut words = Stopwords::new();
    for line in reader.lines() {
        words.extend(tokenize_line(&line?));
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_record() {
        let rec = parse_record(r#""Java","n.","Java coffee, a kind of coffee brought from Java.""#).unwrap();
        assert_eq!(rec.word, "Java");
        assert_eq!(rec.word_type, "n.");
        assert_eq!(rec.definition, "Java coffee, a kind of coffee brought from Java.");
    }

    #[test]
    fn definition_may_contain_quotes() {
        let rec = parse_record(r#""Say","v.","To utter; as, to "say" a word.""#).unwrap();
        assert_eq!(rec.definition, r#"To utter; as, to "say" a word."#);
    }

    #[test]
    fn incomplete_record_is_rejected() {
        assert!(parse_record(r#""Java","n."#).is_none());
    }
}
