use anyhow::Result;
use index_core::{InvertedIndex, Locator, WordDetails};
use serde::Serialize;
use std::io::{self, Write};

const RULE_WIDTH: usize = 100;
const WORDS_PER_ROW: usize = 5;

fn rule<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "_".repeat(RULE_WIDTH))
}

fn row<W: Write>(out: &mut W, left: &str, right: &str) -> io::Result<()> {
    writeln!(out, "{left:<20} | {right}")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn write_sense<W: Write>(out: &mut W, sense: &WordDetails) -> io::Result<()> {
    let head = format!("    \"{}\",\"{}\",\"", sense.word, sense.word_type);
    let lines: Vec<&str> = sense.definition.split('\n').collect();
    if let [only] = lines.as_slice() {
        return row(out, "", &format!("{head}{only}\""));
    }
    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        let text = match i {
            0 => format!("{head}{line}"),
            i if i == last => format!("    {line}\""),
            _ => format!("    {line}"),
        };
        row(out, "", &text)?;
    }
    Ok(())
}

fn page_list(pages: &[Locator]) -> String {
    let joined: Vec<String> = pages.iter().map(Locator::to_string).collect();
    format!("[{}]", joined.join(", "))
}

/// Table of headings with their senses and pages, in the given order.
/// Headings missing from the index are skipped.
pub fn write_table<W: Write>(out: &mut W, index: &InvertedIndex, headings: &[String]) -> io::Result<()> {
    rule(out)?;
    row(out, "    Word", "    Details")?;
    rule(out)?;
    for heading in headings {
        let (Some(senses), Some(pages)) = (index.definitions(heading), index.locators(heading)) else {
            continue;
        };
        row(out, &format!("    {}", capitalize(heading)), "    Definitions:")?;
        for sense in &senses {
            write_sense(out, sense)?;
        }
        row(out, "", "")?;
        row(out, "", "    Pages:")?;
        row(out, "", &format!("    {}", page_list(&pages)))?;
        rule(out)?;
    }
    Ok(())
}

/// Comma separated words, five per row.
pub fn write_word_list<W: Write>(out: &mut W, words: &[String]) -> io::Result<()> {
    for (i, word) in words.iter().enumerate() {
        if (i + 1) % WORDS_PER_ROW == 0 {
            writeln!(out, "{word}")?;
        } else {
            write!(out, "{word}, ")?;
        }
    }
    if words.len() % WORDS_PER_ROW != 0 {
        writeln!(out)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonEntry {
    heading: String,
    frequency: usize,
    pages: Vec<Locator>,
    definitions: Vec<WordDetails>,
}

pub fn write_json<W: Write>(out: &mut W, index: &InvertedIndex, headings: &[String]) -> Result<()> {
    let entries: Vec<JsonEntry> = headings
        .iter()
        .filter_map(|h| {
            Some(JsonEntry {
                heading: h.to_lowercase(),
                frequency: index.get_frequency(h),
                pages: index.locators(h)?,
                definitions: index.definitions(h)?,
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &entries)?;
    writeln!(out)?;
    Ok(())
}
