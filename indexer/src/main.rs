use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use index_core::tokenizer::{tokenize_line, DEFAULT_PAGE_SIZE};
use index_core::{BuildConfig, InvertedIndex, Query, QueryEngine, QueryOutcome};
use indexer::build_from_source;
use indexer::format::{write_json, write_table, write_word_list};
use indexer::sources::Source;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Index the pages of a document against a dictionary and query the result", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,
    /// Dictionary CSV of "word","type","definition" records
    #[arg(long, default_value = "./dictionary.csv")]
    dictionary: PathBuf,
    /// Words never indexed
    #[arg(long, default_value = "./stopwords.txt")]
    stopwords: PathBuf,
    /// Lines per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
    /// Index workers (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,
    /// Admitted words queued ahead of the workers
    #[arg(long)]
    queue_capacity: Option<usize>,
    /// Print results as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Local text file to index
    #[arg(long)]
    input: Option<PathBuf>,
    /// URL of a text document to index
    #[arg(long)]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show headings in ascending order
    ShowAsc,
    /// Show headings in descending order
    ShowDesc,
    /// Show headings by frequency, least frequent first
    FreqAsc,
    /// Show headings by frequency, most frequent first
    FreqDesc,
    /// Show the given words if indexed
    Words { words: Vec<String> },
    /// Show headings fully matching a regular expression, e.g. 'a.*'
    Pattern { regex: String },
    /// Show headings found on exactly this many pages
    Frequency { pages: usize },
    /// Show the N most frequent headings (more on ties)
    Most { count: usize },
    /// Show the N least frequent headings (more on ties)
    Least { count: usize },
    /// Print the number of distinct headings
    Total,
    /// List headings in ascending order without details
    ListAsc,
    /// List headings in descending order without details
    ListDesc,
}

impl Commands {
    /// The query to run and whether to print full details.
    fn query(&self) -> (Query, bool) {
        match self {
            Commands::ShowAsc => (Query::HeadingsAsc, true),
            Commands::ShowDesc => (Query::HeadingsDesc, true),
            Commands::FreqAsc => (Query::FrequencyAsc, true),
            Commands::FreqDesc => (Query::FrequencyDesc, true),
            Commands::Words { words } => {
                let words: BTreeSet<String> = words.iter().flat_map(|w| tokenize_line(w)).collect();
                (Query::Words(words.into_iter().collect()), true)
            }
            Commands::Pattern { regex } => (Query::Pattern(regex.clone()), true),
            Commands::Frequency { pages } => (Query::Frequency(*pages), true),
            Commands::Most { count } => (Query::MostFrequent(*count), true),
            Commands::Least { count } => (Query::LeastFrequent(*count), true),
            Commands::Total => (Query::Total, false),
            Commands::ListAsc => (Query::HeadingsAsc, false),
            Commands::ListDesc => (Query::HeadingsDesc, false),
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let source = match (cli.source.input, cli.source.url) {
        (Some(path), _) => Source::File(path),
        (None, Some(url)) => Source::Url(url),
        (None, None) => anyhow::bail!("either --input or --url is required"),
    };
    let mut config = BuildConfig::default().with_page_size(cli.page_size);
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }
    if let Some(capacity) = cli.queue_capacity {
        config.queue_capacity = capacity;
    }

    let (index, _report) = build_from_source(&source, &cli.dictionary, &cli.stopwords, config)?;
    if index.is_empty() {
        eprintln!("There are no dictionary words in the document to be indexed");
    }

    let (query, detailed) = cli.command.query();
    let outcome = QueryEngine::new(&index).run(&query)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_outcome(&mut out, &index, &outcome, detailed, cli.json)?;
    out.flush()?;
    Ok(())
}

fn print_outcome<W: Write>(
    out: &mut W,
    index: &InvertedIndex,
    outcome: &QueryOutcome,
    detailed: bool,
    json: bool,
) -> Result<()> {
    match outcome {
        QueryOutcome::Count(n) if json => writeln!(out, "{}", serde_json::json!({ "total": n }))?,
        QueryOutcome::Count(n) => writeln!(out, "The total number of unique words is {n}")?,
        QueryOutcome::Headings(headings) if json => write_json(out, index, headings)?,
        QueryOutcome::Headings(headings) if headings.is_empty() => writeln!(out, "No words have been found.")?,
        QueryOutcome::Headings(headings) if detailed => {
            write_table(out, index, headings)?;
            writeln!(out, "{} words have been found.", headings.len())?;
        }
        QueryOutcome::Headings(headings) => write_word_list(out, headings)?,
    }
    Ok(())
}
