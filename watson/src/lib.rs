//! Answer clues from the command line and score the answers against a key.

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use watson_core::persist::{load_index, save_index, IndexPaths};
use watson_core::{
    evaluate, rank_with, AnswerKey, DocumentStats, InvertedIndex, Normalizer, NormalizerConfig, ScoredResult,
    ScoringParams, Token, Verdict, DEFAULT_TOP_K,
};

#[derive(Parser, Debug)]
#[command(name = "watson")]
#[command(about = "Answer clues by retrieving the best-matching document title", long_about = None)]
pub struct Cli {
    /// Rebuild the index from the corpus instead of loading it
    #[arg(short = 'p', long)]
    pub parse: bool,
    /// Print the top documents and scores for every query
    #[arg(short = 'v', long)]
    pub verbose: bool,
    /// Answer this single query instead of the answer key; consumes all remaining arguments
    #[arg(short = 'q', long, num_args = 0.., allow_hyphen_values = true)]
    pub query: Option<Vec<String>>,
    /// Corpus directory of title-delimited files
    #[arg(long, default_value = "data/wiki-subset")]
    pub corpus: PathBuf,
    /// Only index corpus files whose name starts with this prefix
    #[arg(long, default_value = "enwiki-")]
    pub prefix: String,
    /// Index directory
    #[arg(long, default_value = "index")]
    pub index: PathBuf,
    /// Answer-key file
    #[arg(long, default_value = "data/questions.txt")]
    pub answers: PathBuf,
    /// Results kept per query
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
    /// Worker threads for index building
    #[arg(long, default_value_t = 1)]
    pub jobs: usize,
    /// Disable Porter stemming
    #[arg(long)]
    pub no_stem: bool,
    /// Disable lemmatization
    #[arg(long)]
    pub no_lemmatize: bool,
}

#[derive(Debug, Error)]
pub enum Failure {
    #[error("query flag given, but no query was found")]
    EmptyQuery,
    #[error("index could not be configured: {0:#}")]
    Index(anyhow::Error),
    #[error("{0}")]
    AnswerKey(watson_core::Error),
    #[error("writing output: {0}")]
    Output(#[from] std::io::Error),
}

impl Failure {
    pub fn code(&self) -> u8 {
        match self {
            Failure::EmptyQuery | Failure::Output(_) => 1,
            Failure::Index(_) => 2,
            Failure::AnswerKey(_) => 3,
        }
    }
}

impl Cli {
    fn ad_hoc_query(&self) -> Option<String> {
        self.query.as_ref().map(|terms| terms.join(" ").trim().to_string())
    }

    fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig { stem: !self.no_stem, lemmatize: !self.no_lemmatize }
    }
}

pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), Failure> {
    let ad_hoc = cli.ad_hoc_query();
    if ad_hoc.as_deref() == Some("") {
        return Err(Failure::EmptyQuery);
    }
    let verbose = cli.verbose || ad_hoc.is_some();

    writeln!(out, "Watson is loading...")?;
    let (index, stats, normalizer) = open_index(cli).map_err(Failure::Index)?;
    writeln!(out, "Watson has loaded {} documents.\n", index.num_docs())?;

    let key = match &ad_hoc {
        Some(_) => None,
        None => Some(AnswerKey::load(&cli.answers).map_err(Failure::AnswerKey)?),
    };
    let queries: Vec<String> = match (&ad_hoc, &key) {
        (Some(q), _) => vec![q.clone()],
        (None, Some(key)) => key.queries().map(String::from).collect(),
        (None, None) => Vec::new(),
    };

    let params = ScoringParams::default();
    let answered: Vec<(String, Vec<Token>, Vec<ScoredResult>)> = queries
        .into_iter()
        .map(|q| {
            let normalized = normalizer.normalize_query(&q);
            let results = rank_with(&normalized, &index, &stats, cli.top_k, &params);
            (q, normalized, results)
        })
        .collect();

    if verbose {
        for (query, normalized, results) in &answered {
            writeln!(out, "Original query: {query}")?;
            writeln!(out, "Tokenized query: {}", normalized.join(" "))?;
            for r in results {
                writeln!(out, "Potential Question: {}, with score {}", r.title, r.score)?;
            }
        }
    }

    let verdicts = match &key {
        Some(key) => {
            let summary = evaluate(answered.iter().map(|(q, _, r)| (q.as_str(), r.as_slice())), key)
                .map_err(Failure::AnswerKey)?;
            Some(summary)
        }
        None => None,
    };

    for (i, (query, _, results)) in answered.iter().enumerate() {
        writeln!(out, "And the answer is:")?;
        writeln!(out, "> {query}")?;
        match results.first() {
            Some(top) => writeln!(out, "What is... {}?", top.title)?,
            None => writeln!(out, "Watson has no guess.")?,
        }
        let (Some(summary), Some(key)) = (&verdicts, &key) else { continue };
        match summary.verdicts[i] {
            Verdict::Correct => writeln!(out, "That's right!")?,
            verdict => {
                writeln!(out, "That's wrong. Possible responses:")?;
                for response in key.accepted(query).unwrap_or_default() {
                    writeln!(out, "{response}")?;
                }
                if let Verdict::RecoveredAt(rank) = verdict {
                    writeln!(out, "However, the document ranked #{rank} did have the answer!")?;
                }
            }
        }
    }

    if let Some(summary) = &verdicts {
        writeln!(out, "Watson got {} out of {} right.", summary.correct, summary.total)?;
        writeln!(
            out,
            "Of the wrong questions, {} were results in the top 10 documents.",
            summary.recoverable_in_top10
        )?;
    }
    writeln!(out, "Watson is powering down.")?;
    Ok(())
}

/// Build or load the index. Queries are normalized the way the index's
/// documents were: a loaded index brings its own settings.
fn open_index(cli: &Cli) -> anyhow::Result<(InvertedIndex, DocumentStats, Normalizer)> {
    let paths = IndexPaths::new(&cli.index);
    let requested = cli.normalizer_config();
    let (index, stats, config) = if cli.parse {
        tracing::info!(corpus = %cli.corpus.display(), "parsing corpus, this may take a while");
        let normalizer = Normalizer::with_config(requested);
        let (index, stats) = indexer::build_from_dir(&cli.corpus, Some(cli.prefix.as_str()), &normalizer, cli.jobs)?;
        save_index(&paths, &index, &stats, requested)?;
        (index, stats, requested)
    } else {
        let loaded = load_index(&paths)?;
        let config = loaded.meta.normalization;
        if config != requested {
            tracing::warn!(?config, ?requested, "normalization flags differ from the saved index; using the index's settings");
        }
        (loaded.index, loaded.stats, config)
    };
    if index.num_docs() < 1 {
        anyhow::bail!("index at {} holds no documents", paths.root.display());
    }
    Ok((index, stats, Normalizer::with_config(config)))
}
