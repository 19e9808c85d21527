//! Corpus command: reference-score grades and the corpus-wide MDD batch.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info, instrument};

use readgrade_core::distance::run_batch_with_progress;
use readgrade_core::{
    BatchOptions, BatchReport, Corpus, standardize_dale_chall, standardize_flesch,
    standardize_syntax,
};

use super::{Defaults, load_corpus, load_parses};

/// Arguments for the `corpus` subcommand.
#[derive(Args, Debug)]
pub struct CorpusArgs {
    /// Corpus CSV (defaults to `corpus` from configuration).
    pub csv: Option<Utf8PathBuf>,

    /// JSON file of dependency parses; runs the MDD batch over every sentence.
    #[arg(long)]
    pub parses: Option<Utf8PathBuf>,

    /// Sum sentence distances per excerpt instead of averaging them.
    #[arg(long)]
    pub single: bool,

    /// Score excerpts one at a time (overrides `parallel` from configuration).
    #[arg(long)]
    pub sequential: bool,

    /// List every failed sentence.
    #[arg(long)]
    pub show_failures: bool,
}

/// Averages of the scores the corpus ships with.
#[derive(Debug, Default, PartialEq, Serialize)]
struct ReferenceSummary {
    mean_crowd: f64,
    mean_dale_chall: f64,
    mean_flesch: f64,
    mean_lexical_grade: f64,
    mean_flesch_grade: f64,
}

impl ReferenceSummary {
    fn from_corpus(corpus: &Corpus) -> Self {
        let n = corpus.len();
        if n == 0 {
            return Self::default();
        }
        let mut summary = Self::default();
        for block in corpus.blocks() {
            let reference = block.reference();
            summary.mean_crowd += reference.crowd;
            summary.mean_dale_chall += reference.dale_chall;
            summary.mean_flesch += reference.flesch;
            summary.mean_lexical_grade += f64::from(standardize_dale_chall(reference.dale_chall));
            summary.mean_flesch_grade += f64::from(standardize_flesch(reference.flesch));
        }
        let n = n as f64;
        summary.mean_crowd /= n;
        summary.mean_dale_chall /= n;
        summary.mean_flesch /= n;
        summary.mean_lexical_grade /= n;
        summary.mean_flesch_grade /= n;
        summary
    }
}

#[derive(Debug, Serialize)]
struct CorpusOutput {
    blocks: usize,
    sentences: usize,
    reference: ReferenceSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch: Option<BatchReport>,
}

fn progress_bar(len: usize, hidden: bool) -> anyhow::Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .context("invalid progress template")?
        .progress_chars("█▓▒░  ");
    let bar = ProgressBar::new(len as u64);
    bar.set_style(style);
    bar.set_message("excerpts");
    Ok(bar)
}

/// Summarize the reference corpus and, given parses, score its syntax.
#[instrument(name = "cmd_corpus", skip_all, fields(csv = ?args.csv))]
pub fn cmd_corpus(
    args: CorpusArgs,
    global_json: bool,
    quiet: bool,
    defaults: &Defaults,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(parses = ?args.parses, single = args.single, "executing corpus command");

    let corpus = load_corpus(args.csv.as_deref(), defaults)?
        .context("no corpus; pass a CSV path or set corpus in configuration")?;

    let batch = match args.parses {
        Some(ref path) => {
            let parses = load_parses(path, max_input_bytes)?;
            let options = BatchOptions {
                parallel: defaults.parallel && !args.sequential,
                single_sentence_mode: args.single,
            };
            let bar = progress_bar(corpus.len(), quiet || global_json)?;
            let report =
                run_batch_with_progress(corpus.blocks(), &parses, &options, |_| bar.inc(1));
            bar.finish_and_clear();
            info!(scored = report.scored, failed = report.failed, "corpus batch scored");
            Some(report)
        }
        None => None,
    };

    let output = CorpusOutput {
        blocks: corpus.len(),
        sentences: corpus.blocks().iter().map(|b| b.sentence_count()).sum(),
        reference: ReferenceSummary::from_corpus(&corpus),
        batch,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&output, args.show_failures);
    }

    Ok(())
}

fn print_summary(output: &CorpusOutput, show_failures: bool) {
    let reference = &output.reference;
    println!(
        "{} excerpts, {} sentences",
        output.blocks.bold(),
        output.sentences.bold()
    );
    println!();
    println!("{}", "Reference scores".bold().underline());
    println!("{}: {:.3}", "Mean crowd score".dimmed(), reference.mean_crowd);
    println!(
        "{}: {:.2} (mean grade {:.1})",
        "Mean Dale-Chall".dimmed(),
        reference.mean_dale_chall,
        reference.mean_lexical_grade
    );
    println!(
        "{}: {:.2} (mean grade {:.1})",
        "Mean Flesch".dimmed(),
        reference.mean_flesch,
        reference.mean_flesch_grade
    );

    let Some(ref batch) = output.batch else {
        return;
    };
    println!();
    println!("{}", "Dependency distance".bold().underline());
    println!(
        "{}: {}  {}: {}",
        "Scored".dimmed(),
        batch.scored.green(),
        "Failed".dimmed(),
        if batch.failed > 0 {
            batch.failed.red().to_string()
        } else {
            batch.failed.to_string()
        }
    );
    if let (Some(mean), Some(min), Some(max)) = (batch.mean_mdd, batch.min_mdd, batch.max_mdd) {
        println!(
            "{}: {:.3} (grade {})  {}: {:.3}  {}: {:.3}",
            "Mean MDD".dimmed(),
            mean,
            standardize_syntax(mean),
            "min".dimmed(),
            min,
            "max".dimmed(),
            max
        );
    }
    for (kind, count) in &batch.failures_by_kind {
        println!("  {:<10} {}", kind.as_str(), count);
    }
    if show_failures {
        for failure in &batch.failures {
            println!(
                "  {} #{} sentence {}: {}",
                format!("[{}]", failure.kind).yellow(),
                failure.block_id,
                failure.sentence_index,
                failure.message
            );
        }
    }
}
