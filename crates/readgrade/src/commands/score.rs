//! Score command: the full complexity report for a file or a sentence.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use readgrade_core::text::{BlockMeta, ReferenceScores};
use readgrade_core::{Assessor, ComplexityReport, TextBlock};

use super::{Defaults, load_corpus, load_familiar_words, load_parses, read_input_file};

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Text file to score.
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    pub file: Option<Utf8PathBuf>,

    /// Score this text as a single sentence instead of reading a file.
    #[arg(long)]
    pub text: Option<String>,

    /// JSON file of dependency parses; enables the MDD score.
    #[arg(long)]
    pub parses: Option<Utf8PathBuf>,

    /// Dale-Chall familiar-word list (overrides configuration).
    #[arg(long)]
    pub familiar_words: Option<Utf8PathBuf>,

    /// Reference corpus CSV for the crowd-score lookup (overrides configuration).
    #[arg(long)]
    pub corpus: Option<Utf8PathBuf>,
}

fn load_block(args: &ScoreArgs, max_input_bytes: Option<usize>) -> anyhow::Result<TextBlock> {
    if let Some(ref text) = args.text {
        return TextBlock::from_user_input(text).context("failed to read --text as a sentence");
    }
    let file = args
        .file
        .as_ref()
        .context("either a file or --text is required")?;
    let content = read_input_file(file, max_input_bytes)?;
    let meta = BlockMeta {
        title: file.file_name().unwrap_or_default().to_string(),
        ..BlockMeta::default()
    };
    TextBlock::from_excerpt(meta, &content, ReferenceScores::default())
        .with_context(|| format!("failed to split {file} into sentences"))
}

fn print_report(report: &ComplexityReport) {
    println!(
        "{:<12} {:>7.2}  grade {:>2}  {}",
        "Dale-Chall".bold(),
        report.dale_chall.score,
        report.grades.lexical,
        format!(
            "({} of {} words unfamiliar)",
            report.dale_chall.unfamiliar, report.dale_chall.words
        )
        .dimmed(),
    );
    println!(
        "{:<12} {:>7.2}  grade {:>2}  {}",
        "Flesch".bold(),
        report.flesch.score,
        report.grades.flesch,
        format!(
            "({} syllables, {} sentences)",
            report.flesch.syllables, report.flesch.sentences
        )
        .dimmed(),
    );
    match (report.mdd, report.grades.syntax) {
        (Some(mdd), Some(grade)) => {
            println!("{:<12} {:>7.3}  grade {:>2}", "MDD".bold(), mdd, grade);
        }
        _ => println!("{:<12} {}", "MDD".bold(), "no parses given".dimmed()),
    }
    if let (Some(crowd), Some(id)) = (report.crowd_score, report.nearest_id) {
        println!(
            "{:<12} {:>7.3}  {}",
            "Crowd score".bold(),
            crowd,
            format!("(nearest excerpt #{id})").dimmed()
        );
    }
}

/// Score a text with every available metric.
#[instrument(name = "cmd_score", skip_all, fields(file = ?args.file, text = args.text.is_some()))]
pub fn cmd_score(
    args: ScoreArgs,
    global_json: bool,
    defaults: &Defaults,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(parses = ?args.parses, "executing score command");

    let block = load_block(&args, max_input_bytes)?;
    let familiar = load_familiar_words(args.familiar_words.as_deref(), defaults)?;
    let parses = args
        .parses
        .as_deref()
        .map(|path| load_parses(path, max_input_bytes))
        .transpose()?;
    let corpus = load_corpus(args.corpus.as_deref(), defaults)?;

    let mut assessor = Assessor::new(&familiar).single_sentence(args.text.is_some());
    if let Some(ref parses) = parses {
        assessor = assessor.with_parses(parses);
    }
    if let Some(ref corpus) = corpus {
        assessor = assessor.with_corpus(corpus);
    }

    let report = assessor
        .assess(&block)
        .context("failed to compute mean dependency distance")?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ScoreArgs {
        ScoreArgs {
            file: None,
            text: None,
            parses: None,
            familiar_words: None,
            corpus: None,
        }
    }

    #[test]
    fn text_flag_builds_one_sentence() {
        let block = load_block(
            &ScoreArgs {
                text: Some("One. Two.".to_string()),
                ..args()
            },
            None,
        )
        .unwrap();
        assert_eq!(block.sentence_count(), 1);
    }

    #[test]
    fn file_is_split_into_sentences() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("story.txt")).unwrap();
        std::fs::write(&path, "The cat sat. The dog ran!").unwrap();

        let block = load_block(
            &ScoreArgs {
                file: Some(path),
                ..args()
            },
            None,
        )
        .unwrap();
        assert_eq!(block.sentence_count(), 2);
        assert_eq!(block.meta().title, "story.txt");
    }

    #[test]
    fn file_without_sentences_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("empty.txt")).unwrap();
        std::fs::write(&path, "no terminator here").unwrap();

        let err = load_block(
            &ScoreArgs {
                file: Some(path),
                ..args()
            },
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to split"));
    }
}
