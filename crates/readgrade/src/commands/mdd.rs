//! MDD command: dependency distance for every sentence of a parse file.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use readgrade_core::distance::sentence_mdd;
use readgrade_core::{ErrorKind, ParseFile, Sentence, standardize_syntax};

use super::load_parses;

/// Arguments for the `mdd` subcommand.
#[derive(Args, Debug)]
pub struct MddArgs {
    /// JSON file of dependency parses.
    pub parses: Utf8PathBuf,

    /// Treat the file as one sentence: sum the sentence distances instead of
    /// averaging them.
    #[arg(long)]
    pub single: bool,
}

#[derive(Debug, Serialize)]
struct SentenceRow {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mdd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grade: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct MddOutput {
    sentences: Vec<SentenceRow>,
    single_sentence_mode: bool,
    failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    mdd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grade: Option<u8>,
}

fn score_sentence(parses: &ParseFile, text: &str) -> SentenceRow {
    let failure = |kind: Option<ErrorKind>, error: String| SentenceRow {
        text: text.to_string(),
        mdd: None,
        grade: None,
        kind,
        error: Some(error),
    };

    let sentence = match Sentence::new(text) {
        Ok(sentence) => sentence,
        Err(err) => return failure(None, err.to_string()),
    };
    match sentence_mdd(parses, &sentence) {
        Ok(mdd) => SentenceRow {
            text: text.to_string(),
            mdd: Some(mdd),
            grade: Some(standardize_syntax(mdd)),
            kind: None,
            error: None,
        },
        Err(err) => {
            warn!(sentence = text, error = %err, "sentence not scored");
            failure(Some(err.kind()), err.to_string())
        }
    }
}

fn build_output(parses: &ParseFile, single: bool) -> MddOutput {
    let sentences: Vec<SentenceRow> = parses
        .sentences()
        .iter()
        .map(|parsed| score_sentence(parses, &parsed.text))
        .collect();
    let failed = sentences.iter().filter(|row| row.mdd.is_none()).count();

    let mdd = (failed == 0 && !sentences.is_empty()).then(|| {
        let total: f64 = sentences.iter().filter_map(|row| row.mdd).sum();
        let divisor = if single { 1 } else { sentences.len() };
        total / divisor as f64
    });

    MddOutput {
        sentences,
        single_sentence_mode: single,
        failed,
        mdd,
        grade: mdd.map(standardize_syntax),
    }
}

/// Compute mean dependency distance for every sentence in a parse file,
/// then for the file as a whole.
#[instrument(name = "cmd_mdd", skip_all, fields(file = %args.parses))]
pub fn cmd_mdd(args: MddArgs, global_json: bool, max_input_bytes: Option<usize>) -> anyhow::Result<()> {
    debug!(file = %args.parses, single = args.single, "executing mdd command");

    let parses = load_parses(&args.parses, max_input_bytes)?;
    if parses.is_empty() {
        bail!("{} contains no sentences", args.parses);
    }

    let output = build_output(&parses, args.single);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for row in &output.sentences {
            match (row.mdd, row.grade) {
                (Some(mdd), Some(grade)) => {
                    println!("{:>6.3}  {:>2}  {}", mdd, grade, row.text);
                }
                _ => println!(
                    "{:>6}  {:>2}  {}\n        {}",
                    "n/a".yellow(),
                    "-",
                    row.text,
                    row.error.as_deref().unwrap_or_default().dimmed(),
                ),
            }
        }
        println!();
        if let (Some(mdd), Some(grade)) = (output.mdd, output.grade) {
            println!("{}: {:.3} (grade {})", "MDD".bold(), mdd, grade);
        }
    }

    if output.failed > 0 {
        bail!(
            "{} of {} sentence(s) in {} could not be scored",
            output.failed,
            output.sentences.len(),
            args.parses
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARSES: &str = r#"{ "sentences": [
        { "text": "The girl ate an apple.", "tokens": [
            { "text": "The", "head": 1 },
            { "text": "girl", "head": 2 },
            { "text": "ate", "head": null },
            { "text": "an", "head": 4 },
            { "text": "apple", "head": 2 },
            { "text": ".", "head": 2, "punct": true }
        ] },
        { "text": "Birds sing.", "tokens": [
            { "text": "Birds", "head": 1 },
            { "text": "sing", "head": null }
        ] }
    ] }"#;

    #[test]
    fn scores_each_sentence_and_the_file() {
        let parses = ParseFile::from_json(PARSES).unwrap();
        let output = build_output(&parses, false);
        assert_eq!(output.failed, 0);
        assert_eq!(output.sentences[0].mdd, Some(1.25));
        assert_eq!(output.sentences[1].mdd, Some(1.0));
        assert_eq!(output.mdd, Some(1.125));
        assert_eq!(output.grade, Some(standardize_syntax(1.125)));
    }

    #[test]
    fn single_mode_sums() {
        let parses = ParseFile::from_json(PARSES).unwrap();
        assert_eq!(build_output(&parses, true).mdd, Some(2.25));
    }

    #[test]
    fn failures_suppress_the_file_score() {
        let json = r#"{ "sentences": [
            { "text": "Birds sing.", "tokens": [
                { "text": "Birds", "head": 1 },
                { "text": "chirp", "head": null }
            ] }
        ] }"#;
        let parses = ParseFile::from_json(json).unwrap();
        let output = build_output(&parses, false);
        assert_eq!(output.failed, 1);
        assert_eq!(output.sentences[0].kind, Some(ErrorKind::Lookup));
        assert!(output.mdd.is_none());
    }

    #[test]
    fn unterminated_text_is_reported_without_kind() {
        let json = r#"{ "sentences": [
            { "text": "no terminator", "tokens": [
                { "text": "no", "head": 1 },
                { "text": "terminator", "head": null }
            ] }
        ] }"#;
        let parses = ParseFile::from_json(json).unwrap();
        let output = build_output(&parses, false);
        assert_eq!(output.failed, 1);
        assert!(output.sentences[0].kind.is_none());
        assert!(output.sentences[0].error.is_some());
    }
}
