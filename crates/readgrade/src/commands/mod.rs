//! Command implementations.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use readgrade_core::config::{Config, ConfigSources};
use readgrade_core::{Corpus, FamiliarWords, ParseFile};

pub mod corpus;
pub mod info;
pub mod mdd;
pub mod score;
pub mod standardize;

/// Settings from configuration that commands fall back on when a flag is
/// absent. Relative paths are already resolved against the config file.
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    /// Dale–Chall familiar-word list.
    pub familiar_words: Option<Utf8PathBuf>,
    /// Reference corpus CSV.
    pub corpus: Option<Utf8PathBuf>,
    /// Score corpus batches in parallel.
    pub parallel: bool,
}

impl Defaults {
    /// Collect command defaults from the loaded configuration.
    pub fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            familiar_words: config.familiar_words.as_deref().map(|p| sources.resolve(p)),
            corpus: config.corpus.as_deref().map(|p| sources.resolve(p)),
            parallel: config.parallel,
        }
    }
}

/// Read a file and validate its size against the configured limit.
///
/// Checks the size from metadata before reading anything into memory.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Load a dependency parse file, subject to the input size limit.
pub fn load_parses(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<ParseFile> {
    let json = read_input_file(path, max_bytes)?;
    ParseFile::from_json(&json).with_context(|| format!("failed to load parses from {path}"))
}

/// Load the familiar-word list named by a flag or by configuration.
pub fn load_familiar_words(
    flag: Option<&Utf8Path>,
    defaults: &Defaults,
) -> anyhow::Result<FamiliarWords> {
    let path = flag.or(defaults.familiar_words.as_deref()).context(
        "no familiar-word list; pass --familiar-words or set familiar_words in configuration",
    )?;
    FamiliarWords::from_path(path)
        .with_context(|| format!("failed to load familiar-word list from {path}"))
}

/// Load the reference corpus named by a flag or by configuration, if any.
pub fn load_corpus(flag: Option<&Utf8Path>, defaults: &Defaults) -> anyhow::Result<Option<Corpus>> {
    flag.or(defaults.corpus.as_deref())
        .map(|path| {
            Corpus::from_path(path).with_context(|| format!("failed to load corpus from {path}"))
        })
        .transpose()
}
