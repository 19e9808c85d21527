//! Standardize command.

use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

use readgrade_core::Metric;

/// Arguments for the `standardize` subcommand.
#[derive(Args, Debug)]
pub struct StandardizeArgs {
    /// Which scale to use.
    #[arg(value_enum)]
    pub metric: Metric,

    /// Raw score to map.
    #[arg(allow_negative_numbers = true)]
    pub score: f64,
}

#[derive(Debug, Serialize)]
struct StandardizeOutput {
    metric: Metric,
    score: f64,
    grade: u8,
}

/// Print the grade a raw score maps to.
#[instrument(name = "cmd_standardize", skip_all, fields(metric = %args.metric))]
pub fn cmd_standardize(args: StandardizeArgs, global_json: bool) -> anyhow::Result<()> {
    debug!(score = args.score, "executing standardize command");

    let output = StandardizeOutput {
        metric: args.metric,
        score: args.score,
        grade: args.metric.standardize(args.score),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output.grade);
    }
    Ok(())
}
