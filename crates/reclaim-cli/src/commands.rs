use std::path::PathBuf;

use anyhow::Result;
use reclaim_cli::config::RunConfig;
use reclaim_cli::pipeline::{
    MatchReport, MatchRequest, OutputPaths, TruncationReport, run_check, run_match,
};
use reclaim_match::SelectionPolicy;
use tracing::info_span;

use crate::cli::{CheckArgs, MatchArgs, SelectionArg};

pub fn run_match_command(args: &MatchArgs) -> Result<MatchReport> {
    let span = info_span!("run", incomplete = %args.incomplete.display());
    let _guard = span.enter();

    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    // Flags override the config file.
    if let Some(path) = &args.patterns {
        config.pattern_table = Some(path.clone());
    }
    if let Some(selection) = args.selection {
        config.matching.selection = match selection {
            SelectionArg::FirstMatch => SelectionPolicy::FirstMatch,
            SelectionArg::BestScore => SelectionPolicy::BestScore,
        };
    }
    if let Some(length) = args.prefix_length {
        config.matching.prefix_length = length;
    }

    let outputs = if args.dry_run {
        None
    } else {
        let dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        Some(OutputPaths::in_dir(
            &dir,
            &args.matched_name,
            &args.unmatched_name,
        ))
    };

    run_match(&MatchRequest {
        reference: args.reference.clone(),
        incomplete: args.incomplete.clone(),
        config,
        outputs,
    })
}

pub fn run_check_command(args: &CheckArgs) -> Result<TruncationReport> {
    run_check(&args.incomplete, args.top)
}
