use anyhow::Context;
use colored::{ColoredString, Colorize};
use log::{info, warn};

use crate::classify::{classify_sim_error, Classification, Severity};
use crate::cli::args::Args;
use crate::config::Thresholds;
use crate::version::ExpectedVersion;

pub mod args;

/// Exit code reported when classification could not be completed.
pub const ERROR_EXIT_CODE: u8 = 3;

/// Maps the outcome of [`run`] to the process exit code: the severity code
/// (0 green, 1 amber, 2 red), or [`ERROR_EXIT_CODE`] on error.
pub fn exit_code(res: &anyhow::Result<Severity>) -> u8 {
    match res {
        Ok(severity) => severity.code(),
        Err(_) => ERROR_EXIT_CODE,
    }
}

pub fn run(args: Args) -> anyhow::Result<Classification> {
    let thresholds = match &args.thresholds {
        Some(path) => Thresholds::load(path)
            .with_context(|| format!("failed to load thresholds from {path:?}"))?,
        None => Thresholds::default(),
    };

    info!("Template: {:?}", &args.template);
    info!("Result: {:?}", &args.result);

    let version = ExpectedVersion::new(args.expected_version, args.observed_version);
    let classification = classify_sim_error(&args.template, &args.result, &thresholds, &version)
        .with_context(|| {
            format!(
                "failed to compare {:?} against {:?}",
                &args.result, &args.template
            )
        })?;

    for notice in classification.notices.iter() {
        warn!("{notice}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        print_summary(&classification);
    }

    Ok(classification)
}

fn colored_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Ok => severity.label().green().bold(),
        Severity::Warn => severity.label().yellow().bold(),
        Severity::Fail => severity.label().bright_white().on_red().bold(),
    }
}

fn print_summary(classification: &Classification) {
    println!("{}", colored_label(classification.severity));
    info!("Rows compared: {}", classification.rows_compared);
    if let Some(row) = &classification.deciding_row {
        info!(
            "Deciding row (template line {}): frequency {:.4}%, power {:.4}%, error {:.4}%",
            row.line, row.frequency, row.power, row.error
        );
    }
}
