use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about,
    help_template(
        "{before-help}{name} {version}\n{author-with-newline}{about-with-newline}\n{usage-heading} {usage}\n\n{all-args}{after-help}"
    )
)]
pub struct Args {
    /// Stored reference simulation results.
    pub template: PathBuf,

    /// Newly generated simulation results.
    pub result: PathBuf,

    /// Path to TOML thresholds file. Built-in thresholds are used if omitted.
    #[arg(short, long)]
    pub thresholds: Option<PathBuf>,

    /// Simulator version used to generate the template.
    #[arg(long)]
    pub expected_version: Option<String>,

    /// Simulator version used to generate the result.
    #[arg(long)]
    pub observed_version: Option<String>,

    /// Print the full classification as JSON.
    #[arg(long)]
    pub json: bool,
}
