use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use simcheck::cli::{args::Args, exit_code, run, ERROR_EXIT_CODE};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(ERROR_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let res = run(args).map(|classification| classification.severity);
    if let Err(e) = &res {
        eprintln!("{} {e:?}", "error:".red().bold());
    }
    ExitCode::from(exit_code(&res))
}
