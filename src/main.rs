// src/main.rs
use colorful::Colorful;
use std::process::ExitCode;

fn main() -> ExitCode {
    match chordcheckr::cli::run() {
        Ok(summary) if summary.has_failures() => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}
