//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

use crate::batch::RunSettings;
use crate::config::JudgmentConfig;

/// chordcheckr - tell chord takes from melody takes
///
/// Scans a directory for audio files whose names carry the source marker
/// (default `_MLD`), judges each one, and swaps the marker for the chord
/// marker (default `_CHP`) on files judged as chords.
#[derive(Parser, Debug)]
#[command(name = "chordcheckr")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory (or single file) to process
    #[arg(value_name = "DIR")]
    pub input: PathBuf,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "PATH", env = "CHORDCHECKR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Judgment method, overriding the configuration file
    #[arg(short, long, value_name = "NAME")]
    pub method: Option<String>,

    /// Analyze and report only; rename nothing
    #[arg(short, long, visible_alias = "dry-run")]
    pub test: bool,

    /// Worker threads for analysis
    #[arg(short = 'j', long, value_name = "N", default_value_t = 1)]
    pub jobs: usize,

    /// Print results as one JSON document
    #[arg(long)]
    pub json: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log level from `-v` flags, falling back to the configured level
    pub fn log_level(&self, config: &JudgmentConfig) -> log::LevelFilter {
        match self.verbose {
            0 => config.level_filter(),
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Apply command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut JudgmentConfig) {
        if let Some(method) = &self.method {
            config.judgment_method = method.clone();
        }
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            dry_run: self.test,
            jobs: self.jobs.max(1),
            show_progress: !self.no_progress && !self.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["chordcheckr", "takes"]).unwrap();
        assert_eq!(args.input, PathBuf::from("takes"));
        assert!(!args.test);
        assert_eq!(args.jobs, 1);
        let settings = args.run_settings();
        assert!(!settings.dry_run);
        assert!(settings.show_progress);
    }

    #[test]
    fn test_dry_run_alias_and_method_override() {
        let args = Args::try_parse_from([
            "chordcheckr",
            "takes",
            "--dry-run",
            "--method",
            "pitch_distribution",
            "-j",
            "4",
        ])
        .unwrap();
        assert!(args.test);
        assert_eq!(args.run_settings().jobs, 4);

        let mut config = JudgmentConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.judgment_method, "pitch_distribution");
    }

    #[test]
    fn test_verbosity_overrides_config_level() {
        let config = JudgmentConfig {
            logging_level: "warn".into(),
            ..Default::default()
        };
        let quiet = Args::try_parse_from(["chordcheckr", "d"]).unwrap();
        assert_eq!(quiet.log_level(&config), log::LevelFilter::Warn);
        let loud = Args::try_parse_from(["chordcheckr", "d", "-vv"]).unwrap();
        assert_eq!(loud.log_level(&config), log::LevelFilter::Debug);
    }

    #[test]
    fn test_json_hides_progress() {
        let args = Args::try_parse_from(["chordcheckr", "d", "--json"]).unwrap();
        assert!(!args.run_settings().show_progress);
    }

    #[test]
    fn test_missing_input_rejected() {
        assert!(Args::try_parse_from(["chordcheckr"]).is_err());
    }
}
