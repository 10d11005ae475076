use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "repertorium",
    version,
    about = "Extract notary records from the transcribed Notarial Repertorium"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Labels(LabelsArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = "data/repertorium.txt")]
    pub input: PathBuf,

    #[arg(long, default_value = "data")]
    pub output_dir: PathBuf,

    #[arg(long)]
    pub csv_path: Option<PathBuf>,

    #[arg(long)]
    pub json_path: Option<PathBuf>,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub vocabulary_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = PrecisionMode::Explicit)]
    pub precision_mode: PrecisionMode,

    /// Reference date for filling missing month/day (defaults to the local date).
    #[arg(long, value_parser = parse_iso_date)]
    pub today: Option<NaiveDate>,

    #[arg(long, default_value_t = false)]
    pub flush_trailing_chunk: bool,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum PrecisionMode {
    Explicit,
    TodayHeuristic,
}

impl PrecisionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::TodayHeuristic => "today-heuristic",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct LabelsArgs {
    #[arg(long)]
    pub vocabulary_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "data")]
    pub output_dir: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got '{value}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_defaults_match_legacy_paths() {
        let cli = Cli::parse_from(["repertorium", "extract"]);
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract command");
        };
        assert_eq!(args.input, PathBuf::from("data/repertorium.txt"));
        assert_eq!(args.precision_mode, PrecisionMode::Explicit);
        assert!(!args.flush_trailing_chunk);
    }

    #[test]
    fn today_accepts_iso_dates_only() {
        let cli = Cli::parse_from([
            "repertorium",
            "extract",
            "--precision-mode",
            "today-heuristic",
            "--today",
            "2024-06-15",
        ]);
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract command");
        };
        assert_eq!(args.today, NaiveDate::from_ymd_opt(2024, 6, 15));
        assert_eq!(args.precision_mode, PrecisionMode::TodayHeuristic);

        assert!(Cli::try_parse_from(["repertorium", "extract", "--today", "15-06-2024"]).is_err());
    }
}
