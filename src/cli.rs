use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "subgrab")]
#[command(about = "Find and download subtitles for your videos")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download subtitles for a video file or every video under a directory
    #[command(visible_alias = "download")]
    Dl(DownloadArgs),

    /// List what can be configured
    List {
        #[arg(value_enum)]
        what: ListTarget,
    },
}

#[derive(clap::Args)]
pub struct DownloadArgs {
    /// Video file or directory to scan recursively
    pub path: PathBuf,

    /// Subtitle languages by priority, comma separated (first to match is downloaded)
    #[arg(short, long, value_delimiter = ',')]
    pub languages: Option<Vec<String>>,

    /// Providers to search, by priority, comma separated
    #[arg(short = 'a', long, visible_alias = "apis", value_delimiter = ',')]
    pub providers: Option<Vec<String>>,

    /// Open the path with the default player once done
    #[arg(short, long)]
    pub open: bool,

    /// Number of videos processed at the same time
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, ValueEnum, PartialEq, Eq)]
pub enum ListTarget {
    Languages,
    #[value(alias = "apis")]
    Providers,
}
