mod cli;
mod config;
mod domain;
mod error;
mod media;
mod sources;
mod workflows;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, DownloadArgs, ListTarget};
use domain::language::LanguageRegistry;
use media::{classifier, opener};
use sources::SourceRegistry;
use workflows::orchestrator::Orchestrator;
use workflows::report;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let languages = LanguageRegistry::builtin()?;

    match cli.command {
        Command::Dl(args) => download(args, &languages),
        Command::List { what } => {
            let settings = config::load(config::Overrides::default())?;
            let lines = match what {
                ListTarget::Languages => report::format_languages(&languages),
                ListTarget::Providers => {
                    let sources = SourceRegistry::builtin(&settings.http)?;
                    report::format_providers(&sources, &settings.providers)
                }
            };
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn download(args: DownloadArgs, languages: &LanguageRegistry) -> Result<()> {
    if !args.path.exists() {
        bail!("Input path does not exist: {:?}", args.path);
    }
    tracing::info!("Given video path is {}", args.path.display());

    let settings = config::load(config::Overrides {
        languages: args.languages,
        providers: args.providers,
        jobs: args.jobs.map(usize::from),
    })?;

    // Configuration errors that leave nothing to try end the run here
    let wanted = languages.resolve(&settings.languages)?;
    let sources = SourceRegistry::builtin(&settings.http)?.select(&settings.providers)?;

    let videos = classifier::collect_videos(&args.path);
    if !args.json {
        match videos.len() {
            0 => println!("No video file found in {:?}", args.path),
            n => println!("Found {n} video file(s) to process"),
        }
    }

    let reports = Orchestrator::new(sources, wanted).run(&videos, settings.jobs);

    if args.json {
        println!("{}", report::to_json(&reports)?);
    } else {
        for entry in &reports {
            println!("{}", report::format_report(entry));
        }
        if !reports.is_empty() {
            println!("{}", report::format_summary(&reports));
        }
    }

    if args.open {
        if let Err(e) = opener::open_with_default_app(&args.path) {
            tracing::warn!("Could not open {}: {e}", args.path.display());
        }
    }

    Ok(())
}
