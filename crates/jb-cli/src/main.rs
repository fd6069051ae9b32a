//! JennieBrowser filter CLI
//!
//! CLI tool for checking URLs against filter lists, inspecting and linting
//! lists, and switching the persisted ad-block setting.

mod lists;
mod logging;
mod settings;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use jb_core::{RequestContext, RequestType, RuleKind};

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "jb-cli")]
#[command(about = "JennieBrowser content filter tools")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file (defaults to ~/.config/jenniebrowser/settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify URLs against the default list plus user lists
    Check {
        /// Additional filter list (repeatable)
        #[arg(short = 'f', long = "filter-list")]
        filter_lists: Vec<PathBuf>,

        /// Classify as if blocking were turned off
        #[arg(long)]
        no_adblock: bool,

        /// Resource type of the request (script, image, media, ...)
        #[arg(short = 't', long = "type", default_value = "other")]
        request_type: String,

        /// URLs to classify
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Show rule counts for the assembled filter set
    Stats {
        /// Additional filter list (repeatable)
        #[arg(short = 'f', long = "filter-list")]
        filter_lists: Vec<PathBuf>,
    },

    /// Report malformed lines in filter lists
    Lint {
        /// Filter list files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Show or change the persisted ad-block setting
    Adblock {
        #[arg(value_enum, default_value = "status")]
        state: AdblockState,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum AdblockState {
    On,
    Off,
    Status,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let settings_path = cli.settings.unwrap_or_else(Settings::default_path);

    let result = match cli.command {
        Commands::Check {
            filter_lists,
            no_adblock,
            request_type,
            urls,
        } => cmd_check(&settings_path, &filter_lists, no_adblock, &request_type, &urls),
        Commands::Stats { filter_lists } => cmd_stats(&filter_lists),
        Commands::Lint { inputs } => cmd_lint(&inputs),
        Commands::Adblock { state } => cmd_adblock(&settings_path, state),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_settings(path: &Path) -> Result<Settings, String> {
    Settings::load(path).map_err(|e| e.to_string())
}

fn cmd_check(
    settings_path: &Path,
    filter_lists: &[PathBuf],
    no_adblock: bool,
    request_type: &str,
    urls: &[String],
) -> Result<(), String> {
    let settings = load_settings(settings_path)?;
    let enabled = settings.adblock_enabled && !no_adblock;
    let engine = lists::build_engine(filter_lists, enabled);
    let request_type = RequestType::from_str(request_type);

    if !enabled {
        println!("Ad blocking is disabled; every request is allowed");
    }

    for url in urls {
        let verdict = engine.classify_request(&RequestContext::new(url, request_type));
        match engine.explain(url) {
            Some((rule, provenance)) if verdict.is_block() => {
                println!("{verdict}  {url}  ({rule} from {provenance})");
            }
            _ => println!("{verdict}  {url}"),
        }
    }

    Ok(())
}

fn cmd_stats(filter_lists: &[PathBuf]) -> Result<(), String> {
    let engine = lists::build_engine(filter_lists, true);
    let stats = engine.stats();
    let build = engine.build_stats();

    println!(
        "Filter set: bundled list + {} of {} user lists",
        engine.user_list_count(),
        filter_lists.len()
    );
    for kind in RuleKind::ALL {
        println!("  {:<10} {}", kind.as_str(), stats.count(kind));
    }
    println!("  {:<10} {}", "total", stats.total());
    println!();
    println!("Build:");
    println!("  Rules:    {} -> {}", build.before, build.after);
    println!("  Deduped:  {}", build.deduped);
    println!("  Empty:    {}", build.dropped_empty);

    Ok(())
}

fn cmd_lint(inputs: &[PathBuf]) -> Result<(), String> {
    let mut malformed = 0usize;

    for path in inputs {
        let report = lists::read_report(path).map_err(|e| e.to_string())?;
        println!(
            "{}: {} lines, {} rules, {} comments, {} blank, {} malformed",
            path.display(),
            report.lines,
            report.rules.len(),
            report.comments,
            report.blank,
            report.skipped.len()
        );
        for skipped in &report.skipped {
            println!("  {}:{}: '{}' has an empty pattern", path.display(), skipped.line_number, skipped.text);
        }
        malformed += report.skipped.len();
    }

    if malformed > 0 {
        log::info!("{malformed} malformed lines ignored");
    }

    Ok(())
}

fn cmd_adblock(settings_path: &Path, state: AdblockState) -> Result<(), String> {
    let mut settings = load_settings(settings_path)?;

    match state {
        AdblockState::Status => {}
        AdblockState::On | AdblockState::Off => {
            settings.adblock_enabled = state == AdblockState::On;
            settings.save(settings_path).map_err(|e| e.to_string())?;
        }
    }

    println!(
        "Ad blocking is {}",
        if settings.adblock_enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
