use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::{debug, LevelFilter};

use autotag::cli::{self, Outcome, WorkflowArgs};
use autotag::config;
use autotag::domain::prerelease::parse_date_stamp;
use autotag::domain::{BumpKind, VersionTagPlanner};
use autotag::git::Git2Repository;
use autotag::ui::{self, TerminalPrompt};

#[derive(clap::Parser)]
#[command(
    name = "autotag",
    version,
    about = "Propose, create and push version tags based on the current branch"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Remote to push the tag to [default: from config, origin]")]
    remote: Option<String>,

    #[arg(long, help = "Plan for this branch instead of the checked-out one")]
    branch: Option<String>,

    #[arg(long, value_parser = parse_bump, help = "Force a bump kind: none, patch, minor or major")]
    bump: Option<BumpKind>,

    #[arg(long, value_parser = parse_date, help = "Date stamp for pre-release tags (YYYYMMDD)")]
    date: Option<NaiveDate>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short = 'y', long, help = "Answer yes to all confirmation prompts")]
    yes: bool,

    #[arg(long, help = "Create the tag but never push it")]
    no_push: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, help = "List tags with their validity and exit")]
    list_tags: bool,
}

fn parse_bump(s: &str) -> std::result::Result<BumpKind, String> {
    s.parse().map_err(|e: autotag::AutoTagError| e.to_string())
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date_stamp(s).map_err(|e| e.to_string())
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    let repo = Git2Repository::open(".")?;

    if args.list_tags {
        let listing = cli::tag_listing(&repo)?;
        ui::display_tag_listing(&listing);
        return Ok(());
    }

    let planner =
        VersionTagPlanner::new(config.strategy_table()?).with_bump_override(args.bump);
    let workflow_args = WorkflowArgs {
        branch: args.branch,
        remote: args.remote.unwrap_or(config.tagging.remote),
        dry_run: args.dry_run,
        assume_yes: args.yes,
        no_push: args.no_push,
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
    };
    debug!("workflow args: {:?}", workflow_args);

    let result = cli::run_workflow(&repo, &mut TerminalPrompt, &planner, workflow_args)?;
    match &result.outcome {
        Outcome::Skipped(reason) => debug!("skipped: {}", reason),
        outcome => debug!("finished with {:?}", outcome),
    }

    Ok(())
}
