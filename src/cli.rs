use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{self, CommandReport};

#[derive(Debug, Parser)]
#[command(
    name = "tab-archive",
    version,
    about = "Browse, restore and prune auto-closed editor drafts"
)]
struct Cli {
    /// Print the command report as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show resolved configuration, paths and archive totals.
    Status,
    /// List archived days, newest first.
    Dates,
    /// List the tabs archived on one day.
    List {
        /// Archive day as YYYY-MM-DD.
        date: String,
    },
    /// Print an archived tab's content, or write it to a file.
    Restore {
        date: String,
        /// Archive file name as shown by `list`.
        file: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete every archived tab.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Open the archive folder in the system file browser.
    Open,
    /// Delete archive days older than the retention window.
    Prune {
        /// Run even when today is not the first of the month.
        #[arg(long)]
        force: bool,
        /// Treat this date (YYYY-MM-DD) as today.
        #[arg(long)]
        today: Option<String>,
    },
}

fn render(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    match &report.payload {
        Some(payload) => print!("{payload}"),
        None => {
            for line in &report.details {
                println!("{line}");
            }
        }
    }
    for issue in &report.issues {
        eprintln!("issue: {issue}");
    }
    Ok(())
}

/// Runs the parsed command. Returns whether the report came back clean.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    let report = match cli.command {
        Command::Status => commands::status::run()?,
        Command::Dates => commands::dates::run()?,
        Command::List { date } => commands::list::run(&date)?,
        Command::Restore { date, file, output } => {
            commands::restore::run(&date, &file, output.as_deref())?
        }
        Command::Clear { yes } => commands::clear::run(yes)?,
        Command::Open => commands::open::run()?,
        Command::Prune { force, today } => {
            commands::prune::run(&commands::prune::PruneOptions { force, today })?
        }
    };

    render(&report, cli.json)?;
    Ok(report.ok)
}
