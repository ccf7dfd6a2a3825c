pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "roboadvisor",
    about = "Roboadvisor operator CLI",
    long_about = "Replay dialog events, check slot values, look up portfolio recommendations, and inspect configuration.",
    after_help = "Examples:\n  roboadvisor invoke --event fixtures/events/delegate.json\n  roboadvisor validate --age 70\n  roboadvisor recommend --risk-level medium\n  roboadvisor doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Dispatch a dialog event file (or `-` for stdin) and print the response")]
    Invoke {
        #[arg(long, help = "Path to a dialog event JSON file, or `-` to read stdin")]
        event: PathBuf,
    },
    #[command(about = "Run the slot validator against the given values")]
    Validate {
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        investment_amount: Option<String>,
        #[arg(long)]
        risk_level: Option<String>,
    },
    #[command(about = "Print the portfolio allocation for a risk level")]
    Recommend {
        #[arg(long)]
        risk_level: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Validate config and run sample dialog turns through the dispatcher")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Invoke { event } => commands::invoke::run(&event),
        Command::Validate { age, investment_amount, risk_level } => commands::validate::run(
            age.as_deref(),
            investment_amount.as_deref(),
            risk_level.as_deref(),
        ),
        Command::Recommend { risk_level } => commands::recommend::run(&risk_level),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
