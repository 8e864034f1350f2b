pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "antar",
    about = "Antar operator CLI",
    long_about = "Apply migrations, load sample reservations, and inspect Antar configuration.",
    after_help = "Examples:\n  antar migrate\n  antar seed --count 25\n  antar config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Insert randomly generated sample reservations for demos and reports")]
    Seed {
        #[arg(
            long,
            default_value_t = commands::seed::DEFAULT_COUNT,
            help = "Number of reservations to insert"
        )]
        count: usize,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed { count } => commands::seed::run(count),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
