//! CLI for normlab: watch a normal sample converge to its distribution.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

use commands::RunArgs;

#[derive(Parser)]
#[command(name = "normlab")]
#[command(about = "normlab: live normal-distribution sampling with histogram, time series, Q-Q and CDF views")]
#[command(version = normlab_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard: grow the sample batch by batch and watch it converge.
    /// Keys: q/Esc quit, p pause, +/- speed, s save a JSON snapshot.
    Animate {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Headless run: one line per tick, then the final analysis report
    Simulate {
        #[command(flatten)]
        run: RunArgs,

        /// Write the per-tick history and final statistics as JSON
        #[arg(long)]
        output: Option<String>,

        /// Suppress the banner and per-tick lines
        #[arg(long)]
        quiet: bool,
    },

    /// Print the resolved configuration as JSON
    Config {
        #[command(flatten)]
        run: RunArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    // The dashboard owns the terminal, so keep stderr quiet unless asked.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match cli.command {
        Commands::Animate { run } => commands::animate::run(&run),
        Commands::Simulate { run, output, quiet } => {
            commands::simulate::run(commands::simulate::SimulateCommandConfig {
                run: &run,
                output_path: output.as_deref(),
                quiet,
            })
        }
        Commands::Config { run } => commands::config::run(&run),
    }
}
