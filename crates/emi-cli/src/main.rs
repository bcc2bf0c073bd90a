mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{LoanArgs, ScheduleArgs};
use emi_core::EmiError;

/// Loan EMI and amortization calculations
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI and amortization calculations",
    long_about = "A CLI for loan EMI calculations with decimal precision. Supports \
                  reducing-balance and flat-rate interest, moratorium periods with \
                  interest capitalisation, processing fees, and month-by-month \
                  amortization schedules."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// JSON or YAML file overriding the accepted loan limits
    #[arg(long, global = true)]
    limits: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check loan parameters and report every invalid field
    Validate(LoanArgs),
    /// Compute EMI, total interest and total payment
    Compute(LoanArgs),
    /// Month-by-month amortization schedule (reducing balance only)
    Schedule(ScheduleArgs),
    /// Compare reducing-balance and flat-rate interest for the same loan
    Compare(LoanArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let limits = match input::file::read_limits(cli.limits.as_deref()) {
        Ok(limits) => limits,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Validate(args) => commands::loan::run_validate(args, &limits),
        Commands::Compute(args) => commands::loan::run_compute(args, &limits),
        Commands::Schedule(args) => commands::loan::run_schedule(args, &limits),
        Commands::Compare(args) => commands::loan::run_compare(args, &limits),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            report_error(e.as_ref());
            process::exit(1);
        }
    }
}

fn report_error(e: &(dyn std::error::Error + 'static)) {
    if let Some(EmiError::Validation(fields)) = e.downcast_ref::<EmiError>() {
        eprintln!("{}: invalid loan parameters", "error".red().bold());
        for (field, message) in fields.iter() {
            eprintln!("  {} {}", format!("{field}:").yellow(), message);
        }
    } else {
        eprintln!("{}: {}", "error".red().bold(), e);
    }
}
