//! Command-line entry point for drfgen.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub mod check;
pub mod common;
pub mod generate;

#[derive(Parser)]
#[command(
    name = "drfgen",
    version,
    about = "Generate typed models and a Redux CRUD scaffold from a DRF schema"
)]
struct Cli {
    /// Log debug output (overridden by DRFGEN_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the TypeScript client module
    Generate(generate::GenerateArgs),
    /// Check whether the generated module on disk is current
    Check(check::CheckArgs),
}

/// Parse `args` and run the selected command, returning the process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            match cli.command {
                Some(Commands::Generate(args)) => generate::run(args),
                Some(Commands::Check(args)) => check::run(args),
                None => {
                    let mut cmd = Cli::command();
                    let _ = cmd.print_help();
                    println!();
                    0
                }
            }
        }
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    // DRFGEN_LOG takes a plain level ("debug") or a full filter spec
    // like "drfgen_core=trace".
    let filter = match std::env::var("DRFGEN_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("drfgen_core={level},drfgen_cli={level}")
        }
        Ok(spec) => spec,
        Err(_) => format!("drfgen_core={default_level},drfgen_cli={default_level}"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
