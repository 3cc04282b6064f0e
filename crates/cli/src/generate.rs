//! `drfgen generate`: render the module and write it unless it is current.

use clap::Args;
use drfgen_core::{WriteMode, WriteOutcome, write_artifact};

use crate::common::{InputArgs, prepare};

/// Arguments of `drfgen generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Schema, config and output paths
    #[command(flatten)]
    pub input: InputArgs,

    /// Rewrite the output even when its fingerprint is unchanged
    #[arg(long)]
    pub always_write: bool,

    /// Print the module to stdout instead of writing it
    #[arg(long)]
    pub stdout: bool,
}

/// Exit code 0 when the module was written or already current, 1 on any error.
pub fn run(args: GenerateArgs) -> i32 {
    match run_inner(&args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn run_inner(args: &GenerateArgs) -> Result<(), String> {
    let prepared = prepare(&args.input)?;

    if args.stdout {
        print!("{}", prepared.output.contents);
        return Ok(());
    }

    let mode = if args.always_write {
        WriteMode::Always
    } else {
        prepared.config.output.write_mode
    };

    match write_artifact(&prepared.output, &prepared.out, mode).map_err(|err| err.to_string())? {
        WriteOutcome::Written => println!("Generated {}", prepared.out.display()),
        WriteOutcome::Unchanged => println!("{} is up to date", prepared.out.display()),
    }
    Ok(())
}
