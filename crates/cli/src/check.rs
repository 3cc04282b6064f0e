//! `drfgen check`: compare the module on disk with a fresh generation.

use clap::Args;
use drfgen_core::is_up_to_date;

use crate::common::{InputArgs, prepare};

/// Arguments of `drfgen check`.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Schema, config and output paths
    #[command(flatten)]
    pub input: InputArgs,
}

/// Exit code 0 when the module on disk matches a fresh generation, 1 otherwise.
pub fn run(args: CheckArgs) -> i32 {
    match run_inner(&args) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn run_inner(args: &CheckArgs) -> Result<bool, String> {
    let prepared = prepare(&args.input)?;
    let current = is_up_to_date(&prepared.output, &prepared.out);
    if current {
        println!("{} is up to date", prepared.out.display());
    } else {
        eprintln!(
            "{} is out of date, run `drfgen generate` to regenerate it",
            prepared.out.display()
        );
    }
    Ok(current)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;

    const SCHEMA: &str = r#"{
        "serializers": [{
            "name": "TagSerializer",
            "fields": [{"name": "id", "type": "integer", "read_only": true}]
        }]
    }"#;

    #[test]
    fn test_check_reports_stale_then_current() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.json");
        fs::write(&schema, SCHEMA).unwrap();
        let config = dir.path().join("drfgen.toml");
        fs::write(&config, "").unwrap();
        let input = InputArgs {
            schema,
            config: Some(config),
            out: Some(dir.path().join("api.ts")),
        };

        assert_eq!(run(CheckArgs { input: input.clone() }), 1);

        let prepared = prepare(&input).unwrap();
        fs::write(&prepared.out, &prepared.output.contents).unwrap();
        assert_eq!(run(CheckArgs { input }), 0);
    }
}
