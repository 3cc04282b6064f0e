//! The `drfgen` binary.

fn main() {
    let args: Vec<String> = std::env::args().collect();
    std::process::exit(drfgen_cli::run_cli(args));
}
