use clap::Parser;
use index_model::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
