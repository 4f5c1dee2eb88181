use std::path::PathBuf;

use clap::Parser;

use scanvm_cli::cli;

#[derive(Parser, Debug)]
#[command(name = "scanvm", about = "Structured Text scan-cycle interpreter")]
struct Args {
    #[command(subcommand)]
    action: Action,
}

#[derive(clap::Subcommand, Debug)]
enum Action {
    /// Runs a JSON-encoded program for a number of scan cycles.
    Run {
        program: PathBuf,
        #[arg(long, default_value_t = 100)]
        scan_time_ms: i64,
        #[arg(long, default_value_t = 1)]
        scans: u32,
    },
}

pub fn main() -> Result<(), String> {
    env_logger::init();
    let args = Args::parse();

    match args.action {
        Action::Run {
            program,
            scan_time_ms,
            scans,
        } => cli::run(program, scan_time_ms, scans),
    }
}
