//! task-report - Task progress summaries and report exports

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = task_report::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
