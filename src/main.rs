//! station-gantt - Gantt chart data for aircraft maintenance schedules

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = station_gantt::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
