//! Binary entrypoint for the `notify-exec` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match notify_exec::run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("notify-exec: {err}");
            ExitCode::FAILURE
        }
    }
}
