use std::process::ExitCode;

use pointmap::ui::output;

fn main() -> ExitCode {
    match pointmap::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
