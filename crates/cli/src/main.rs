use std::process::ExitCode;

fn main() -> ExitCode {
    netbot_cli::run()
}
