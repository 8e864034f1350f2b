use std::process::ExitCode;

fn main() -> ExitCode {
    antar_cli::run()
}
