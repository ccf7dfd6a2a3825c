use std::process::ExitCode;

fn main() -> ExitCode {
    roboadvisor_cli::run()
}
