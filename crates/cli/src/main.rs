use std::process::ExitCode;

fn main() -> ExitCode {
    mixmart_cli::run()
}
