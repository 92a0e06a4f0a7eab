use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    scnload::run()
}
