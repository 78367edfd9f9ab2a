//! tix-plugin-template - example plugin for the tix plugin runner
//!
//! Echoes the invocation context and argument list. Arguments are passed
//! through verbatim; all parsing is the host's business.

use std::env;
use std::process::ExitCode;

fn run() -> anyhow::Result<()> {
    let context = tix_plugin::host::load_context()?;
    let argv: Vec<String> = env::args().skip(1).collect();
    tix_plugin::template::run_stdout(&context, &argv)?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
