#![allow(clippy::print_stderr, clippy::print_stdout)]

use anyhow::Result;
use clap::Parser;
use std::io::Write;

use gentype::cli::args::CliArgs;
use gentype::cli::driver;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    // No subscriber unless --log, --trace-queries, GENTYPE_LOG or RUST_LOG asks for one.
    args.logging.tracing_config().init();

    let output = driver::run(&args)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;
    eprint!("{}", output.stderr);

    if output.exit_code != driver::EXIT_SUCCESS {
        std::process::exit(output.exit_code);
    }
    Ok(())
}
