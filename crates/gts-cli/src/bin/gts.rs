use anyhow::Result;
use clap::Parser;

use gts_cli::args::{CliArgs, Command};
use gts_cli::driver;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    // GTS_LOG / RUST_LOG win over --verbose; see gts_core::tracing_config.
    gts_core::tracing_config::init_tracing_with_default(args.verbose.then_some("debug"));

    let inline = args.inline_options();
    match &args.command {
        Command::Build {
            files,
            out_dir,
            source_map,
        } => {
            driver::build(files, out_dir.as_deref(), *source_map, &inline)?;
        }
        Command::Typings { file, mappings } => {
            let output = driver::typings(file, *mappings, &inline)?;
            println!("{output}");
        }
    }
    Ok(())
}
