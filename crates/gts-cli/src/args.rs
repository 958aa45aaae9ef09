use clap::{Parser, Subcommand};
use gts_core::PartialTranspileOptions;
use std::path::PathBuf;

/// CLI arguments for the gts binary.
#[derive(Parser, Debug)]
#[command(name = "gts", version, about = "Transpiler for GTS, TypeScript with define blocks")]
pub struct CliArgs {
    /// Log progress; same as GTS_LOG=debug unless GTS_LOG or RUST_LOG is set.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Module the runtime entry points are imported from.
    #[arg(long = "runtime-import-source", global = true)]
    pub runtime_import_source: Option<String>,

    /// Base module for the provider submodules (vm, query, binder).
    #[arg(long = "provider-import-source", global = true)]
    pub provider_import_source: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transpile GTS files to JavaScript.
    Build {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write outputs here instead of next to each input.
        #[arg(long = "out-dir")]
        out_dir: Option<PathBuf>,

        /// Also write a `.js.map` file and link it from the output.
        #[arg(long = "source-map")]
        source_map: bool,
    },
    /// Print the virtual TypeScript document for a GTS file.
    Typings {
        file: PathBuf,

        /// Print the document and its mappings as JSON.
        #[arg(long)]
        mappings: bool,
    },
}

impl CliArgs {
    /// Options given on the command line; they override project settings.
    pub fn inline_options(&self) -> PartialTranspileOptions {
        PartialTranspileOptions {
            runtime_import_source: self.runtime_import_source.clone(),
            provider_import_source: self.provider_import_source.clone(),
            ..PartialTranspileOptions::default()
        }
    }
}
