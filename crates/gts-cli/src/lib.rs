//! The `gts` command line: build JavaScript from GTS sources, or dump the
//! virtual TypeScript document editor tooling sees.

pub mod args;
pub mod driver;
