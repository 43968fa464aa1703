//! Run-level types shared by the pacer, the aggregator and the CLI.
mod run;

pub use run::{RunConfig, RunEnd, RunReport};
