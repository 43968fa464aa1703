//! Destinations for group summaries.
mod writers;


pub use writers::{JsonLinesWriter, SummaryWriter, TextWriter, stdout_writer};
