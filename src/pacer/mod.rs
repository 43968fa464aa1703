//! One-second pacing of request groups.
mod dispatcher;
mod gate;
mod task;


pub use dispatcher::{DispatchReport, Dispatcher, TICK_PERIOD};
#[cfg(test)]
use gate::BurstGate;
