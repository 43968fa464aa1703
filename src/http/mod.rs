//! Outbound HTTP requests.
mod client;
mod executor;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use client::build_client;
pub use executor::{RequestExecutor, RequestFailure, ReqwestExecutor};
