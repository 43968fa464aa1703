use reqwest::Client;

use crate::args::DEFAULT_USER_AGENT;
use crate::domain::RunConfig;
use crate::error::{AppError, AppResult, HttpError};

/// Builds the shared client used by every request task of a run.
///
/// # Errors
///
/// Returns an error when the client cannot be constructed.
pub fn build_client(config: &RunConfig) -> AppResult<Client> {
    let mut builder = Client::builder().user_agent(DEFAULT_USER_AGENT);
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
