use std::time::Duration;

use url::Url;

use crate::aggregate::AggregateReport;
use crate::args::{HttpMethod, PositiveU64, RunArgs};
use crate::error::{AppError, AppResult, ValidationError};

/// Immutable description of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub rps: PositiveU64,
    /// Number of groups to dispatch. Zero runs until stopped or aborted.
    pub duration_secs: u64,
    pub burst: bool,
    pub method: HttpMethod,
    pub url: Url,
    pub body: String,
    pub request_timeout: Option<Duration>,
}

impl RunConfig {
    /// Builds the run configuration from parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the URL is missing, unparsable, has no
    /// host, or uses a scheme other than http/https.
    pub fn from_args(args: &RunArgs) -> AppResult<Self> {
        let raw = args
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
        let url = parse_target_url(raw)?;

        Ok(Self {
            rps: args.rps,
            duration_secs: args.duration,
            burst: args.burst,
            method: args.method,
            url,
            body: args.data.clone(),
            request_timeout: args.request_timeout,
        })
    }

    #[must_use]
    pub const fn duration_limit(&self) -> Option<u64> {
        if self.duration_secs == 0 {
            None
        } else {
            Some(self.duration_secs)
        }
    }
}

pub(crate) fn parse_target_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::validation(ValidationError::UnsupportedScheme {
                scheme: other.to_owned(),
            }));
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::validation(ValidationError::UrlMissingHost {
            url: raw.to_owned(),
        }));
    }
    Ok(url)
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    /// Every configured group was dispatched and drained.
    Completed,
    /// A cooperative stop ended ticking early; in-flight work was drained.
    Stopped,
    /// The run was cut short without waiting for in-flight work.
    Aborted,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub end: RunEnd,
    pub groups_dispatched: u64,
    pub requests_dispatched: u64,
    /// Absent when the run was aborted and the aggregator was dropped.
    pub aggregate: Option<AggregateReport>,
}

#[cfg(test)]
impl RunConfig {
    /// GET against a placeholder host; executors in tests never contact it.
    pub(crate) fn for_test(rps: u64, duration_secs: u64, burst: bool) -> Result<Self, String> {
        let rps = PositiveU64::try_from(rps).map_err(|err| format!("bad rps: {}", err))?;
        let url = Url::parse("http://127.0.0.1:9/").map_err(|err| format!("bad url: {}", err))?;
        Ok(Self {
            rps,
            duration_secs,
            burst,
            method: HttpMethod::Get,
            url,
            body: String::new(),
            request_timeout: None,
        })
    }
}
