use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use thiserror::Error;

use crate::args::HttpMethod;
use crate::domain::RunConfig;
use crate::error::{AppError, AppResult, HttpError};

use super::client::build_client;

/// A request attempt that produced no response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestFailure {
    pub message: String,
    pub timed_out: bool,
}

impl RequestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }
}

impl From<reqwest::Error> for RequestFailure {
    fn from(err: reqwest::Error) -> Self {
        Self {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

/// Performs the outbound call for one request task.
///
/// Any received status is a success at this layer; only a missing response
/// is a [`RequestFailure`]. Implementations release the response before
/// returning.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self) -> Result<u16, RequestFailure>;
}

/// [`RequestExecutor`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
    method: Method,
    url: Url,
    body: Option<String>,
}

impl ReqwestExecutor {
    /// Builds the client and checks that the request can be assembled.
    ///
    /// # Errors
    ///
    /// Returns an error when the client or the request cannot be built.
    pub fn new(config: &RunConfig) -> AppResult<Self> {
        let executor = Self {
            client: build_client(config)?,
            method: reqwest_method(config.method),
            url: config.url.clone(),
            body: config.method.sends_body().then(|| config.body.clone()),
        };
        executor.request().build().map_err(|err| {
            AppError::http(HttpError::BuildRequestFailed {
                url: executor.url.to_string(),
                source: err,
            })
        })?;
        Ok(executor)
    }

    fn request(&self) -> reqwest::RequestBuilder {
        let request = self.client.request(self.method.clone(), self.url.clone());
        match self.body.as_ref() {
            Some(body) => request.body(body.clone()),
            None => request,
        }
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self) -> Result<u16, RequestFailure> {
        let response = self.request().send().await?;
        let status = response.status().as_u16();
        drop(response);
        Ok(status)
    }
}

const fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
    }
}
