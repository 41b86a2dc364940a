//! Access to the Pachca directory endpoint.
//!
//! Fetching and decoding are kept apart: [`FetchDirectory::fetch`] returns
//! the raw body of a successful response and [`decode`] turns it into
//! records.

use reqwest::{StatusCode, Url, blocking};
use tracing::{debug, info, instrument};

use crate::domain::{Config, DirectoryResponse, Token};

const USER_AGENT: &str = concat!("pachca-directory/", env!("CARGO_PKG_VERSION"));

/// Something that can produce the raw directory body.
pub trait FetchDirectory {
    /// Fetches the directory and returns the body of a `200 OK` response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the request fails and [`Error::Api`]
    /// for any status other than `200 OK`.
    fn fetch(&self) -> Result<String, Error>;
}

/// Blocking HTTP client for the directory endpoint.
#[derive(Debug)]
pub struct Client {
    http: blocking::Client,
    endpoint: Url,
    token: Token,
}

impl Client {
    /// Creates a client for `endpoint` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the underlying HTTP client cannot be
    /// initialised (for example, no TLS backend).
    pub fn new(endpoint: Url, token: Token) -> Result<Self, Error> {
        let http = blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    /// Creates a client from a resolved configuration.
    ///
    /// # Errors
    ///
    /// See [`Client::new`].
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(config.endpoint().clone(), config.token().clone())
    }
}

impl FetchDirectory for Client {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    fn fetch(&self) -> Result<String, Error> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .bearer_auth(self.token.expose())
            .send()
            .map_err(Error::Transport)?;

        let status = response.status();
        info!("Response Status Code: {}", status.as_u16());

        let body = response.text().map_err(Error::Transport)?;
        debug!(bytes = body.len(), "received response body");

        check_status(status, body)
    }
}

/// Passes the body through for `200 OK` and turns any other status into
/// [`Error::Api`].
///
/// # Errors
///
/// Returns [`Error::Api`] carrying the status and raw body.
pub fn check_status(status: StatusCode, body: String) -> Result<String, Error> {
    if status == StatusCode::OK {
        Ok(body)
    } else {
        Err(Error::Api {
            status: status.as_u16(),
            body,
        })
    }
}

/// Decodes a response body into the directory envelope.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the body is not JSON or does not have the
/// expected shape.
pub fn decode(body: &str) -> Result<DirectoryResponse, Error> {
    serde_json::from_str(body).map_err(Error::Decode)
}

/// Failures talking to the API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or the response could not be read.
    #[error("Ошибка при выполнении запроса")]
    Transport(#[source] reqwest::Error),

    /// The API answered with something other than `200 OK`.
    #[error("Ошибка API (HTTP {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The body is not a valid directory envelope.
    #[error("Ошибка при разборе JSON")]
    Decode(#[source] serde_json::Error),
}
