//! Client handle: configuration, gate sequencing, request plumbing
//!
//! Every endpoint operation funnels through the same sequence:
//!
//! 1. authorization gate (does this call need a bearer token, is one held)
//! 2. lifecycle gate (acquire the transport, opening implicitly if needed)
//! 3. dispatch (one HTTP request, bearer attached when held)
//!
//! The ordering is load-bearing: an unauthenticated call on an unopened
//! handle fails before any transport is allocated.

use std::fmt;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::bearer::BearerToken;
use crate::detail;
use crate::error::{Error, Result};
use crate::session::{SessionScope, SessionState, Transport};

/// Request timeout applied when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Tunables for a panel client handle.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request deadline, connect through body read. Applied to the
    /// transport when the session opens.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Whether an endpoint operation requires a held bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    /// No token needed. Only the authenticate operation qualifies.
    Public,
    /// A token from a previous authenticate call must be held.
    Bearer,
}

/// Handle to one panel, holding the session and bearer token.
///
/// Endpoint operations take `&mut self`, so one handle serves one caller
/// at a time; spin up one handle per concurrent caller. Dropping an
/// in-flight operation future aborts the request.
pub struct MarzbanClient {
    pub(crate) base_url: Url,
    pub(crate) config: ClientConfig,
    pub(crate) transport: Transport,
    pub(crate) token: Option<BearerToken>,
}

impl MarzbanClient {
    /// Handle with default configuration. The base URL must be absolute
    /// with an http or https scheme; a path prefix is kept and extended.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    pub fn with_config(base_url: impl AsRef<str>, config: ClientConfig) -> Result<Self> {
        let base_url = base_url.as_ref();
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid base url {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base url must start with http:// or https://, got: {base_url}"
            )));
        }
        if config.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than 0".into()));
        }
        Ok(Self {
            base_url: parsed,
            config,
            transport: Transport::Unopened,
            token: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.transport.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Open the session explicitly. Legal only on an unopened handle.
    pub fn open(&mut self) -> Result<()> {
        self.transport.open(|| build_transport(&self.config))
    }

    /// Close the session. Legal only while open; the handle is unusable
    /// afterwards.
    pub fn close(&mut self) -> Result<()> {
        self.transport.close()
    }

    /// Open the session and return a guard that closes it on drop.
    pub fn open_scope(&mut self) -> Result<SessionScope<'_>> {
        self.open()?;
        Ok(SessionScope { client: self })
    }

    /// The combined gate: authorization check, then lifecycle acquire.
    ///
    /// Returns the transport for one dispatch. Failing the authorization
    /// check leaves the lifecycle untouched, so no transport is allocated
    /// for a call that was never going to be sent.
    pub(crate) fn guard(&mut self, access: Access) -> Result<reqwest::Client> {
        if access == Access::Bearer && self.token.is_none() {
            return Err(Error::AuthenticationRequired);
        }
        self.transport.acquire(|| build_transport(&self.config))
    }

    /// Gate checks plus a request builder with the bearer attached.
    pub(crate) fn request(
        &mut self,
        access: Access,
        method: Method,
        url: Url,
    ) -> Result<RequestBuilder> {
        let http = self.guard(access)?;
        debug!(method = %method, path = url.path(), "dispatching request");
        let mut builder = http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose());
        }
        Ok(builder)
    }

    /// Endpoint URL from path segments, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::Config(format!(
                    "base url {} cannot carry path segments",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl fmt::Debug for MarzbanClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarzbanClient")
            .field("base_url", &self.base_url.as_str())
            .field("state", &self.state())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Allocate the HTTP transport for one session.
pub(crate) fn build_transport(config: &ClientConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(config.timeout)
        .build()?)
}

/// Pass a success response through; map anything else to the typed error
/// for its payload.
pub(crate) async fn ok_or_error(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<no body>"));
    Err(detail::classify(status, &body))
}

/// Decode a success body, reporting the decoder's complaint on mismatch.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| Error::MalformedResponse(e.to_string()))
}
