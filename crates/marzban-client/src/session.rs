//! Connection lifecycle for a panel client handle
//!
//! The session moves through a linear lifecycle:
//!
//! 1. `Unopened` - handle constructed, no transport allocated
//! 2. `Open` - transport allocated, endpoint calls proceed
//! 3. `Closed` - transport released, every further call is rejected
//!
//! `Closed` is terminal; a handle is never reopened. The HTTP client lives
//! inside the `Open` variant, so "transport exists" and "session is open"
//! are the same fact and cannot drift apart.

use std::fmt;
use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::client::MarzbanClient;
use crate::error::{Error, Result};

/// Externally observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Open,
    Closed,
}

impl SessionState {
    /// Lowercase label used in errors and logs.
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Unopened => "unopened",
            SessionState::Open => "open",
            SessionState::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Session storage for a client handle.
pub(crate) enum Transport {
    Unopened,
    Open(reqwest::Client),
    Closed,
}

impl Transport {
    pub(crate) fn state(&self) -> SessionState {
        match self {
            Transport::Unopened => SessionState::Unopened,
            Transport::Open(_) => SessionState::Open,
            Transport::Closed => SessionState::Closed,
        }
    }

    /// Explicit open. Legal only from `Unopened`.
    pub(crate) fn open(
        &mut self,
        make: impl FnOnce() -> Result<reqwest::Client>,
    ) -> Result<()> {
        match self {
            Transport::Unopened => {
                *self = Transport::Open(make()?);
                debug!(state = %SessionState::Open, "session opened");
                Ok(())
            }
            Transport::Open(_) => Err(Error::InvalidLifecycleTransition {
                from: SessionState::Open,
                reason: "cannot reopen the connection while it is open",
            }),
            Transport::Closed => Err(Error::InvalidLifecycleTransition {
                from: SessionState::Closed,
                reason: "cannot reopen the connection once it is closed",
            }),
        }
    }

    /// Explicit close. Legal only from `Open`; releases the HTTP client.
    pub(crate) fn close(&mut self) -> Result<()> {
        match self {
            Transport::Open(_) => {
                *self = Transport::Closed;
                debug!(state = %SessionState::Closed, "session closed");
                Ok(())
            }
            Transport::Unopened => Err(Error::InvalidLifecycleTransition {
                from: SessionState::Unopened,
                reason: "cannot close a connection that was never opened",
            }),
            Transport::Closed => Err(Error::InvalidLifecycleTransition {
                from: SessionState::Closed,
                reason: "cannot close the connection twice",
            }),
        }
    }

    /// Transport for one endpoint call.
    ///
    /// Opens implicitly from `Unopened` (allocating the HTTP client exactly
    /// once), hands out a cheap clone while `Open`, and rejects the call
    /// with `ConnectionClosed` after close, before any I/O happens. If the
    /// transport cannot be built the state stays `Unopened`.
    pub(crate) fn acquire(
        &mut self,
        make: impl FnOnce() -> Result<reqwest::Client>,
    ) -> Result<reqwest::Client> {
        match self {
            Transport::Unopened => {
                let client = make()?;
                *self = Transport::Open(client.clone());
                debug!(state = %SessionState::Open, "session opened implicitly");
                Ok(client)
            }
            Transport::Open(client) => Ok(client.clone()),
            Transport::Closed => Err(Error::ConnectionClosed),
        }
    }
}

/// RAII guard returned by [`MarzbanClient::open_scope`].
///
/// Opens the session on entry and closes it when dropped, unless the
/// caller already closed it through the guard. Derefs to the client, so
/// endpoint calls read the same as on a bare handle.
#[derive(Debug)]
pub struct SessionScope<'a> {
    pub(crate) client: &'a mut MarzbanClient,
}

impl Deref for SessionScope<'_> {
    type Target = MarzbanClient;

    fn deref(&self) -> &Self::Target {
        self.client
    }
}

impl DerefMut for SessionScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.client
    }
}

impl Drop for SessionScope<'_> {
    fn drop(&mut self) {
        if self.client.transport.state() == SessionState::Open {
            let _ = self.client.transport.close();
        }
    }
}
