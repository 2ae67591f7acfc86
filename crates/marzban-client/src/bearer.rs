//! Redacting wrapper for the session bearer token

use std::fmt;

use zeroize::Zeroize;

/// Bearer token issued by the authenticate operation.
///
/// The raw value never appears in `Debug` or `Display` output, so handles
/// and errors can be logged without leaking credentials. The backing
/// string is zeroized on drop. Call [`BearerToken::expose`] at the one
/// place the value is actually sent.
pub struct BearerToken(String);

impl BearerToken {
    pub(crate) fn new(raw: String) -> Self {
        Self(raw)
    }

    /// Access the raw token for attaching to a request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for BearerToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
