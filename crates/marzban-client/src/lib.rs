//! Typed client for the Marzban panel API
//!
//! Wraps the panel's control-plane HTTP API in a session-aware handle:
//! admin authentication and CRUD, subscription payloads and account info,
//! system statistics and inbound listings.
//!
//! Call flow:
//! 1. Construct a [`MarzbanClient`] from the panel base URL
//! 2. `authenticate()` once; the bearer token is held on the handle and
//!    attached to every later request
//! 3. Call endpoint operations; the session opens implicitly on first use
//!    (or explicitly via `open()` / `open_scope()`)
//! 4. `close()` when done; a closed handle rejects every further call
//!
//! Every endpoint call passes the same gate: authorization check first,
//! then lifecycle, then dispatch. An unauthenticated call therefore fails
//! before any connection is made. Dropping an in-flight operation future
//! cancels the request.
//!
//! ```no_run
//! use marzban_client::{ClientType, MarzbanClient};
//!
//! # async fn run() -> marzban_client::Result<()> {
//! let mut client = MarzbanClient::new("https://panel.example.com")?;
//! client.authenticate("root", "secret").await?;
//!
//! let stats = client.system_stats().await?;
//! println!("{} active users", stats.users_active);
//!
//! let sub = client.fetch_subscription("abc123", ClientType::Clash).await?;
//! println!("{}", sub.payload);
//!
//! client.close()?;
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod bearer;
pub mod client;
pub mod detail;
pub mod error;
pub mod model;
pub mod session;
pub mod subscription;
pub mod system;

pub use admin::AdminIter;
pub use bearer::BearerToken;
pub use client::{ClientConfig, DEFAULT_TIMEOUT, MarzbanClient};
pub use error::{Error, Result};
pub use model::{
    AccessToken, Admin, AdminUpdate, ClientType, Inbound, LimitStrategy, Proxy, Status,
    Subscription, SubscriptionInfo, SystemStats,
};
pub use session::{SessionScope, SessionState};
