//! Admin account operations
//!
//! Covers the authentication handshake plus the CRUD surface for
//! administrator accounts:
//! 1. Token issue (`authenticate`) - the one operation open to
//!    unauthenticated callers
//! 2. Reads: current admin, eager and lazy listings, exact lookup
//! 3. Mutations: create, update, delete, with an identity check on the
//!    echoed record

use reqwest::{Method, StatusCode};
use serde_json::value::RawValue;
use tracing::{info, warn};

use crate::bearer::BearerToken;
use crate::client::{Access, MarzbanClient, ok_or_error, read_json};
use crate::error::{Error, Result};
use crate::model::{AccessToken, Admin, AdminUpdate};

impl MarzbanClient {
    /// POST /api/admin/token. Exchange credentials for a bearer token.
    ///
    /// On success the token is held on the handle and attached to every
    /// subsequent request until the session closes. The panel answers bad
    /// credentials with HTTP 401, surfaced as `InvalidCredentials`; the
    /// held token (if any) is left untouched on failure.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<AccessToken> {
        let url = self.endpoint(&["api", "admin", "token"])?;
        let response = self
            .request(Access::Public, Method::POST, url)?
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::InvalidCredentials);
        }

        let token: AccessToken = read_json(ok_or_error(response).await?).await?;
        self.token = Some(BearerToken::new(token.access_token.clone()));
        info!(username, "authenticated");
        Ok(token)
    }

    /// GET /api/admin. The admin account the held token belongs to.
    pub async fn current_admin(&mut self) -> Result<Admin> {
        let url = self.endpoint(&["api", "admin"])?;
        let response = self.request(Access::Bearer, Method::GET, url)?.send().await?;
        read_json(ok_or_error(response).await?).await
    }

    /// POST /api/admin. Create an admin account.
    ///
    /// The returned record must echo the username that was sent; a
    /// mismatch means the server answered for a different entity and is
    /// reported instead of handing the caller the wrong record.
    pub async fn create_admin(&mut self, admin: &Admin) -> Result<Admin> {
        let url = self.endpoint(&["api", "admin"])?;
        let response = self
            .request(Access::Bearer, Method::POST, url)?
            .json(admin)
            .send()
            .await?;
        let created: Admin = read_json(ok_or_error(response).await?).await?;
        check_identity(&admin.username, &created.username)?;
        Ok(created)
    }

    /// PUT /api/admin/{username}. Update an existing admin account.
    pub async fn update_admin(&mut self, username: &str, update: &AdminUpdate) -> Result<Admin> {
        let url = self.endpoint(&["api", "admin", username])?;
        let response = self
            .request(Access::Bearer, Method::PUT, url)?
            .json(update)
            .send()
            .await?;
        let updated: Admin = read_json(ok_or_error(response).await?).await?;
        check_identity(username, &updated.username)?;
        Ok(updated)
    }

    /// DELETE /api/admin/{username}. Remove an admin account.
    ///
    /// Success bodies vary across panel versions, so any success status
    /// counts and the body is discarded.
    pub async fn delete_admin(&mut self, username: &str) -> Result<()> {
        let url = self.endpoint(&["api", "admin", username])?;
        let response = self
            .request(Access::Bearer, Method::DELETE, url)?
            .send()
            .await?;
        ok_or_error(response).await?;
        Ok(())
    }

    /// GET /api/admins. Every admin account, fully decoded.
    pub async fn list_admins(&mut self) -> Result<Vec<Admin>> {
        let url = self.endpoint(&["api", "admins"])?;
        let response = self.request(Access::Bearer, Method::GET, url)?.send().await?;
        read_json(ok_or_error(response).await?).await
    }

    /// GET /api/admins. The same listing, decoded one record per `next()`.
    ///
    /// The body is fetched in full (the panel sends one JSON array), but
    /// records stay as raw fragments until yielded; a fragment that fails
    /// to decode surfaces as an `Err` item without ending the iteration.
    /// Yields exactly what [`MarzbanClient::list_admins`] yields, in the
    /// same order. Restarting means issuing a new request.
    pub async fn iter_admins(&mut self) -> Result<AdminIter> {
        let url = self.endpoint(&["api", "admins"])?;
        let response = self.request(Access::Bearer, Method::GET, url)?.send().await?;
        let raw: Vec<Box<RawValue>> = read_json(ok_or_error(response).await?).await?;
        Ok(AdminIter {
            raw: raw.into_iter(),
        })
    }

    /// GET /api/admins?username={username}. One admin by exact username.
    ///
    /// The panel treats the parameter as a filter and may return near
    /// matches alongside the exact one, so the exact match is selected
    /// here; an absent exact match is `NotFound`.
    pub async fn get_admin(&mut self, username: &str) -> Result<Admin> {
        let mut url = self.endpoint(&["api", "admins"])?;
        url.query_pairs_mut().append_pair("username", username);
        let response = self.request(Access::Bearer, Method::GET, url)?.send().await?;
        let admins: Vec<Admin> = read_json(ok_or_error(response).await?).await?;
        admins
            .into_iter()
            .find(|a| a.username == username)
            .ok_or_else(|| Error::NotFound(format!("admin {username}")))
    }
}

/// Lazy admin listing returned by [`MarzbanClient::iter_admins`].
pub struct AdminIter {
    raw: std::vec::IntoIter<Box<RawValue>>,
}

impl Iterator for AdminIter {
    type Item = Result<Admin>;

    fn next(&mut self) -> Option<Self::Item> {
        let fragment = self.raw.next()?;
        Some(
            serde_json::from_str(fragment.get())
                .map_err(|e| Error::MalformedResponse(e.to_string())),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl ExactSizeIterator for AdminIter {}

/// Mutating admin operations must get back a record for the username they
/// sent; anything else is a server answering for the wrong entity.
fn check_identity(expected: &str, actual: &str) -> Result<()> {
    if expected != actual {
        warn!(expected, actual, "server echoed a different username");
        return Err(Error::ResponseIntegrity {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}
