//! Subscription payload and account info operations

use reqwest::Method;

use crate::client::{Access, MarzbanClient, ok_or_error, read_json};
use crate::error::Result;
use crate::model::{ClientType, Subscription, SubscriptionInfo};

impl MarzbanClient {
    /// GET /sub/{token}/{client_type}. Fetch a subscription payload in the
    /// format the given client application consumes.
    ///
    /// The body is opaque to this library (YAML for clash, base64 link
    /// lists for v2ray, and so on) and is returned as text together with
    /// the path it was fetched from.
    pub async fn fetch_subscription(
        &mut self,
        token: &str,
        client_type: ClientType,
    ) -> Result<Subscription> {
        let url = self.endpoint(&["sub", token, client_type.as_str()])?;
        let path = url.path().to_string();
        let response = self.request(Access::Bearer, Method::GET, url)?.send().await?;
        let payload = ok_or_error(response).await?.text().await?;
        Ok(Subscription {
            token: token.to_string(),
            client_type,
            path,
            payload,
        })
    }

    /// GET /sub/{token}/info. Account details behind a subscription token.
    pub async fn subscription_info(&mut self, token: &str) -> Result<SubscriptionInfo> {
        let url = self.endpoint(&["sub", token, "info"])?;
        let response = self.request(Access::Bearer, Method::GET, url)?.send().await?;
        read_json(ok_or_error(response).await?).await
    }
}
