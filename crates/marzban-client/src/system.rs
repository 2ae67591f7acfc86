//! Panel system statistics and inbound listings

use std::collections::HashMap;

use reqwest::Method;

use crate::client::{Access, MarzbanClient, ok_or_error, read_json};
use crate::error::Result;
use crate::model::{Inbound, SystemStats};

impl MarzbanClient {
    /// GET /api/system. Host and usage statistics for the panel.
    pub async fn system_stats(&mut self) -> Result<SystemStats> {
        let url = self.endpoint(&["api", "system"])?;
        let response = self.request(Access::Bearer, Method::GET, url)?.send().await?;
        read_json(ok_or_error(response).await?).await
    }

    /// GET /api/inbounds. Inbound listeners grouped by protocol, as the
    /// panel groups them.
    pub async fn list_inbounds(&mut self) -> Result<HashMap<String, Vec<Inbound>>> {
        let url = self.endpoint(&["api", "inbounds"])?;
        let response = self.request(Access::Bearer, Method::GET, url)?.send().await?;
        read_json(ok_or_error(response).await?).await
    }
}
