use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{TransportError, TransportResult};
use crate::game::state::GameState;
use crate::protocol::SaveResponse;

/// HTTP side of the client: the load/save contract against the service.
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct SaveClient {
    http: reqwest::Client,
    base_url: String,
}

impl SaveClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> TransportResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/load`. Returns the raw document; callers reconcile it.
    pub async fn load(&self) -> TransportResult<Value> {
        let url = format!("{}/api/load", self.base_url);
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// `POST /api/save` with the full state.
    pub async fn save(&self, state: &GameState) -> TransportResult<SaveResponse> {
        let url = format!("{}/api/save", self.base_url);
        debug!("POST {}", url);
        let response = self.http.post(&url).json(state).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> TransportResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status { status, body })
}
