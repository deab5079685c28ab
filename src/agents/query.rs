//! Latest-agents query against the backend REST API.
//!
//! Flow: health check → `/api/eliza-agent/latest` (falling back once to
//! `/api/eliza-agent` on 404) → validate `data.agents` → map every record
//! concurrently, each fetching its own contract ABI.

use futures::future::join_all;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::bonding::BondingCurveParams;
use crate::config::{BackendConfig, Config};
use crate::onchain::{ClassProvider, StarknetRpc};

use super::error::FetchError;
use super::mapper::enrich_with_abi;
use super::types::{Agent, AgentsResponse, ApiAgent};

const HEALTH_PATH: &str = "/api/docs";
const LATEST_PATH: &str = "/api/eliza-agent/latest";
const MAIN_PATH: &str = "/api/eliza-agent";
const API_KEY_HEADER: &str = "x-api-key";
const DEFAULT_FAILURE: &str = "Failed to fetch latest agents";

/// Backend client plus everything needed to turn its records into `Agent`s.
#[derive(Clone)]
pub struct AgentsClient {
    http: reqwest::Client,
    backend: BackendConfig,
    provider: Arc<dyn ClassProvider>,
    bonding: BondingCurveParams,
}

impl AgentsClient {
    pub fn new(
        backend: BackendConfig,
        provider: Arc<dyn ClassProvider>,
        bonding: BondingCurveParams,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            backend,
            provider,
            bonding,
        }
    }

    /// Backend from `[backend]`, ABIs from the configured Starknet node.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.backend.clone(),
            Arc::new(StarknetRpc::new(config.starknet.node_url.clone())),
            config.bonding,
        )
    }

    pub fn bonding_params(&self) -> &BondingCurveParams {
        &self.bonding
    }

    /// Fetch, validate and map the latest agents.
    pub async fn fetch_latest_agents(&self) -> Result<Vec<Agent>, FetchError> {
        if self.backend.api_url.trim().is_empty() || self.backend.api_key.is_empty() {
            return Err(FetchError::MissingConfig);
        }
        let base = self.backend.api_url.trim().trim_end_matches('/');

        self.health_check(base).await?;
        let payload = self.fetch_payload(base).await?;
        let records = extract_agents(payload)?;

        info!(count = records.len(), "mapping agents");
        let agents = join_all(
            records
                .iter()
                .map(|record| enrich_with_abi(record, self.provider.as_ref(), &self.bonding)),
        )
        .await;

        let with_abi = agents.iter().filter(|a| !a.abi.is_empty()).count();
        info!(agents = agents.len(), with_abi = with_abi, "latest agents ready");
        Ok(agents)
    }

    /// `fetch_latest_agents` folded into the `{success, data | error}` envelope.
    pub async fn get_latest_agents(&self) -> AgentsResponse {
        match self.fetch_latest_agents().await {
            Ok(agents) => AgentsResponse::ok(agents),
            Err(e) => {
                error!(
                    error = %e,
                    source = ?std::error::Error::source(&e).map(|s| s.to_string()),
                    "error fetching latest agents"
                );
                AgentsResponse::err(e.to_string())
            }
        }
    }

    async fn health_check(&self, base: &str) -> Result<(), FetchError> {
        let url = format!("{base}{HEALTH_PATH}");
        match self.http.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(url = %url, "backend health check ok");
                Ok(())
            }
            Ok(resp) => {
                let status = resp.status();
                error!(
                    status = status.as_u16(),
                    reason = status.canonical_reason().unwrap_or(""),
                    "backend server not responding"
                );
                Err(FetchError::BackendUnavailable {
                    status: status.as_u16(),
                })
            }
            Err(e) => {
                error!(url = %url, error = %e, "backend server health check failed");
                Err(FetchError::BackendUnreachable(e))
            }
        }
    }

    async fn request_agents(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let resp = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, self.backend.api_key.as_str())
            .send()
            .await?;
        debug!(url = %url, status = resp.status().as_u16(), "agents request");
        Ok(resp)
    }

    async fn fetch_payload(&self, base: &str) -> Result<Value, FetchError> {
        let resp = self.request_agents(&format!("{base}{LATEST_PATH}")).await?;
        let status = resp.status();
        if status.is_success() {
            return decode_json(resp).await;
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
            StatusCode::NOT_FOUND => {
                warn!("latest endpoint not available, trying main endpoint");
                let fallback = self.request_agents(&format!("{base}{MAIN_PATH}")).await?;
                let fallback_status = fallback.status();
                if !fallback_status.is_success() {
                    return Err(FetchError::FallbackFailed {
                        status: fallback_status.as_u16(),
                    });
                }
                decode_json(fallback).await
            }
            s if s.is_server_error() => Err(FetchError::Server { status: s.as_u16() }),
            s => {
                let body = resp.text().await.unwrap_or_default();
                Err(FetchError::Rejected {
                    status: s.as_u16(),
                    message: error_message(&body),
                })
            }
        }
    }
}

/// Build a client from the environment and run the query once.
pub async fn get_latest_agents() -> AgentsResponse {
    AgentsClient::from_config(&Config::from_env())
        .get_latest_agents()
        .await
}

async fn decode_json(resp: reqwest::Response) -> Result<Value, FetchError> {
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// The body's `message` field, or the generic failure text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_FAILURE.to_string())
}

/// `data.agents` as typed records, or `InvalidShape` if it is not a list.
fn extract_agents(mut payload: Value) -> Result<Vec<ApiAgent>, FetchError> {
    if !matches!(payload.pointer("/data/agents"), Some(Value::Array(_))) {
        let preview: String = payload.to_string().chars().take(200).collect();
        error!(payload = %preview, "unexpected API response structure");
        return Err(FetchError::InvalidShape);
    }

    let agents = payload
        .pointer_mut("/data/agents")
        .map(Value::take)
        .unwrap_or_default();
    Ok(serde_json::from_value(agents)?)
}
