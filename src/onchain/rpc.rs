//! Minimal Starknet JSON-RPC client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::abi::{parse_class_abi, Abi};
use super::{ClassProvider, RpcError};

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

pub struct StarknetRpc {
    http: reqwest::Client,
    node_url: String,
    next_id: AtomicU64,
}

impl StarknetRpc {
    pub fn new(node_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), node_url)
    }

    pub fn with_client(http: reqwest::Client, node_url: impl Into<String>) -> Self {
        Self {
            http,
            node_url: node_url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Send one JSON-RPC 2.0 request and return its `result`.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let resp = self.http.post(&self.node_url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RpcError::Status(status.as_u16()));
        }

        let decoded: RpcResponse = resp
            .json()
            .await
            .map_err(|e| RpcError::Malformed(e.to_string()))?;

        if let Some(err) = decoded.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        debug!(method = method, id = id, "rpc call ok");
        decoded
            .result
            .ok_or_else(|| RpcError::Malformed("response has neither result nor error".to_string()))
    }

    /// The contract class deployed at `contract_address`, at the latest block.
    pub async fn get_class_at(&self, contract_address: &str) -> Result<Value, RpcError> {
        self.call(
            "starknet_getClassAt",
            json!({
                "block_id": "latest",
                "contract_address": contract_address,
            }),
        )
        .await
    }
}

#[async_trait]
impl ClassProvider for StarknetRpc {
    async fn get_class_abi(&self, contract_address: &str) -> Result<Abi, RpcError> {
        let class = self.get_class_at(contract_address).await?;
        parse_class_abi(&class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};

    async fn fake_node(Json(req): Json<Value>) -> Json<Value> {
        assert_eq!(req["jsonrpc"], "2.0");
        assert_eq!(req["method"], "starknet_getClassAt");
        assert_eq!(req["params"]["block_id"], "latest");

        let id = req["id"].clone();
        match req["params"]["contract_address"].as_str() {
            Some("0x1") => Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "abi": "[{\"type\":\"function\",\"name\":\"mint\"}]" }
            })),
            Some("0x2") => Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": { "program": "..." }
            })),
            _ => Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": 20, "message": "Contract not found" }
            })),
        }
    }

    async fn spawn_node() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/", post(fake_node)))
                .await
                .unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_get_class_abi() {
        let rpc = StarknetRpc::new(spawn_node().await);

        let abi = rpc.get_class_abi("0x1").await.unwrap();
        assert_eq!(abi.len(), 1);
        assert_eq!(abi[0]["name"], "mint");

        assert!(matches!(
            rpc.get_class_abi("0x2").await,
            Err(RpcError::MissingAbi)
        ));

        match rpc.get_class_abi("0x3").await {
            Err(RpcError::Rpc { code, message }) => {
                assert_eq!(code, 20);
                assert_eq!(message, "Contract not found");
            }
            other => panic!("expected rpc error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_node_is_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let rpc = StarknetRpc::new(format!("http://{addr}/"));
        assert!(matches!(
            rpc.get_class_abi("0x1").await,
            Err(RpcError::Request(_))
        ));
    }
}
