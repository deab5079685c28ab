//! Backend API records and the display model they are mapped into.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::onchain::Abi;

// ─── Backend API records ────────────────────────────────────────────────────

/// One agent as returned under `data.agents` by the backend.
///
/// Relation fields keep the backend's PascalCase names. Every numeric field
/// tolerates null, strings and missing keys and decodes to 0 in those cases.
/// Optional text fields and relations that carry the wrong JSON type decode
/// to `None`, so one odd record never fails the whole batch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAgent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub curve_side: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub degen_score: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub win_score: f64,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub profile_picture: Option<String>,
    #[serde(default, rename = "Token", deserialize_with = "lenient_record")]
    pub token: Option<ApiToken>,
    #[serde(default, rename = "Wallet", deserialize_with = "lenient_record")]
    pub wallet: Option<ApiWallet>,
    #[serde(default, rename = "LatestMarketData", deserialize_with = "lenient_record")]
    pub latest_market_data: Option<ApiMarketData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiToken {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub contract_address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWallet {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub deployed_address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMarketData {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub holders: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub market_cap: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pnl_cycle: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pnl_24h: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub trade_count: u64,
    #[serde(default, rename = "balanceInUSD", deserialize_with = "lenient_f64")]
    pub balance_in_usd: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub pnl_rank: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub fork_count: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_change_24h: f64,
}

// ─── Display model ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Leftcurve,
    Rightcurve,
}

impl AgentType {
    /// Backend `curveSide`: only `LEFT` maps to leftcurve.
    pub fn from_curve_side(curve_side: Option<&str>) -> Self {
        match curve_side {
            Some("LEFT") => Self::Leftcurve,
            _ => Self::Rightcurve,
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leftcurve => f.pad("leftcurve"),
            Self::Rightcurve => f.pad("rightcurve"),
        }
    }
}

impl std::str::FromStr for AgentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "leftcurve" | "left" => Ok(Self::Leftcurve),
            "rightcurve" | "right" => Ok(Self::Rightcurve),
            other => Err(format!("unknown curve side: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Bonding,
    Live,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bonding => f.pad("bonding"),
            Self::Live => f.pad("live"),
        }
    }
}

/// An agent as shown on the dashboard. Built fresh on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub status: AgentStatus,
    pub price: f64,
    pub market_cap: f64,
    pub holders: u64,
    pub creator: String,
    pub created_at: String,
    pub creativity_index: f64,
    pub performance_index: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    pub contract_address: String,
    #[serde(default)]
    pub abi: Abi,
    pub pnl_cycle: f64,
    pub pnl_24h: f64,
    pub trade_count: u64,
    pub tvl: f64,
    pub cycle_ranking: u64,
    pub forker_count: u64,
    pub price_change_24h: f64,
}

impl Agent {
    pub fn created_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|t| t.with_timezone(&chrono::Utc))
    }
}

// ─── Response envelope ──────────────────────────────────────────────────────

/// `{success: true, data: [...]}` or `{success: false, error: "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Agent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentsResponse {
    pub fn ok(data: Vec<Agent>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<Vec<Agent>, String> {
        match (self.success, self.data, self.error) {
            (true, data, _) => Ok(data.unwrap_or_default()),
            (false, _, error) => {
                Err(error.unwrap_or_else(|| "An unexpected error occurred".to_string()))
            }
        }
    }
}

// ─── Lenient decoding ───────────────────────────────────────────────────────

fn finite_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(finite_number).unwrap_or(0.0))
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(finite_number)
        .map(|f| if f <= 0.0 { 0 } else { f as u64 })
        .unwrap_or(0))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(Value::is_object)
        .and_then(|v| serde_json::from_value(v).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_agent_decodes_backend_shape() {
        let agent: ApiAgent = serde_json::from_value(json!({
            "id": "a1",
            "name": "Degen Ape",
            "curveSide": "LEFT",
            "status": "RUNNING",
            "createdAt": "2025-01-02T03:04:05.000Z",
            "degenScore": 87.5,
            "winScore": null,
            "Token": { "contractAddress": "abc" },
            "Wallet": { "deployedAddress": "def" },
            "LatestMarketData": {
                "price": "0.25",
                "holders": 12,
                "balanceInUSD": 1500.5,
                "pnlRank": 3,
                "forkCount": null
            }
        }))
        .unwrap();

        assert_eq!(agent.curve_side.as_deref(), Some("LEFT"));
        assert_eq!(agent.degen_score, 87.5);
        assert_eq!(agent.win_score, 0.0);
        let market = agent.latest_market_data.unwrap();
        assert_eq!(market.price, 0.25);
        assert_eq!(market.holders, 12);
        assert_eq!(market.balance_in_usd, 1500.5);
        assert_eq!(market.pnl_rank, 3);
        assert_eq!(market.fork_count, 0);
        assert_eq!(market.pnl_24h, 0.0);
    }

    #[test]
    fn test_numeric_id_becomes_string() {
        let agent: ApiAgent = serde_json::from_value(json!({ "id": 42, "name": "X" })).unwrap();
        assert_eq!(agent.id, "42");
        assert!(agent.latest_market_data.is_none());
    }

    #[test]
    fn test_garbage_numbers_default_to_zero() {
        let market: ApiMarketData = serde_json::from_value(json!({
            "price": "not a number",
            "holders": -4,
            "marketCap": {"nested": true},
            "tradeCount": 7.9
        }))
        .unwrap();
        assert_eq!(market.price, 0.0);
        assert_eq!(market.holders, 0);
        assert_eq!(market.market_cap, 0.0);
        assert_eq!(market.trade_count, 7);
    }

    #[test]
    fn test_wrongly_typed_text_fields_become_none() {
        let agents: Vec<ApiAgent> = serde_json::from_value(json!([
            { "id": "ok", "curveSide": "LEFT", "status": "RUNNING" },
            {
                "id": "odd",
                "curveSide": 0,
                "status": 1,
                "profilePicture": false,
                "Token": { "contractAddress": 123 },
                "Wallet": { "deployedAddress": ["x"] },
                "LatestMarketData": "n/a"
            },
            { "id": "no-token", "Token": "0xabc" }
        ]))
        .unwrap();

        assert_eq!(agents.len(), 3);
        assert_eq!(agents[0].status.as_deref(), Some("RUNNING"));
        let odd = &agents[1];
        assert!(odd.curve_side.is_none());
        assert!(odd.status.is_none());
        assert!(odd.profile_picture.is_none());
        assert!(odd.token.as_ref().unwrap().contract_address.is_none());
        assert!(odd.wallet.as_ref().unwrap().deployed_address.is_none());
        assert!(odd.latest_market_data.is_none());
        assert!(agents[2].token.is_none());
    }

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_value(AgentsResponse::ok(vec![])).unwrap();
        assert_eq!(ok, json!({ "success": true, "data": [] }));

        let err = serde_json::to_value(AgentsResponse::err("boom")).unwrap();
        assert_eq!(err, json!({ "success": false, "error": "boom" }));
        assert_eq!(AgentsResponse::err("boom").into_result(), Err("boom".to_string()));
    }

    #[test]
    fn test_agent_type_parsing() {
        assert_eq!(AgentType::from_curve_side(Some("LEFT")), AgentType::Leftcurve);
        assert_eq!(AgentType::from_curve_side(Some("RIGHT")), AgentType::Rightcurve);
        assert_eq!(AgentType::from_curve_side(Some("left")), AgentType::Rightcurve);
        assert_eq!(AgentType::from_curve_side(None), AgentType::Rightcurve);
        assert_eq!("left".parse::<AgentType>(), Ok(AgentType::Leftcurve));
        assert!("middle".parse::<AgentType>().is_err());
    }
}
