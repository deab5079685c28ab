//! `ApiAgent` → `Agent`.
//!
//! `map_api_agent` is pure and leaves the ABI empty; `enrich_with_abi` does the
//! one network call per agent.

use tracing::{debug, error};

use crate::bonding::BondingCurveParams;
use crate::onchain::{normalize_address, ClassProvider};

use super::types::{Agent, AgentStatus, AgentType, ApiAgent, ApiMarketData};

const RUNNING: &str = "RUNNING";
const PROFILE_PICTURE_PREFIX: &str = "/uploads/profile-pictures/";
const UNKNOWN_CREATOR: &str = "unknown";
const ZERO_ADDRESS: &str = "0x0";

/// Ticker shown next to the name: the first four characters, uppercased.
pub fn derive_symbol(name: &str) -> String {
    name.chars().take(4).collect::<String>().to_uppercase()
}

/// Bonding unless the backend reports the agent running *and* the curve has
/// already raised its target liquidity.
pub fn classify_status(
    backend_status: Option<&str>,
    price: f64,
    holders: u64,
    params: &BondingCurveParams,
) -> AgentStatus {
    if backend_status != Some(RUNNING) || params.is_in_bonding_phase(price, holders) {
        AgentStatus::Bonding
    } else {
        AgentStatus::Live
    }
}

/// Normalized token contract address, if the backend knows one.
pub fn token_address(api: &ApiAgent) -> Option<String> {
    api.token
        .as_ref()
        .and_then(|t| t.contract_address.as_deref())
        .and_then(normalize_address)
}

pub fn map_api_agent(api: &ApiAgent, params: &BondingCurveParams) -> Agent {
    let market = api.latest_market_data.clone().unwrap_or_default();
    let ApiMarketData {
        price,
        holders,
        market_cap,
        pnl_cycle,
        pnl_24h,
        trade_count,
        balance_in_usd,
        pnl_rank,
        fork_count,
        price_change_24h,
    } = market;

    let profile_picture = api
        .profile_picture
        .as_ref()
        .filter(|p| !p.is_empty())
        .cloned();

    let creator = api
        .wallet
        .as_ref()
        .and_then(|w| w.deployed_address.as_deref())
        .and_then(normalize_address)
        .unwrap_or_else(|| UNKNOWN_CREATOR.to_string());

    Agent {
        id: api.id.clone(),
        name: api.name.clone(),
        symbol: derive_symbol(&api.name),
        agent_type: AgentType::from_curve_side(api.curve_side.as_deref()),
        status: classify_status(api.status.as_deref(), price, holders, params),
        price,
        market_cap,
        holders,
        creator,
        created_at: api.created_at.clone(),
        creativity_index: api.degen_score,
        performance_index: api.win_score,
        profile_picture_url: profile_picture
            .as_ref()
            .map(|p| format!("{PROFILE_PICTURE_PREFIX}{p}")),
        profile_picture,
        contract_address: token_address(api).unwrap_or_else(|| ZERO_ADDRESS.to_string()),
        abi: Vec::new(),
        pnl_cycle,
        pnl_24h,
        trade_count,
        tvl: balance_in_usd,
        cycle_ranking: pnl_rank,
        forker_count: fork_count,
        price_change_24h,
    }
}

/// Map one agent and fetch its contract ABI. A failed lookup is logged and
/// the agent is returned with an empty ABI.
pub async fn enrich_with_abi(
    api: &ApiAgent,
    provider: &dyn ClassProvider,
    params: &BondingCurveParams,
) -> Agent {
    let mut agent = map_api_agent(api, params);

    let Some(address) = token_address(api) else {
        return agent;
    };

    match provider.get_class_abi(&address).await {
        Ok(abi) => {
            debug!(agent_id = %agent.id, address = %address, entries = abi.len(), "fetched contract ABI");
            agent.abi = abi;
        }
        Err(e) => {
            error!(agent_id = %agent.id, address = %address, error = %e, "error fetching ABI for agent");
        }
    }

    agent
}
