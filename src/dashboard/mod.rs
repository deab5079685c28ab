//! Axum-based JSON API for the agent dashboard.
//!
//! Provides:
//!   GET /api/health               → {"status": "ok"}
//!   GET /api/agents               → {success, data | error} envelope
//!   GET /api/leaderboard          → both leaderboards and their marquees
//!   GET /api/leaderboard/:side/scroll?offset=&height=
//!                                 → next marquee offset for one board
//!   GET /api/agents/:id/bonding   → bonding progress for one agent
//!
//! Every request re-fetches from the backend; nothing is cached here.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::agents::{AgentType, AgentsClient, AgentsResponse, FetchError};
use crate::bonding::BondingProgress;
use crate::leaderboard::{next_scroll_offset, Leaderboard, TopAgents};

/// Shared state for the dashboard routes.
#[derive(Clone)]
pub struct DashboardState {
    pub client: Arc<AgentsClient>,
    pub board_size: usize,
}

/// Build the Axum router.
pub fn build_router(state: DashboardState) -> Router {
    Router::new()
        .route("/api/health", get(api_health))
        .route("/api/agents", get(api_agents))
        .route("/api/leaderboard", get(api_leaderboard))
        .route("/api/leaderboard/:side/scroll", get(api_scroll))
        .route("/api/agents/:id/bonding", get(api_bonding))
        .with_state(state)
}

/// Start the dashboard server.
pub async fn serve(state: DashboardState, bind_addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = bind_addr, "dashboard listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn upstream_failure(e: FetchError) -> Response {
    warn!(error = %e, "upstream fetch failed");
    (StatusCode::BAD_GATEWAY, Json(AgentsResponse::err(e.to_string()))).into_response()
}

// --- API Handlers ---

async fn api_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn api_agents(State(state): State<DashboardState>) -> impl IntoResponse {
    let response = state.client.get_latest_agents().await;
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(response))
}

async fn api_leaderboard(State(state): State<DashboardState>) -> Response {
    match state.client.fetch_latest_agents().await {
        Ok(agents) => {
            let top = TopAgents::build(&agents, state.board_size);
            Json(json!({
                "generatedAt": chrono::Utc::now().to_rfc3339(),
                "scrollStep": {
                    "leftcurve": top.leftcurve.scroll_step(),
                    "rightcurve": top.rightcurve.scroll_step(),
                },
                "marquee": {
                    "leftcurve": top.leftcurve.marquee(),
                    "rightcurve": top.rightcurve.marquee(),
                },
                "leftcurve": top.leftcurve,
                "rightcurve": top.rightcurve,
            }))
            .into_response()
        }
        Err(e) => upstream_failure(e),
    }
}

#[derive(Debug, Deserialize)]
struct ScrollQuery {
    offset: f64,
    height: f64,
}

async fn api_scroll(
    State(state): State<DashboardState>,
    Path(side): Path<String>,
    Query(query): Query<ScrollQuery>,
) -> Response {
    let side = match side.parse::<AgentType>() {
        Ok(side) => side,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(AgentsResponse::err(e))).into_response(),
    };
    let agents = match state.client.fetch_latest_agents().await {
        Ok(agents) => agents,
        Err(e) => return upstream_failure(e),
    };

    let board = Leaderboard::with_size(&agents, side, state.board_size);
    let step = board.scroll_step();
    let offset = match step {
        Some(step) => next_scroll_offset(query.offset, query.height, step),
        None => query.offset,
    };
    Json(json!({
        "side": side,
        "step": step,
        "offset": offset,
    }))
    .into_response()
}

async fn api_bonding(State(state): State<DashboardState>, Path(id): Path<String>) -> Response {
    let agents = match state.client.fetch_latest_agents().await {
        Ok(agents) => agents,
        Err(e) => return upstream_failure(e),
    };

    let Some(agent) = agents.iter().find(|a| a.id == id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(AgentsResponse::err(format!("agent {id} not found"))),
        )
            .into_response();
    };

    let progress = BondingProgress::from_agent(agent, state.client.bonding_params());
    Json(json!({
        "agentId": agent.id,
        "type": agent.agent_type,
        "progressLabel": progress.progress_label(),
        "liquidityLabel": progress.liquidity_label(),
        "liquidityMessage": progress.liquidity_state.message(),
        "launchMessage": progress.launch_banner.map(|b| b.message()),
        "highlighted": progress.is_highlighted(),
        "imminent": progress.is_imminent(),
        "progress": progress,
    }))
    .into_response()
}
