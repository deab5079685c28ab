//! Agent data: backend records, the display model, and the latest-agents query.
//!
//! - `types`: `ApiAgent` (backend shape), `Agent` (display model), `AgentsResponse`
//! - `mapper`: pure record mapping plus per-agent ABI enrichment
//! - `query`: `AgentsClient` and `get_latest_agents`

pub mod error;
pub mod mapper;
pub mod query;
pub mod types;

pub use error::FetchError;
pub use mapper::{classify_status, derive_symbol, map_api_agent};
pub use query::{get_latest_agents, AgentsClient};
pub use types::{Agent, AgentStatus, AgentType, AgentsResponse, ApiAgent};
