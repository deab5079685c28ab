//! Data layer for the leftcurve agent dashboard.
//!
//! Fetches agents from the backend API, enriches them with their token
//! contract ABI from a Starknet node, and derives the leaderboard and
//! bonding-curve views shown on the dashboard.

pub mod agents;
pub mod bonding;
pub mod config;
pub mod dashboard;
pub mod leaderboard;
pub mod logging;
pub mod onchain;
