//! leftcurve: agent dashboard data from the terminal.
//!
//! Usage:
//!   leftcurve agents               # latest agents with status and ABI size
//!   leftcurve leaderboard          # DEGEN KINGS / SIGMA LORDS
//!   leftcurve leaderboard --marquee  # the looped sequence, crowned rows starred
//!   leftcurve bonding <AGENT_ID>   # bonding curve progress for one agent
//!   leftcurve serve                # JSON API on dashboard.bind

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use leftcurve::agents::{Agent, AgentType, AgentsClient};
use leftcurve::bonding::BondingProgress;
use leftcurve::config::Config;
use leftcurve::dashboard::{self, DashboardState};
use leftcurve::leaderboard::{Leaderboard, TopAgents};
use leftcurve::logging;
use leftcurve::onchain::AbiSummary;

const DEFAULT_CONFIG: &str = "leftcurve.toml";

#[derive(Parser, Debug)]
#[command(name = "leftcurve", version, about = "Agent dashboard data: fetch, rank, bonding progress")]
struct Cli {
    /// Config file (defaults to ./leftcurve.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the latest agents
    Agents {
        /// Print the raw {success, data | error} envelope
        #[arg(long)]
        json: bool,
    },
    /// Show the leftcurve and rightcurve leaderboards
    Leaderboard {
        /// Only one side: left | right
        #[arg(long)]
        side: Option<AgentType>,
        /// Print the looped marquee sequence instead of one pass
        #[arg(long)]
        marquee: bool,
    },
    /// Bonding curve progress for one agent
    Bonding { id: String },
    /// Serve the JSON API
    Serve {
        /// Overrides dashboard.bind
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.logging);
    info!("leftcurve v{} starting", env!("CARGO_PKG_VERSION"));

    let client = AgentsClient::from_config(&config);

    match cli.command {
        Command::Agents { json } => {
            let response = client.get_latest_agents().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }
            match response.into_result() {
                Ok(agents) => display_agents(&agents),
                Err(e) => bail!(e),
            }
        }
        Command::Leaderboard { side, marquee } => {
            let agents = client.fetch_latest_agents().await?;
            let top = TopAgents::build(&agents, config.leaderboard.size);
            for board in top.boards() {
                if side.map_or(true, |s| s == board.side) {
                    display_board(board, marquee);
                }
            }
        }
        Command::Bonding { id } => {
            let agents = client.fetch_latest_agents().await?;
            let Some(agent) = agents.iter().find(|a| a.id == id) else {
                bail!("agent {id} not found in latest agents");
            };
            display_bonding(agent, &BondingProgress::from_agent(agent, client.bonding_params()));
        }
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.dashboard.bind.clone());
            let state = DashboardState {
                client: Arc::new(client),
                board_size: config.leaderboard.size,
            };
            dashboard::serve(state, &bind).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Ok(Config::load(p)?),
        None if Path::new(DEFAULT_CONFIG).exists() => Ok(Config::load(Path::new(DEFAULT_CONFIG))?),
        None => Ok(Config::from_env()),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

fn age(agent: &Agent) -> String {
    match agent.created_at_utc() {
        Some(created) => {
            let diff = Utc::now() - created;
            if diff.num_hours() < 24 {
                format!("{}h", diff.num_hours().max(0))
            } else {
                format!("{}d", diff.num_days())
            }
        }
        None => "???".to_string(),
    }
}

fn display_agents(agents: &[Agent]) {
    if agents.is_empty() {
        println!("No agents returned.");
        return;
    }

    println!();
    println!(
        " {:<3} | {:<20} | {:<6} | {:<10} | {:<7} | {:>12} | {:>7} | {:>5} | {:<9} | Contract",
        "#", "Name", "Symbol", "Type", "Status", "Price", "Holders", "Age", "ABI"
    );
    println!("{}", "-".repeat(120));

    for (i, a) in agents.iter().enumerate() {
        println!(
            " {:<3} | {:<20} | {:<6} | {:<10} | {:<7} | {:>12.6} | {:>7} | {:>5} | {:<9} | {}",
            i + 1,
            truncate(&a.name, 20),
            a.symbol,
            a.agent_type,
            a.status,
            a.price,
            a.holders,
            age(a),
            AbiSummary::of(&a.abi).to_string(),
            truncate(&a.contract_address, 20),
        );
    }
    println!();
}

fn display_board(board: &Leaderboard, looped: bool) {
    println!();
    println!("=== {} ===", board.title);
    println!("    {}", board.subtitle);
    println!();

    if board.is_empty() {
        println!("  (no {} agents)", board.side);
        return;
    }

    let items = board.marquee();
    let shown = if looped { items.len() } else { board.entries.len() };
    for item in items.iter().take(shown) {
        let entry = item.entry;
        let crown = if item.crowned { "*" } else { " " };
        println!(
            " {}{:<2} {:<20} ${:<5} {:>6} trades | score {:>7.1} | PnL (Cycle): {:>7} | PnL (24h): {:>7}",
            crown,
            entry.rank,
            truncate(&entry.name, 20),
            entry.symbol,
            entry.trade_count,
            entry.score,
            entry.pnl_cycle_label(),
            entry.pnl_24h_label(),
        );
    }
}

fn display_bonding(agent: &Agent, progress: &BondingProgress) {
    const BAR_WIDTH: usize = 40;
    let filled = ((progress.progress_percent / 100.0) * BAR_WIDTH as f64)
        .round()
        .clamp(0.0, BAR_WIDTH as f64) as usize;

    println!();
    println!("Bonding Progress: {} (${}, {})", agent.name, agent.symbol, agent.agent_type);
    println!(
        "  [{}{}] {}",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        progress.progress_label()
    );
    println!(
        "  Current Price: {:.14}   Target Price: {:.14}",
        progress.current_price_eth, progress.target_price_eth
    );
    println!(
        "  Liquidity Status ({}): {}",
        if progress.is_bonding() { "locked" } else { "unlocked" },
        progress.liquidity_label()
    );
    println!("  {}", progress.liquidity_state.message());
    if let Some(banner) = progress.launch_banner {
        println!("  {}", banner.message());
    }
    println!();
}
