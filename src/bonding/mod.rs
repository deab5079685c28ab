//! Bonding curve model.
//!
//! An agent token starts in its bonding phase and unlocks trading once the
//! liquidity raised on the curve reaches the target. Liquidity is measured in
//! LEFT as `holders × price × liquidity_multiplier`.
//!
//! - `BondingCurveParams`: the bonding-phase heuristic used by the agent mapper
//! - `BondingSnapshot`: raw curve state (price in wei, holders, progress in bps)
//! - `BondingProgress`: everything the progress chart derives from a snapshot

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::agents::{Agent, AgentStatus};

/// Progress is tracked in basis points; 10_000 means fully bonded.
pub const FULL_PROGRESS_BPS: u32 = 10_000;

/// Remaining liquidity at or below which the launch is "near".
const NEAR_LAUNCH_REMAINING: f64 = 1_000.0;

// Same bps thresholds as the launch banner.
const HIGHLIGHT_BPS: u32 = 9_000;
const IMMINENT_BPS: u32 = 9_800;

/// The target price shown next to the current one.
const TARGET_PRICE_MULTIPLIER: f64 = 1.1;

const WEI_PER_ETH: u64 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondingCurveParams {
    /// Liquidity (LEFT) required to leave the bonding phase.
    #[serde(default = "default_liquidity_target")]
    pub liquidity_target: f64,
    /// LEFT raised per holder per unit of price.
    #[serde(default = "default_liquidity_multiplier")]
    pub liquidity_multiplier: f64,
}

fn default_liquidity_target() -> f64 {
    10_000.0
}
fn default_liquidity_multiplier() -> f64 {
    1_000.0
}

impl Default for BondingCurveParams {
    fn default() -> Self {
        Self {
            liquidity_target: default_liquidity_target(),
            liquidity_multiplier: default_liquidity_multiplier(),
        }
    }
}

impl BondingCurveParams {
    pub fn liquidity(&self, price: f64, holders: u64) -> f64 {
        let liquidity = holders as f64 * price * self.liquidity_multiplier;
        if liquidity.is_finite() {
            liquidity
        } else {
            0.0
        }
    }

    /// True while the raised liquidity is still below the target.
    pub fn is_in_bonding_phase(&self, price: f64, holders: u64) -> bool {
        self.liquidity(price, holders) < self.liquidity_target
    }

    /// Liquidity expressed as basis points of the target, clamped to 0..=10_000.
    pub fn progress_bps(&self, price: f64, holders: u64) -> u32 {
        if self.liquidity_target <= 0.0 {
            return FULL_PROGRESS_BPS;
        }
        let ratio = self.liquidity(price, holders) / self.liquidity_target;
        (ratio * FULL_PROGRESS_BPS as f64).clamp(0.0, FULL_PROGRESS_BPS as f64) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BondingStatus {
    Bonding,
    Live,
}

/// Raw bonding curve state for one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondingSnapshot {
    /// Current price in wei. Accepts a decimal string or a JSON number;
    /// amounts beyond `u64` only stay exact as strings.
    #[serde(deserialize_with = "wei_amount")]
    pub current_price: Decimal,
    pub holders: u64,
    /// Basis points, 0..=10_000.
    pub progress: u32,
    pub bonding_status: BondingStatus,
}

impl BondingSnapshot {
    pub fn from_agent(agent: &Agent, params: &BondingCurveParams) -> Self {
        let bonding_status = match agent.status {
            AgentStatus::Bonding => BondingStatus::Bonding,
            AgentStatus::Live => BondingStatus::Live,
        };
        let progress = match bonding_status {
            BondingStatus::Live => FULL_PROGRESS_BPS,
            BondingStatus::Bonding => params.progress_bps(agent.price, agent.holders),
        };
        Self {
            current_price: Decimal::from_f64(agent.price).unwrap_or_default(),
            holders: agent.holders,
            progress,
            bonding_status,
        }
    }
}

/// Liquidity status line under the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "remaining", rename_all = "snake_case")]
pub enum LiquidityState {
    Live,
    NearLaunch(f64),
    Locked(f64),
}

impl LiquidityState {
    pub fn message(&self) -> String {
        match self {
            Self::Live => "Trading Now Live!".to_string(),
            Self::NearLaunch(remaining) => {
                format!("Only {} LEFT until launch!", format_grouped(*remaining))
            }
            Self::Locked(remaining) => {
                format!("{} LEFT needed to unlock trading", format_grouped(*remaining))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchBanner {
    Approaching,
    SequenceInitiated,
}

impl LaunchBanner {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Approaching => "Launch approaching!",
            Self::SequenceInitiated => "Launch sequence initiated!",
        }
    }
}

/// Everything the progress chart shows for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondingProgress {
    pub snapshot: BondingSnapshot,
    pub progress_percent: f64,
    pub liquidity: f64,
    pub liquidity_target: f64,
    pub remaining_liquidity: f64,
    pub current_price_eth: f64,
    pub target_price_eth: f64,
    pub liquidity_state: LiquidityState,
    pub launch_banner: Option<LaunchBanner>,
}

impl BondingProgress {
    pub fn new(snapshot: BondingSnapshot, params: &BondingCurveParams) -> Self {
        let price = snapshot.current_price.to_f64().unwrap_or(0.0);
        let liquidity = params.liquidity(price, snapshot.holders);
        let remaining_liquidity = params.liquidity_target - liquidity;
        let current_price_eth = snapshot
            .current_price
            .checked_div(Decimal::from(WEI_PER_ETH))
            .and_then(|eth| eth.to_f64())
            .unwrap_or(0.0);

        let liquidity_state = match snapshot.bonding_status {
            BondingStatus::Live => LiquidityState::Live,
            BondingStatus::Bonding if remaining_liquidity <= NEAR_LAUNCH_REMAINING => {
                LiquidityState::NearLaunch(remaining_liquidity)
            }
            BondingStatus::Bonding => LiquidityState::Locked(remaining_liquidity),
        };

        let launch_banner = match snapshot.progress {
            p if p >= IMMINENT_BPS && p < FULL_PROGRESS_BPS => Some(LaunchBanner::SequenceInitiated),
            p if p >= HIGHLIGHT_BPS && p < FULL_PROGRESS_BPS => Some(LaunchBanner::Approaching),
            _ => None,
        };

        Self {
            progress_percent: snapshot.progress as f64 / 100.0,
            liquidity,
            liquidity_target: params.liquidity_target,
            remaining_liquidity,
            current_price_eth,
            target_price_eth: current_price_eth * TARGET_PRICE_MULTIPLIER,
            liquidity_state,
            launch_banner,
            snapshot,
        }
    }

    pub fn from_agent(agent: &Agent, params: &BondingCurveParams) -> Self {
        Self::new(BondingSnapshot::from_agent(agent, params), params)
    }

    pub fn is_bonding(&self) -> bool {
        self.snapshot.bonding_status == BondingStatus::Bonding
    }

    pub fn is_highlighted(&self) -> bool {
        self.snapshot.progress >= HIGHLIGHT_BPS
    }

    pub fn is_imminent(&self) -> bool {
        self.snapshot.progress >= IMMINENT_BPS
    }

    /// "42.5%"
    pub fn progress_label(&self) -> String {
        format!("{:.1}%", self.progress_percent)
    }

    /// "1,234 / 10,000 LEFT"
    pub fn liquidity_label(&self) -> String {
        format!(
            "{} / {} LEFT",
            format_grouped(self.liquidity),
            format_grouped(self.liquidity_target)
        )
    }
}

fn wei_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let amount = match &value {
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        Value::Number(n) => match (n.as_u64(), n.as_i64()) {
            (Some(u), _) => Some(Decimal::from(u)),
            (None, Some(i)) => Some(Decimal::from(i)),
            _ => n.as_f64().and_then(Decimal::from_f64),
        },
        _ => None,
    };
    amount.ok_or_else(|| serde::de::Error::custom(format!("invalid wei amount: {value}")))
}

/// Thousands-grouped number with at most three fraction digits.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
