//! Top-agent leaderboards.
//!
//! Two boards side by side: leftcurve agents ranked by creativity
//! ("DEGEN KINGS") and rightcurve agents ranked by performance
//! ("SIGMA LORDS"). Each board scrolls as an endless marquee once it has
//! enough entries; leftcurve scrolls up, rightcurve down.

use serde::Serialize;

use crate::agents::{Agent, AgentType};

/// Agents kept per board.
pub const BOARD_SIZE: usize = 5;

/// Boards shorter than this are shown statically.
const MARQUEE_MIN_ENTRIES: usize = 3;
const MARQUEE_COPIES: usize = 3;
const CROWN_EVERY: usize = 5;

pub fn board_title(side: AgentType) -> &'static str {
    match side {
        AgentType::Leftcurve => "DEGEN KINGS",
        AgentType::Rightcurve => "SIGMA LORDS",
    }
}

pub fn board_subtitle(side: AgentType) -> &'static str {
    match side {
        AgentType::Leftcurve => "yolo masters farming midcurver rekt posts",
        AgentType::Rightcurve => "gigabrain quants making midcurvers ngmi",
    }
}

/// Ranking score for a side: creativity for leftcurve, performance for rightcurve.
pub fn score(agent: &Agent, side: AgentType) -> f64 {
    match side {
        AgentType::Leftcurve => agent.creativity_index,
        AgentType::Rightcurve => agent.performance_index,
    }
}

/// 24h PnL as displayed: `pnl24h`, or the 24h price change when that is 0.
pub fn displayed_pnl_24h(agent: &Agent) -> f64 {
    if agent.pnl_24h != 0.0 {
        agent.pnl_24h
    } else {
        agent.price_change_24h
    }
}

/// Fractional PnL as a signed percentage: `0.125` → `"+12.5%"`.
pub fn format_pnl(value: Option<f64>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(v) if !v.is_finite() => "N/A".to_string(),
        Some(v) if v > 0.0 => format!("+{:.1}%", v * 100.0),
        Some(v) => format!("{:.1}%", v * 100.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based.
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub score: f64,
    pub trade_count: u64,
    pub pnl_cycle: f64,
    pub pnl_24h: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl LeaderboardEntry {
    fn new(rank: usize, agent: &Agent, side: AgentType) -> Self {
        Self {
            rank,
            id: agent.id.clone(),
            name: agent.name.clone(),
            symbol: agent.symbol.clone(),
            score: score(agent, side),
            trade_count: agent.trade_count,
            pnl_cycle: agent.pnl_cycle,
            pnl_24h: displayed_pnl_24h(agent),
            profile_picture_url: agent.profile_picture_url.clone(),
        }
    }

    pub fn pnl_cycle_label(&self) -> String {
        format_pnl(Some(self.pnl_cycle))
    }

    pub fn pnl_24h_label(&self) -> String {
        format_pnl(Some(self.pnl_24h))
    }
}

/// One row of the marquee. `index` runs over the looped sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarqueeItem<'a> {
    pub index: usize,
    pub entry: &'a LeaderboardEntry,
    pub crowned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub side: AgentType,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn for_side(agents: &[Agent], side: AgentType) -> Self {
        Self::with_size(agents, side, BOARD_SIZE)
    }

    /// Agents of `side`, best score first, at most `size`. Ties keep input order.
    pub fn with_size(agents: &[Agent], side: AgentType, size: usize) -> Self {
        let mut ranked: Vec<&Agent> = agents.iter().filter(|a| a.agent_type == side).collect();
        ranked.sort_by(|a, b| score(b, side).total_cmp(&score(a, side)));

        let entries = ranked
            .into_iter()
            .take(size)
            .enumerate()
            .map(|(i, agent)| LeaderboardEntry::new(i + 1, agent, side))
            .collect();

        Self {
            side,
            title: board_title(side),
            subtitle: board_subtitle(side),
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scrolls(&self) -> bool {
        self.entries.len() >= MARQUEE_MIN_ENTRIES
    }

    /// The entries repeated three times when the board scrolls, else as is.
    pub fn marquee(&self) -> Vec<MarqueeItem<'_>> {
        let copies = if self.scrolls() { MARQUEE_COPIES } else { 1 };
        self.entries
            .iter()
            .cycle()
            .take(self.entries.len() * copies)
            .enumerate()
            .map(|(index, entry)| MarqueeItem {
                index,
                entry,
                crowned: index % CROWN_EVERY == 0,
            })
            .collect()
    }

    /// Pixels per tick, signed by direction. `None` when the board is static.
    /// Fewer entries scroll slower, capped at 1.
    pub fn scroll_step(&self) -> Option<f64> {
        if !self.scrolls() {
            return None;
        }
        let speed = (self.entries.len() as f64 / BOARD_SIZE as f64).min(1.0);
        Some(match self.side {
            AgentType::Leftcurve => -speed,
            AgentType::Rightcurve => speed,
        })
    }
}

/// Advance a marquee whose content is `content_height` tall (three copies).
/// Leaving the middle copy snaps back to its start.
pub fn next_scroll_offset(offset: f64, content_height: f64, step: f64) -> f64 {
    let copy_height = content_height / MARQUEE_COPIES as f64;
    if offset >= copy_height * 2.0 || offset <= 0.0 {
        copy_height
    } else {
        offset + step
    }
}

/// Both boards, built from the same agent list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopAgents {
    pub leftcurve: Leaderboard,
    pub rightcurve: Leaderboard,
}

impl TopAgents {
    pub fn build(agents: &[Agent], size: usize) -> Self {
        Self {
            leftcurve: Leaderboard::with_size(agents, AgentType::Leftcurve, size),
            rightcurve: Leaderboard::with_size(agents, AgentType::Rightcurve, size),
        }
    }

    pub fn boards(&self) -> [&Leaderboard; 2] {
        [&self.leftcurve, &self.rightcurve]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{map_api_agent, ApiAgent};
    use crate::bonding::BondingCurveParams;

    fn agent(id: &str, side: AgentType, creativity: f64, performance: f64) -> Agent {
        let api = ApiAgent {
            id: id.to_string(),
            name: id.to_string(),
            ..Default::default()
        };
        let mut agent = map_api_agent(&api, &BondingCurveParams::default());
        agent.agent_type = side;
        agent.creativity_index = creativity;
        agent.performance_index = performance;
        agent
    }

    fn ids(board: &Leaderboard) -> Vec<&str> {
        board.entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_leftcurve_ranks_by_creativity() {
        let agents = vec![
            agent("l1", AgentType::Leftcurve, 10.0, 99.0),
            agent("r1", AgentType::Rightcurve, 100.0, 1.0),
            agent("l2", AgentType::Leftcurve, 30.0, 0.0),
            agent("l3", AgentType::Leftcurve, 20.0, 50.0),
        ];
        let board = Leaderboard::for_side(&agents, AgentType::Leftcurve);
        assert_eq!(ids(&board), ["l2", "l3", "l1"]);
        assert_eq!(board.title, "DEGEN KINGS");
        assert_eq!(board.entries[0].rank, 1);
        assert_eq!(board.entries[0].score, 30.0);
    }

    #[test]
    fn test_rightcurve_ranks_by_performance_and_truncates() {
        let agents: Vec<Agent> = (0..8)
            .map(|i| agent(&format!("r{i}"), AgentType::Rightcurve, 0.0, i as f64))
            .collect();
        let board = Leaderboard::for_side(&agents, AgentType::Rightcurve);
        assert_eq!(ids(&board), ["r7", "r6", "r5", "r4", "r3"]);
        assert_eq!(board.subtitle, "gigabrain quants making midcurvers ngmi");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let agents = vec![
            agent("a", AgentType::Leftcurve, 5.0, 0.0),
            agent("b", AgentType::Leftcurve, 5.0, 0.0),
            agent("c", AgentType::Leftcurve, 7.0, 0.0),
        ];
        let board = Leaderboard::for_side(&agents, AgentType::Leftcurve);
        assert_eq!(ids(&board), ["c", "a", "b"]);
    }

    #[test]
    fn test_marquee_loops_from_three_entries() {
        let two = vec![
            agent("a", AgentType::Leftcurve, 2.0, 0.0),
            agent("b", AgentType::Leftcurve, 1.0, 0.0),
        ];
        let board = Leaderboard::for_side(&two, AgentType::Leftcurve);
        assert_eq!(board.marquee().len(), 2);
        assert_eq!(board.scroll_step(), None);

        let mut three = two.clone();
        three.push(agent("c", AgentType::Leftcurve, 0.0, 0.0));
        let board = Leaderboard::for_side(&three, AgentType::Leftcurve);
        let marquee = board.marquee();
        assert_eq!(marquee.len(), 9);
        let looped: Vec<&str> = marquee.iter().map(|m| m.entry.id.as_str()).collect();
        assert_eq!(looped, ["a", "b", "c", "a", "b", "c", "a", "b", "c"]);
        let crowned: Vec<usize> = marquee.iter().filter(|m| m.crowned).map(|m| m.index).collect();
        assert_eq!(crowned, [0, 5]);
    }

    #[test]
    fn test_scroll_direction_and_speed() {
        let left: Vec<Agent> = (0..3)
            .map(|i| agent(&format!("l{i}"), AgentType::Leftcurve, i as f64, 0.0))
            .collect();
        let step = Leaderboard::for_side(&left, AgentType::Leftcurve).scroll_step().unwrap();
        assert!((step + 0.6).abs() < 1e-9);

        let right: Vec<Agent> = (0..7)
            .map(|i| agent(&format!("r{i}"), AgentType::Rightcurve, 0.0, i as f64))
            .collect();
        let step = Leaderboard::for_side(&right, AgentType::Rightcurve).scroll_step().unwrap();
        assert_eq!(step, 1.0);
    }

    #[test]
    fn test_next_scroll_offset_wraps_to_middle_copy() {
        assert_eq!(next_scroll_offset(0.0, 300.0, 1.0), 100.0);
        assert_eq!(next_scroll_offset(200.0, 300.0, 1.0), 100.0);
        assert_eq!(next_scroll_offset(150.0, 300.0, 1.0), 151.0);
        assert!((next_scroll_offset(150.0, 300.0, -0.6) - 149.4).abs() < 1e-9);
    }

    #[test]
    fn test_format_pnl() {
        assert_eq!(format_pnl(None), "N/A");
        assert_eq!(format_pnl(Some(0.125)), "+12.5%");
        assert_eq!(format_pnl(Some(-0.031)), "-3.1%");
        assert_eq!(format_pnl(Some(0.0)), "0.0%");
        assert_eq!(format_pnl(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn test_pnl_24h_falls_back_to_price_change() {
        let mut a = agent("a", AgentType::Leftcurve, 0.0, 0.0);
        a.price_change_24h = 0.2;
        assert_eq!(displayed_pnl_24h(&a), 0.2);
        a.pnl_24h = -0.1;
        assert_eq!(displayed_pnl_24h(&a), -0.1);

        let board = Leaderboard::for_side(&[a], AgentType::Leftcurve);
        assert_eq!(board.entries[0].pnl_24h_label(), "-10.0%");
        assert_eq!(board.entries[0].pnl_cycle_label(), "0.0%");
    }

    #[test]
    fn test_top_agents_splits_sides() {
        let agents = vec![
            agent("l", AgentType::Leftcurve, 1.0, 0.0),
            agent("r", AgentType::Rightcurve, 0.0, 1.0),
        ];
        let top = TopAgents::build(&agents, BOARD_SIZE);
        assert_eq!(ids(&top.leftcurve), ["l"]);
        assert_eq!(ids(&top.rightcurve), ["r"]);
        assert_eq!(top.boards()[1].title, "SIGMA LORDS");
    }
}
