use serde::{Deserialize, Serialize};

use super::state::{AutoDrone, GameState};

// ── Upgrade identifiers ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeId {
    AutoDrone,
}

// ── Upgrade definition ──────────────────────────────────────────────

pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    /// Each purchased level multiplies the price by this factor.
    pub cost_growth: f64,
}

/// Returns the full catalogue of upgrades.
pub fn all_upgrades() -> &'static [UpgradeDef] {
    static UPGRADES: &[UpgradeDef] = &[UpgradeDef {
        id: UpgradeId::AutoDrone,
        name: "Auto Drone",
        description: "Mines energy automatically every second",
        cost_growth: 1.5,
    }];

    UPGRADES
}

/// Looks up a single upgrade definition by id.
pub fn get_upgrade(id: UpgradeId) -> &'static UpgradeDef {
    match id {
        UpgradeId::AutoDrone => &all_upgrades()[0],
    }
}

// ── Pricing ─────────────────────────────────────────────────────────

/// Price of the next level: `floor(base_cost * growth^level)`.
pub fn next_cost(drone: &AutoDrone) -> u64 {
    let growth = get_upgrade(UpgradeId::AutoDrone).cost_growth;
    let exponent = i32::try_from(drone.level).unwrap_or(i32::MAX);
    let raw = drone.base_cost * growth.powi(exponent);
    if raw.is_finite() {
        raw.floor() as u64
    } else {
        u64::MAX
    }
}

/// Returns `true` if the player can afford the next auto drone level.
pub fn can_purchase(state: &GameState) -> bool {
    state.resources >= next_cost(state.auto_drone()) as f64
}

/// Buys one auto drone level if affordable and returns the price paid.
///
/// An unaffordable purchase changes nothing and returns `None`; callers
/// gate the action with the same cost check, so there is nothing to report.
pub fn purchase(state: &mut GameState) -> Option<u64> {
    let cost = next_cost(state.auto_drone());
    if state.resources < cost as f64 {
        return None;
    }
    state.resources -= cost as f64;
    state.upgrades.auto_drone.level = state.upgrades.auto_drone.level.saturating_add(1);
    state.resources_per_second = state.derived_rate();
    Some(cost)
}
