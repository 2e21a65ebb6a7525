use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::achievements::AchievementId;

// ── Upgrade records ────────────────────────────────────────────────

/// Persisted state of the auto drone generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoDrone {
    pub level: u64,
    pub base_cost: f64,
    pub multiplier: f64,
}

pub const AUTO_DRONE_BASE_COST: f64 = 10.0;
pub const AUTO_DRONE_MULTIPLIER: f64 = 1.0;

impl Default for AutoDrone {
    fn default() -> Self {
        Self {
            level: 0,
            base_cost: AUTO_DRONE_BASE_COST,
            multiplier: AUTO_DRONE_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upgrades {
    pub auto_drone: AutoDrone,
}

// ── Achievements ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementFlag {
    pub unlocked: bool,
}

// ── Game state ─────────────────────────────────────────────────────

/// The whole game aggregate. Serialized wholesale on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub resources: f64,
    pub resources_per_second: f64,
    pub total_collected: f64,
    pub play_time: u64,
    pub total_clicks: u64,
    pub upgrades: Upgrades,
    /// Keyed by achievement id. Ids unknown to this build are carried along
    /// untouched so newer saves survive a round trip through an older client.
    pub achievements: BTreeMap<String, AchievementFlag>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            resources: 0.0,
            resources_per_second: 0.0,
            total_collected: 0.0,
            play_time: 0,
            total_clicks: 0,
            upgrades: Upgrades::default(),
            achievements: default_achievements(),
        }
    }
}

/// Every registered achievement, locked.
pub fn default_achievements() -> BTreeMap<String, AchievementFlag> {
    AchievementId::all()
        .iter()
        .map(|id| (id.as_str().to_string(), AchievementFlag::default()))
        .collect()
}

impl GameState {
    pub fn auto_drone(&self) -> &AutoDrone {
        &self.upgrades.auto_drone
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.achievements
            .get(id.as_str())
            .map(|flag| flag.unlocked)
            .unwrap_or(false)
    }

    /// Latch an achievement. Returns `true` only on the false → true edge.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        let flag = self.achievements.entry(id.as_str().to_string()).or_default();
        if flag.unlocked {
            return false;
        }
        flag.unlocked = true;
        true
    }

    /// Passive rate implied by the current upgrade level.
    pub fn derived_rate(&self) -> f64 {
        let drone = self.auto_drone();
        drone.level as f64 * drone.multiplier
    }
}
