use serde::{Deserialize, Serialize};

use super::state::GameState;

// ── Achievement identifiers ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementId {
    FirstClick,
    Collector100,
    Collector1000,
    TimePlayer,
    ExpertMiner,
}

impl AchievementId {
    /// Registry order, which is also evaluation and display order.
    pub fn all() -> &'static [AchievementId] {
        use AchievementId::*;
        &[FirstClick, Collector100, Collector1000, TimePlayer, ExpertMiner]
    }

    /// Key used in the persisted `achievements` map.
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementId::FirstClick => "firstClick",
            AchievementId::Collector100 => "collector100",
            AchievementId::Collector1000 => "collector1000",
            AchievementId::TimePlayer => "timePlayer",
            AchievementId::ExpertMiner => "expertMiner",
        }
    }

    pub fn from_key(key: &str) -> Option<AchievementId> {
        Self::all().iter().copied().find(|id| id.as_str() == key)
    }

    pub fn def(self) -> &'static AchievementDef {
        let idx = Self::all()
            .iter()
            .position(|id| *id == self)
            .unwrap_or_default();
        &all_achievements()[idx]
    }
}

// ── Achievement definition ──────────────────────────────────────────

pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub check: fn(&GameState) -> bool,
}

fn has_clicked(s: &GameState) -> bool {
    s.total_clicks >= 1
}

fn collected_100(s: &GameState) -> bool {
    s.total_collected >= 100.0
}

fn collected_1000(s: &GameState) -> bool {
    s.total_collected >= 1000.0
}

fn played_five_minutes(s: &GameState) -> bool {
    s.play_time >= 300
}

fn drone_level_5(s: &GameState) -> bool {
    s.upgrades.auto_drone.level >= 5
}

/// Returns the full catalogue of achievements, in `AchievementId::all()` order.
pub fn all_achievements() -> &'static [AchievementDef] {
    use AchievementId::*;

    static ACHIEVEMENTS: &[AchievementDef] = &[
        AchievementDef {
            id: FirstClick,
            name: "First Click!",
            description: "Mine your first energy",
            icon: "⛏️",
            check: has_clicked,
        },
        AchievementDef {
            id: Collector100,
            name: "Apprentice Miner",
            description: "Collect 100 energy",
            icon: "💰",
            check: collected_100,
        },
        AchievementDef {
            id: Collector1000,
            name: "Master Miner",
            description: "Collect 1,000 energy",
            icon: "💎",
            check: collected_1000,
        },
        AchievementDef {
            id: TimePlayer,
            name: "Dedicated Miner",
            description: "Play for 5 minutes",
            icon: "⏳",
            check: played_five_minutes,
        },
        AchievementDef {
            id: ExpertMiner,
            name: "Expert Miner",
            description: "Reach level 5 auto miner",
            icon: "🏅",
            check: drone_level_5,
        },
    ];

    ACHIEVEMENTS
}

// ── Evaluation ──────────────────────────────────────────────────────

/// Evaluates every locked achievement against `state`, latching those whose
/// predicate now holds. Returns the newly unlocked ids in registry order.
pub fn evaluate(state: &mut GameState) -> Vec<AchievementId> {
    let mut newly = Vec::new();
    for def in all_achievements() {
        if state.is_unlocked(def.id) {
            continue;
        }
        if (def.check)(state) && state.unlock(def.id) {
            newly.push(def.id);
        }
    }
    newly
}

/// Progress shown for a locked achievement. Binary: the bar is either empty
/// or full, driven by the same predicate that unlocks it.
pub fn progress_pct(state: &GameState, id: AchievementId) -> u8 {
    if (id.def().check)(state) {
        100
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_matches_id_order() {
        for (def, id) in all_achievements().iter().zip(AchievementId::all()) {
            assert_eq!(def.id, *id);
            assert_eq!(id.def().id, *id);
        }
        assert_eq!(all_achievements().len(), AchievementId::all().len());
    }

    #[test]
    fn keys_round_trip() {
        for id in AchievementId::all() {
            assert_eq!(AchievementId::from_key(id.as_str()), Some(*id));
        }
        assert_eq!(AchievementId::from_key("nope"), None);
    }

    #[test]
    fn fresh_state_unlocks_nothing() {
        let mut state = GameState::default();
        assert!(evaluate(&mut state).is_empty());
    }

    #[test]
    fn thresholds_are_inclusive() {
        let mut state = GameState::default();
        state.total_collected = 100.0;
        state.play_time = 300;
        state.upgrades.auto_drone.level = 5;

        let newly = evaluate(&mut state);
        assert_eq!(
            newly,
            vec![
                AchievementId::Collector100,
                AchievementId::TimePlayer,
                AchievementId::ExpertMiner
            ]
        );
        assert!(!state.is_unlocked(AchievementId::Collector1000));
        assert!(!state.is_unlocked(AchievementId::FirstClick));
    }

    #[test]
    fn unlocked_achievements_are_not_reported_twice() {
        let mut state = GameState::default();
        state.total_clicks = 1;
        assert_eq!(evaluate(&mut state), vec![AchievementId::FirstClick]);
        assert!(evaluate(&mut state).is_empty());
    }

    #[test]
    fn latch_survives_predicate_going_false() {
        let mut state = GameState::default();
        state.total_clicks = 1;
        evaluate(&mut state);
        state.total_clicks = 0;
        evaluate(&mut state);
        assert!(state.is_unlocked(AchievementId::FirstClick));
    }

    #[test]
    fn progress_is_binary() {
        let mut state = GameState::default();
        state.total_collected = 99.9;
        assert_eq!(progress_pct(&state, AchievementId::Collector100), 0);
        state.total_collected = 100.0;
        assert_eq!(progress_pct(&state, AchievementId::Collector100), 100);
    }
}
