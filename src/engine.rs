//! The game reducer. Owns the `GameState` for one session and applies every
//! mutation to it: clicks, purchases and the two periodic ticks.
//!
//! Each step re-evaluates achievements and reports whether the caller should
//! persist. The engine itself never does I/O.

use std::time::Duration;

use tracing::{debug, info};

use crate::game::achievements::{self, AchievementId};
use crate::game::state::GameState;
use crate::game::upgrades::{self, UpgradeId};

/// Passive income cadence.
pub const RESOURCE_TICK: Duration = Duration::from_millis(100);
/// Play time cadence.
pub const TIME_TICK: Duration = Duration::from_millis(1000);
/// Unconditional save cadence.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Resource ticks per second; converts the per-second rate to a per-tick gain.
const RESOURCE_TICKS_PER_SECOND: f64 = 10.0;

/// What a single engine step did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    /// Achievements latched during this step, in registry order.
    pub unlocked: Vec<AchievementId>,
    /// Price paid, when the step was a successful purchase.
    pub purchased: Option<u64>,
    /// The caller should save once after this step.
    pub save: bool,
}

pub struct Engine {
    state: GameState,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::from_state(GameState::default())
    }

    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Copy of the current state, taken at call time, for saving.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// Installs a freshly loaded state and evaluates achievements against it.
    pub fn load(&mut self, state: GameState) -> StepOutcome {
        self.state = state;
        info!(
            "State loaded: {:.0} energy, drone level {}, {}s played",
            self.state.resources,
            self.state.auto_drone().level,
            self.state.play_time
        );
        self.finish(StepOutcome::default())
    }

    /// Drops everything back to defaults.
    pub fn reset(&mut self) {
        self.state = GameState::default();
    }

    // ── User actions ─────────────────────────────────────────────────

    pub fn click(&mut self) -> StepOutcome {
        self.state.resources += 1.0;
        self.state.total_collected += 1.0;
        self.state.total_clicks = self.state.total_clicks.saturating_add(1);
        self.finish(StepOutcome {
            save: true,
            ..StepOutcome::default()
        })
    }

    /// Buys one auto drone level. Unaffordable purchases are silently ignored.
    pub fn buy_upgrade(&mut self) -> StepOutcome {
        let purchased = upgrades::purchase(&mut self.state);
        match purchased {
            Some(cost) => info!(
                "{} upgraded to level {} for {}",
                upgrades::get_upgrade(UpgradeId::AutoDrone).name,
                self.state.auto_drone().level,
                cost
            ),
            None => debug!(
                "Auto drone purchase ignored: need {}, have {:.2}",
                upgrades::next_cost(self.state.auto_drone()),
                self.state.resources
            ),
        }
        self.finish(StepOutcome {
            purchased,
            save: purchased.is_some(),
            ..StepOutcome::default()
        })
    }

    // ── Periodic ticks ───────────────────────────────────────────────

    /// One `RESOURCE_TICK` worth of passive income.
    pub fn resource_tick(&mut self) -> StepOutcome {
        let gain = self.state.resources_per_second / RESOURCE_TICKS_PER_SECOND;
        self.state.resources += gain;
        self.state.total_collected += gain;
        self.finish(StepOutcome::default())
    }

    /// One second of play time.
    pub fn time_tick(&mut self) -> StepOutcome {
        self.state.play_time = self.state.play_time.saturating_add(1);
        self.finish(StepOutcome::default())
    }

    /// Next upgrade price for the current level.
    pub fn upgrade_cost(&self) -> u64 {
        upgrades::next_cost(self.state.auto_drone())
    }

    fn finish(&mut self, mut outcome: StepOutcome) -> StepOutcome {
        outcome.unlocked = achievements::evaluate(&mut self.state);
        for id in &outcome.unlocked {
            info!("Achievement unlocked: {}", id.def().name);
        }
        // Click + unlock in one step still costs a single save.
        outcome.save |= !outcome.unlocked.is_empty();
        outcome
    }
}
