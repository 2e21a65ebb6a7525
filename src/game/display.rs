use std::fmt;

use super::achievements::{all_achievements, progress_pct};
use super::state::GameState;
use super::upgrades::next_cost;

/// Whole units shown to the player. Storage keeps the fraction.
pub fn whole(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

/// `HH:MM:SS`, each field at least two digits. Hours are not capped.
pub fn format_play_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// One-line summary of the session, used by the headless client.
pub struct StatusLine<'a>(pub &'a GameState);

impl fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        let drone = state.auto_drone();
        write!(
            f,
            "energy {} ({}/sec) | total {} | drone lv {} (next {}) | played {}",
            whole(state.resources),
            whole(state.resources_per_second),
            whole(state.total_collected),
            drone.level,
            next_cost(drone),
            format_play_time(state.play_time),
        )
    }
}

/// Multi-line achievement listing: unlocked ones marked, locked ones with
/// their progress bar value.
pub struct AchievementList<'a>(pub &'a GameState);

impl fmt::Display for AchievementList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        for def in all_achievements() {
            if state.is_unlocked(def.id) {
                writeln!(f, "{} {} [unlocked] {}", def.icon, def.name, def.description)?;
            } else {
                writeln!(
                    f,
                    "{} {} [{}%] {}",
                    def.icon,
                    def.name,
                    progress_pct(state, def.id),
                    def.description
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::achievements::AchievementId;

    #[test]
    fn play_time_is_zero_padded() {
        assert_eq!(format_play_time(0), "00:00:00");
        assert_eq!(format_play_time(59), "00:00:59");
        assert_eq!(format_play_time(61), "00:01:01");
        assert_eq!(format_play_time(3600), "01:00:00");
    }

    #[test]
    fn hours_grow_past_two_digits() {
        assert_eq!(format_play_time(100 * 3600 + 5), "100:00:05");
    }

    #[test]
    fn whole_floors_for_display_only() {
        assert_eq!(whole(12.99), 12);
        assert_eq!(whole(0.4), 0);
        assert_eq!(whole(f64::NAN), 0);
    }

    #[test]
    fn status_line_floors_fractions() {
        let mut state = GameState::default();
        state.resources = 5.7;
        state.total_collected = 105.2;
        state.play_time = 75;
        let line = StatusLine(&state).to_string();
        assert_eq!(
            line,
            "energy 5 (0/sec) | total 105 | drone lv 0 (next 10) | played 00:01:15"
        );
    }

    #[test]
    fn achievement_list_marks_unlocked_entries() {
        let mut state = GameState::default();
        state.unlock(AchievementId::FirstClick);
        state.total_collected = 150.0;
        let text = AchievementList(&state).to_string();
        assert!(text.contains("First Click! [unlocked]"));
        assert!(text.contains("Apprentice Miner [100%]"));
        assert!(text.contains("Master Miner [0%]"));
    }
}
