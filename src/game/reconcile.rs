//! Completes a loaded document into a full `GameState`.
//!
//! Documents come from disk or the network and may be partial, older than
//! the current schema, or partly garbage. Every known field is taken from
//! the document when it is present, non-null and well typed; otherwise the
//! default fills in. An explicit `0` or `false` counts as present.

use serde_json::{Map, Value};
use tracing::warn;

use super::state::{AchievementFlag, AutoDrone, GameState};

/// Reconciles `doc` against the built-in defaults.
pub fn reconcile(doc: &Value) -> GameState {
    reconcile_with(doc, &GameState::default())
}

/// Reconciles `doc` against explicit `defaults`.
pub fn reconcile_with(doc: &Value, defaults: &GameState) -> GameState {
    let Some(obj) = doc.as_object() else {
        if !doc.is_null() {
            warn!("Saved document is not a JSON object; using defaults");
        }
        return defaults.clone();
    };

    let auto_drone = merge_auto_drone(
        obj.get("upgrades")
            .and_then(Value::as_object)
            .and_then(|u| u.get("autoDrone")),
        &defaults.upgrades.auto_drone,
    );

    let mut state = GameState {
        resources: real(obj, "resources").unwrap_or(defaults.resources),
        resources_per_second: defaults.resources_per_second,
        total_collected: real(obj, "totalCollected").unwrap_or(defaults.total_collected),
        play_time: count(obj, "playTime").unwrap_or(defaults.play_time),
        total_clicks: count(obj, "totalClicks").unwrap_or(defaults.total_clicks),
        upgrades: defaults.upgrades.clone(),
        achievements: defaults.achievements.clone(),
    };
    state.upgrades.auto_drone = auto_drone;

    // Older documents carry a level but no rate; derive it so the drones
    // keep mining until the next purchase recomputes it anyway.
    state.resources_per_second = match real(obj, "resourcesPerSecond") {
        Some(rate) => rate,
        None if obj.contains_key("upgrades") => state.derived_rate(),
        None => defaults.resources_per_second,
    };

    if let Some(loaded) = obj.get("achievements").and_then(Value::as_object) {
        for (key, entry) in loaded {
            let flag = entry
                .as_object()
                .and_then(|e| e.get("unlocked"))
                .and_then(Value::as_bool);
            if let Some(unlocked) = flag {
                state
                    .achievements
                    .insert(key.clone(), AchievementFlag { unlocked });
            }
        }
    }

    state
}

fn merge_auto_drone(loaded: Option<&Value>, defaults: &AutoDrone) -> AutoDrone {
    let Some(obj) = loaded.and_then(Value::as_object) else {
        return defaults.clone();
    };
    AutoDrone {
        level: count(obj, "level").unwrap_or(defaults.level),
        base_cost: positive(obj, "baseCost").unwrap_or(defaults.base_cost),
        multiplier: real(obj, "multiplier").unwrap_or(defaults.multiplier),
    }
}

/// A finite, non-negative number under `key`.
fn real(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = obj.get(key)?;
    if value.is_null() {
        return None;
    }
    match value.as_f64() {
        Some(n) if n.is_finite() && n >= 0.0 => Some(n),
        _ => {
            warn!("Ignoring invalid value for {}: {}", key, value);
            None
        }
    }
}

/// A strictly positive number under `key`.
fn positive(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match real(obj, key) {
        Some(n) if n >= f64::EPSILON => Some(n),
        Some(n) => {
            warn!("Ignoring non-positive value for {}: {}", key, n);
            None
        }
        None => None,
    }
}

/// A non-negative whole number under `key`. Fractional values are floored.
fn count(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    let value = obj.get(key)?;
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    real(obj, key).map(|n| n.floor() as u64)
}
