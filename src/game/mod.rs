pub mod achievements;
pub mod display;
pub mod reconcile;
pub mod state;
pub mod upgrades;

pub use achievements::AchievementId;
pub use reconcile::reconcile;
pub use state::GameState;
