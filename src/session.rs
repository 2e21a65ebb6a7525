//! Client runtime. One cooperative loop drives the engine: the three
//! periodic timers and user commands never overlap, so the state needs no
//! locking. Saves run as detached tasks on a snapshot taken at call time.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::engine::{Engine, StepOutcome, RESOURCE_TICK, TIME_TICK};
use crate::game::display::{AchievementList, StatusLine};
use crate::game::reconcile;
use crate::game::state::GameState;
use crate::network::SaveClient;
use crate::notify::{Notification, Notifier};

/// User input fed into the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Click,
    Buy,
    Save,
    Status,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Command> {
        match input.trim().to_ascii_lowercase().as_str() {
            "c" | "click" | "" => Some(Command::Click),
            "b" | "buy" => Some(Command::Buy),
            "s" | "save" => Some(Command::Save),
            "?" | "status" => Some(Command::Status),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

pub struct Session {
    engine: Engine,
    client: SaveClient,
    config: ClientConfig,
    notifier: Notifier,
    notices_tx: mpsc::UnboundedSender<Notification>,
    notices_rx: mpsc::UnboundedReceiver<Notification>,
}

impl Session {
    pub fn new(client: SaveClient, config: ClientConfig) -> Self {
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();
        Self {
            engine: Engine::new(),
            client,
            config,
            notifier: Notifier::default(),
            notices_tx,
            notices_rx,
        }
    }

    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    /// The notification currently on screen, if any.
    pub fn notification(&self) -> Option<&Notification> {
        self.notifier.visible(Instant::now())
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Loads from the service. On any transport failure the session starts
    /// over from defaults rather than a half-merged state.
    pub async fn load(&mut self) {
        match self.client.load().await {
            Ok(doc) => {
                let outcome = self.engine.load(reconcile(&doc));
                self.apply(outcome);
                self.notify(Notification::success("Game loaded"));
            }
            Err(e) => {
                warn!("Load failed: {}", e);
                self.engine.reset();
                self.notify(Notification::error("Load failed"));
            }
        }
    }

    /// Starts a save of the current state and returns immediately. Saves
    /// may overlap; the last response to arrive wins.
    pub fn save(&mut self) -> JoinHandle<bool> {
        let snapshot = self.engine.snapshot();
        let client = self.client.clone();
        let notices = self.notices_tx.clone();
        self.notify(Notification::saving());

        tokio::spawn(async move {
            match client.save(&snapshot).await {
                Ok(_) => {
                    let _ = notices.send(Notification::success("Progress saved"));
                    true
                }
                Err(e) => {
                    warn!("Save error: {}", e);
                    let _ = notices.send(Notification::error("Save failed"));
                    false
                }
            }
        })
    }

    // ── Event handling ───────────────────────────────────────────────

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Click => {
                let outcome = self.engine.click();
                self.apply(outcome);
            }
            Command::Buy => {
                let outcome = self.engine.buy_upgrade();
                self.apply(outcome);
            }
            Command::Save => {
                self.save();
            }
            Command::Status => {
                println!("{}", StatusLine(self.engine.state()));
                print!("{}", AchievementList(self.engine.state()));
            }
            Command::Quit => {}
        }
    }

    fn apply(&mut self, outcome: StepOutcome) {
        for id in &outcome.unlocked {
            self.notify(Notification::success(format!(
                "Achievement: {}",
                id.def().name
            )));
        }
        if outcome.save {
            self.save();
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifier.show(notification, Instant::now());
    }

    fn drain_notices(&mut self) {
        while let Ok(n) = self.notices_rx.try_recv() {
            self.notify(n);
        }
    }

    // ── Main loop ────────────────────────────────────────────────────

    /// Loads, then runs until `Quit` arrives or the command channel closes.
    /// All timers are stopped before one last save, which is awaited for at
    /// most the request timeout. Returns the final state.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> GameState {
        self.load().await;

        let mut resource_timer = periodic(RESOURCE_TICK);
        let mut time_timer = periodic(TIME_TICK);
        let mut autosave_timer = periodic(self.config.autosave_interval);

        loop {
            tokio::select! {
                _ = resource_timer.tick() => {
                    let outcome = self.engine.resource_tick();
                    self.apply(outcome);
                }
                _ = time_timer.tick() => {
                    let outcome = self.engine.time_tick();
                    self.apply(outcome);
                }
                _ = autosave_timer.tick() => {
                    self.save();
                }
                Some(notice) = self.notices_rx.recv() => {
                    self.notify(notice);
                }
                command = commands.recv() => match command {
                    Some(Command::Quit) | None => break,
                    Some(command) => self.handle(command),
                },
            }
        }

        drop(resource_timer);
        drop(time_timer);
        drop(autosave_timer);
        info!("Timers stopped; saving before exit");

        let final_save = self.save();
        match tokio::time::timeout(self.config.request_timeout, final_save).await {
            Ok(Ok(true)) => info!("Final save complete"),
            Ok(_) => warn!("Final save failed"),
            Err(_) => warn!("Final save timed out"),
        }
        self.drain_notices();

        self.engine.snapshot()
    }
}

/// Fixed-rate timer whose first tick is one period from now.
fn periodic(period: Duration) -> Interval {
    let mut timer = interval_at(tokio::time::Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("c"), Some(Command::Click));
        assert_eq!(Command::parse(""), Some(Command::Click));
        assert_eq!(Command::parse(" BUY "), Some(Command::Buy));
        assert_eq!(Command::parse("save"), Some(Command::Save));
        assert_eq!(Command::parse("status"), Some(Command::Status));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("dance"), None);
    }
}
