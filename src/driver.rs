//! Timer-driven session loop
//!
//! One task owns the `Game` and is its only writer. Intents arrive on an
//! unbounded channel and are applied one at a time, interleaved with the
//! automatic descent clock. After every transition the task publishes a
//! fresh `Snapshot` on a watch channel, so readers only ever see whole states.

use crate::error::SessionClosed;
use crate::game::{Action, Game};
use crate::snapshot::Snapshot;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

/// Client side of a running session
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Action>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<Game>,
}

impl SessionHandle {
    /// Start driving `game` on the current tokio runtime
    pub fn spawn(game: Game) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snap_tx, snap_rx) = watch::channel(game.snapshot());
        let task = tokio::spawn(run_session(game, cmd_rx, snap_tx));
        Self {
            commands: cmd_tx,
            snapshots: snap_rx,
            task,
        }
    }

    /// Queue an intent; it is applied after everything queued before it
    pub fn send(&self, action: Action) -> Result<(), SessionClosed> {
        self.commands.send(action).map_err(|_| SessionClosed)
    }

    /// Latest published state
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published state
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Stop the loop, cancelling any pending timer, and hand back the game
    pub async fn shutdown(self) -> Result<Game, SessionClosed> {
        let Self { commands, task, .. } = self;
        drop(commands);
        task.await.map_err(|_| SessionClosed)
    }
}

/// What the descent timer is currently armed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cadence {
    interval: Duration,
    level: u32,
    soft_drop: bool,
}

/// The single periodic timer behind automatic descent
///
/// Re-armed from scratch whenever the cadence changes rather than adjusted,
/// so a level change or soft-drop toggle never inherits a stale deadline.
#[derive(Debug, Default)]
struct DescentClock {
    cadence: Option<Cadence>,
    deadline: Option<Instant>,
}

impl DescentClock {
    fn sync(&mut self, game: &Game, held: bool, now: Instant) {
        let cadence = if held {
            None
        } else {
            game.tick_interval().map(|interval| Cadence {
                interval,
                level: game.score().level,
                soft_drop: game.soft_drop_active(),
            })
        };

        if cadence != self.cadence {
            debug!("Descent clock re-armed: {:?}", cadence);
            self.cadence = cadence;
            self.deadline = None;
        }
        if self.deadline.is_none() {
            self.deadline = cadence.map(|c| now + c.interval);
        }
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }
}

async fn sleep_or_never(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn publish(snapshots: &watch::Sender<Snapshot>, game: &Game) {
    let snapshot = game.snapshot();
    snapshots.send_if_modified(|current| {
        if *current == snapshot {
            return false;
        }
        *current = snapshot;
        true
    });
}

async fn run_session(
    mut game: Game,
    mut commands: mpsc::UnboundedReceiver<Action>,
    snapshots: watch::Sender<Snapshot>,
) -> Game {
    let lock_delay = game.config().hard_drop_lock_delay();
    let mut clock = DescentClock::default();
    // set while a hard-dropped piece waits to lock
    let mut pending_lock: Option<Instant> = None;

    info!("Session started");
    loop {
        if pending_lock.is_none() && game.current_piece().is_none() && !game.is_game_over() {
            game.spawn();
        }
        clock.sync(&game, pending_lock.is_some(), Instant::now());
        publish(&snapshots, &game);

        tokio::select! {
            biased;

            command = commands.recv() => {
                let Some(action) = command else {
                    break;
                };

                if pending_lock.take().is_some() {
                    if action == Action::Reset {
                        debug!("Deferred lock cancelled by reset");
                    } else {
                        game.lock_piece();
                    }
                }

                match (action, lock_delay) {
                    (Action::HardDrop, Some(delay)) => {
                        if game.drop_to_floor().is_some() {
                            pending_lock = Some(Instant::now() + delay);
                        }
                    }
                    (Action::Reset, _) => {
                        game.reset();
                        clock.cancel();
                    }
                    (action, _) => {
                        game.process_action(action);
                    }
                }
            }
            _ = sleep_or_never(pending_lock.or(clock.deadline)) => {
                if pending_lock.take().is_some() {
                    game.lock_piece();
                } else {
                    game.tick();
                    clock.cancel();
                }
            }
        }
    }

    info!("Session stopped");
    game
}
