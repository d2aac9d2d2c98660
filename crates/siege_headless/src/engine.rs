//! Real-time engine task.
//!
//! One tokio task owns the [`Simulation`] and multiplexes three event
//! sources with `select!`:
//!
//! - a frame interval that runs one tick per period (missed frames are
//!   skipped, not replayed)
//! - an accrual interval on its own wall-clock period (missed periods are
//!   burst so every elapsed period credits once)
//! - a request channel for player commands and queries
//!
//! Each arm runs to completion before the next is polled, so ticks,
//! commands and accruals never interleave. A fresh [`Snapshot`] is
//! published on a watch channel whenever state changes.

use std::time::Duration;

use siege_core::commands::{Command, CommandOutcome};
use siege_core::error::GameError;
use siege_core::simulation::Simulation;
use siege_core::snapshot::Snapshot;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::HeadlessError;

/// Pending requests buffered before senders wait.
const REQUEST_BUFFER: usize = 64;

/// Messages accepted by the engine task.
#[derive(Debug)]
pub enum EngineRequest {
    /// Apply a player command.
    Apply {
        command: Command,
        reply: oneshot::Sender<Result<CommandOutcome, GameError>>,
    },
    /// Report `(tick, state_hash)`.
    Hash { reply: oneshot::Sender<(u64, u64)> },
    /// Stop the loop and hand the simulation back.
    Shutdown,
}

/// Client side of a running engine.
#[derive(Debug)]
pub struct EngineHandle {
    requests: mpsc::Sender<EngineRequest>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<Simulation>,
}

impl EngineHandle {
    /// Spawn the engine on the current runtime.
    ///
    /// `tick_rate` is frames per second; zero is treated as one.
    pub fn spawn(sim: Simulation, tick_rate: u32) -> Self {
        let (request_tx, request_rx) = mpsc::channel(REQUEST_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(sim.snapshot());
        let frame_period = Duration::from_secs(1) / tick_rate.max(1);

        let task = tokio::spawn(run_engine(sim, frame_period, request_rx, snapshot_tx));

        Self {
            requests: request_tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    /// Apply a command and wait for its outcome.
    pub async fn apply(&self, command: Command) -> Result<CommandOutcome, HeadlessError> {
        let (reply, outcome) = oneshot::channel();
        self.send(EngineRequest::Apply { command, reply }).await?;
        let outcome = outcome.await.map_err(|_| HeadlessError::EngineStopped)?;
        Ok(outcome?)
    }

    /// Current `(tick, state_hash)`.
    pub async fn hash(&self) -> Result<(u64, u64), HeadlessError> {
        let (reply, result) = oneshot::channel();
        self.send(EngineRequest::Hash { reply }).await?;
        result.await.map_err(|_| HeadlessError::EngineStopped)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Stop the engine and return the final simulation.
    pub async fn shutdown(self) -> Result<Simulation, HeadlessError> {
        // A closed channel means the loop already exited.
        let _ = self.requests.send(EngineRequest::Shutdown).await;
        Ok(self.task.await?)
    }

    async fn send(&self, request: EngineRequest) -> Result<(), HeadlessError> {
        self.requests
            .send(request)
            .await
            .map_err(|_| HeadlessError::EngineStopped)
    }
}

/// Engine main loop. Returns the simulation once shut down.
pub async fn run_engine(
    mut sim: Simulation,
    frame_period: Duration,
    mut requests: mpsc::Receiver<EngineRequest>,
    snapshots: watch::Sender<Snapshot>,
) -> Simulation {
    let mut frames = time::interval(frame_period);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let accrual_period = sim.clock().period();
    let mut accrual = time::interval_at(Instant::now() + accrual_period, accrual_period);
    accrual.set_missed_tick_behavior(MissedTickBehavior::Burst);

    tracing::info!(
        frame_ms = frame_period.as_millis() as u64,
        accrual_ms = accrual_period.as_millis() as u64,
        "Engine started"
    );

    loop {
        tokio::select! {
            _ = frames.tick() => {
                sim.tick();
                snapshots.send_replace(sim.snapshot());
            }
            _ = accrual.tick() => {
                sim.accrue_resources();
                snapshots.send_replace(sim.snapshot());
            }
            request = requests.recv() => match request {
                Some(EngineRequest::Apply { command, reply }) => {
                    let name = command.name();
                    let result = sim.apply(command);
                    // Publish first so the caller sees the new state on reply.
                    snapshots.send_replace(sim.snapshot());
                    if reply.send(result).is_err() {
                        tracing::debug!(command = name, "Requester went away before reply");
                    }
                }
                Some(EngineRequest::Hash { reply }) => {
                    if reply.send((sim.get_tick(), sim.state_hash())).is_err() {
                        tracing::debug!(command = "hash", "Requester went away before reply");
                    }
                }
                Some(EngineRequest::Shutdown) | None => break,
            },
        }
    }

    tracing::info!(tick = sim.get_tick(), "Engine stopped");
    sim
}

#[cfg(test)]
mod tests {
    use super::*;
    use siege_core::catalog::{StructureKind, UnitKind};
    use siege_core::math::Vec2Fixed;

    #[tokio::test(start_paused = true)]
    async fn test_accrual_follows_wall_clock() {
        let engine = EngineHandle::spawn(Simulation::new(), 60);
        engine
            .apply(Command::PlaceStructure {
                kind: StructureKind::GoldMine,
                position: Vec2Fixed::from_int(100, 100),
            })
            .await
            .unwrap();
        assert_eq!(engine.snapshot().gold, 800);

        time::sleep(Duration::from_millis(1999)).await;
        engine.hash().await.unwrap();
        assert_eq!(engine.snapshot().gold, 800);

        time::sleep(Duration::from_millis(4002)).await;
        engine.hash().await.unwrap();
        assert_eq!(engine.snapshot().gold, 815);

        let sim = engine.shutdown().await.unwrap();
        assert_eq!(sim.player().gold, 815);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frames_advance_ticks() {
        let engine = EngineHandle::spawn(Simulation::new(), 60);
        time::sleep(Duration::from_secs(1)).await;
        let (tick, _) = engine.hash().await.unwrap();
        assert!((59..=62).contains(&tick), "tick was {tick}");
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejections_cross_the_channel() {
        let engine = EngineHandle::spawn(Simulation::new(), 60);
        let err = engine
            .apply(Command::DeployUnit(Vec2Fixed::ZERO))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "attack_mode_disabled");
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_hash_request_keeps_engine_running() {
        let engine = EngineHandle::spawn(Simulation::new(), 60);
        let (reply, rx) = oneshot::channel();
        drop(rx);
        engine.send(EngineRequest::Hash { reply }).await.unwrap();

        let (tick, _) = engine.hash().await.unwrap();
        let sim = engine.shutdown().await.unwrap();
        assert!(sim.get_tick() >= tick);
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroyed_structures_leave_the_snapshot() {
        let engine = EngineHandle::spawn(Simulation::new(), 60);
        engine
            .apply(Command::PlaceStructure {
                kind: StructureKind::Cannon,
                position: Vec2Fixed::from_int(40, 0),
            })
            .await
            .unwrap();
        engine
            .apply(Command::TrainUnit(UnitKind::Barbarian))
            .await
            .unwrap();
        engine.apply(Command::ToggleAttackMode).await.unwrap();
        engine
            .apply(Command::DeployUnit(Vec2Fixed::ZERO))
            .await
            .unwrap();
        assert_eq!(engine.snapshot().structures.len(), 1);

        // 34 hits of 15 at one per 30 ticks, 60 ticks per second.
        time::sleep(Duration::from_secs(20)).await;
        engine.hash().await.unwrap();
        assert!(engine.snapshot().structures.is_empty());
        engine.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_after_shutdown_fail() {
        let engine = EngineHandle::spawn(Simulation::new(), 60);
        let requests = engine.requests.clone();
        engine.shutdown().await.unwrap();

        let (reply, _rx) = oneshot::channel();
        assert!(requests.send(EngineRequest::Hash { reply }).await.is_err());
    }
}
