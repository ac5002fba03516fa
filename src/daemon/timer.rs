//! Timer engine for the countdown timer.
//!
//! This module provides the core timer functionality:
//! - Phase transitions (Inactive → Running → Paused)
//! - One-second countdown driven by a cancellable tokio task
//! - Event firing for observers (daemon log, status renderers)
//!
//! Exactly one tick task is live while the phase is Running; it is spawned
//! on every transition into Running and aborted on every transition out of
//! it, so a stale tick can never fire against state it was not scheduled
//! for. Ticks wait a fixed second from the previous decrement with no
//! drift compensation.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::types::{Phase, TimerConfig, TimerState};

/// Fixed wait between decrements.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for observers and external integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started from the full duration
    Started {
        /// Total countdown duration in seconds
        total_seconds: u32,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds after the decrement
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused,
    /// Countdown resumed
    Resumed,
    /// Countdown reset to the full duration
    Reset,
    /// Countdown reached zero and returned to the inactive phase
    Finished,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns the countdown state and the tick task.
///
/// Intents are deliberately infallible: an intent that is invalid for the
/// current phase is ignored with no state change and no event, so callers
/// never need to handle a rejection.
pub struct TimerEngine {
    /// Countdown state, shared with the tick task
    state: Arc<Mutex<TimerState>>,
    /// Handle of the currently live tick task, if any
    tick_task: Mutex<Option<JoinHandle<()>>>,
    /// Event sender channel; delivery is best-effort
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates a new TimerEngine with the given configuration and event channel.
    pub fn new(config: TimerConfig, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState::new(config))),
            tick_task: Mutex::new(None),
            event_tx,
        }
    }

    /// Starts the countdown from the full duration.
    ///
    /// Ignored unless the phase is Inactive.
    pub async fn start(&self) {
        let mut task = self.tick_task.lock().await;
        {
            let mut state = self.state.lock().await;
            if state.phase != Phase::Inactive {
                tracing::debug!(phase = state.phase.as_str(), "start ignored");
                return;
            }
            state.start();
            self.send(TimerEvent::Started {
                total_seconds: state.config.total_seconds,
            });
        }
        Self::abort_ticker(&mut task);
        *task = Some(self.spawn_ticker());
    }

    /// Freezes the countdown, cancelling the pending tick.
    ///
    /// Ignored unless the phase is Running.
    pub async fn pause(&self) {
        let mut task = self.tick_task.lock().await;
        let mut state = self.state.lock().await;
        if !state.is_running() {
            tracing::debug!(phase = state.phase.as_str(), "pause ignored");
            return;
        }
        Self::abort_ticker(&mut task);
        state.pause();
        self.send(TimerEvent::Paused);
    }

    /// Continues the countdown from the paused value.
    ///
    /// Ignored unless the phase is Paused.
    pub async fn resume(&self) {
        let mut task = self.tick_task.lock().await;
        {
            let mut state = self.state.lock().await;
            if !state.is_paused() {
                tracing::debug!(phase = state.phase.as_str(), "resume ignored");
                return;
            }
            state.resume();
            self.send(TimerEvent::Resumed);
        }
        Self::abort_ticker(&mut task);
        *task = Some(self.spawn_ticker());
    }

    /// Returns to the inactive phase with a full countdown, cancelling the
    /// pending tick.
    ///
    /// Ignored when the phase is already Inactive.
    pub async fn reset(&self) {
        let mut task = self.tick_task.lock().await;
        let mut state = self.state.lock().await;
        if state.phase == Phase::Inactive {
            tracing::debug!("reset ignored");
            return;
        }
        Self::abort_ticker(&mut task);
        state.reset();
        self.send(TimerEvent::Reset);
    }

    /// Replaces the configuration.
    ///
    /// Only applied while the phase is Inactive; returns whether the new
    /// configuration took effect. The remaining time is refilled to the new
    /// total.
    pub async fn set_config(&self, config: TimerConfig) -> bool {
        let mut state = self.state.lock().await;
        if state.phase != Phase::Inactive {
            return false;
        }
        *state = TimerState::new(config);
        true
    }

    /// Returns a snapshot of the current countdown state.
    pub async fn snapshot(&self) -> TimerState {
        self.state.lock().await.clone()
    }

    /// Spawns the tick task for the current Running phase.
    ///
    /// The task waits one second, decrements, and repeats until the
    /// countdown finishes or the task is aborted by a non-tick intent.
    fn spawn_ticker(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            loop {
                sleep(TICK_INTERVAL).await;

                let mut state = state.lock().await;
                if !state.is_running() {
                    break;
                }

                let finished = state.tick();
                let _ = event_tx.send(TimerEvent::Tick {
                    remaining_seconds: state.remaining_seconds,
                });

                if finished {
                    tracing::debug!("countdown finished");
                    let _ = event_tx.send(TimerEvent::Finished);
                    break;
                }
            }
        })
    }

    /// Aborts the live tick task, if any.
    fn abort_ticker(task: &mut Option<JoinHandle<()>>) {
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }

    /// Sends an event, ignoring a dropped receiver.
    fn send(&self, event: TimerEvent) {
        let _ = self.event_tx.send(event);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_engine() -> (TimerEngine, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(TimerConfig::default(), tx);
        (engine, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    // ------------------------------------------------------------------------
    // Intent Tests
    // ------------------------------------------------------------------------

    mod intent_tests {
        use super::*;

        #[tokio::test]
        async fn test_start_enters_running_with_full_countdown() {
            let (engine, mut rx) = create_engine();

            engine.start().await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Running);
            assert_eq!(state.remaining_seconds, 60);

            assert_eq!(
                rx.try_recv().unwrap(),
                TimerEvent::Started { total_seconds: 60 }
            );
        }

        #[tokio::test]
        async fn test_start_while_running_is_ignored() {
            let (engine, mut rx) = create_engine();

            engine.start().await;
            let _ = drain(&mut rx);

            engine.start().await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Running);
            assert!(drain(&mut rx).is_empty(), "ignored intent must not emit events");
        }

        #[tokio::test]
        async fn test_pause_freezes_countdown() {
            let (engine, mut rx) = create_engine();

            engine.start().await;
            let _ = drain(&mut rx);

            engine.pause().await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Paused);
            assert_eq!(state.remaining_seconds, 60);
            assert_eq!(rx.try_recv().unwrap(), TimerEvent::Paused);
        }

        #[tokio::test]
        async fn test_pause_while_inactive_is_ignored() {
            let (engine, mut rx) = create_engine();

            engine.pause().await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Inactive);
            assert!(drain(&mut rx).is_empty());
        }

        #[tokio::test]
        async fn test_resume_returns_to_running() {
            let (engine, mut rx) = create_engine();

            engine.start().await;
            engine.pause().await;
            let _ = drain(&mut rx);

            engine.resume().await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Running);
            assert_eq!(rx.try_recv().unwrap(), TimerEvent::Resumed);
        }

        #[tokio::test]
        async fn test_resume_while_inactive_is_ignored() {
            let (engine, mut rx) = create_engine();

            engine.resume().await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Inactive);
            assert!(drain(&mut rx).is_empty());
        }

        #[tokio::test]
        async fn test_resume_while_running_is_ignored() {
            let (engine, mut rx) = create_engine();

            engine.start().await;
            let _ = drain(&mut rx);

            engine.resume().await;

            assert!(drain(&mut rx).is_empty());
        }

        #[tokio::test]
        async fn test_reset_from_running() {
            let (engine, mut rx) = create_engine();

            engine.start().await;
            let _ = drain(&mut rx);

            engine.reset().await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Inactive);
            assert_eq!(state.remaining_seconds, 60);
            assert_eq!(rx.try_recv().unwrap(), TimerEvent::Reset);
        }

        #[tokio::test]
        async fn test_reset_from_paused() {
            let (engine, mut rx) = create_engine();

            engine.start().await;
            engine.pause().await;
            let _ = drain(&mut rx);

            engine.reset().await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Inactive);
            assert_eq!(state.remaining_seconds, 60);
        }

        #[tokio::test]
        async fn test_reset_while_inactive_is_ignored() {
            let (engine, mut rx) = create_engine();

            engine.reset().await;

            assert!(drain(&mut rx).is_empty());
        }

        #[tokio::test]
        async fn test_set_config_while_inactive() {
            let (engine, _rx) = create_engine();

            let applied = engine.set_config(TimerConfig::with_total_seconds(180)).await;

            assert!(applied);
            let state = engine.snapshot().await;
            assert_eq!(state.config.total_seconds, 180);
            assert_eq!(state.remaining_seconds, 180);
        }

        #[tokio::test]
        async fn test_set_config_refused_while_running() {
            let (engine, _rx) = create_engine();

            engine.start().await;
            let applied = engine.set_config(TimerConfig::with_total_seconds(180)).await;

            assert!(!applied);
            let state = engine.snapshot().await;
            assert_eq!(state.config.total_seconds, 60);
        }
    }

    // ------------------------------------------------------------------------
    // Tick Scenarios (paused tokio clock)
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_tick_decrements_once_per_second() {
            let (engine, mut rx) = create_engine();

            engine.start().await;
            let _ = drain(&mut rx);

            sleep(Duration::from_millis(1100)).await;
            assert_eq!(engine.snapshot().await.remaining_seconds, 59);

            sleep(Duration::from_millis(1000)).await;
            assert_eq!(engine.snapshot().await.remaining_seconds, 58);

            let events = drain(&mut rx);
            assert_eq!(
                events,
                vec![
                    TimerEvent::Tick {
                        remaining_seconds: 59
                    },
                    TimerEvent::Tick {
                        remaining_seconds: 58
                    },
                ]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_pause_produces_no_decrement() {
            let (engine, _rx) = create_engine();

            engine.start().await;
            sleep(Duration::from_millis(1100)).await;
            assert_eq!(engine.snapshot().await.remaining_seconds, 59);

            engine.pause().await;
            sleep(Duration::from_secs(5)).await;

            assert_eq!(engine.snapshot().await.remaining_seconds, 59);
        }

        #[tokio::test(start_paused = true)]
        async fn test_resume_continues_from_paused_value() {
            let (engine, _rx) = create_engine();

            engine.start().await;
            sleep(Duration::from_millis(1100)).await;
            engine.pause().await;
            sleep(Duration::from_secs(5)).await;

            engine.resume().await;
            sleep(Duration::from_millis(1100)).await;

            let state = engine.snapshot().await;
            assert_eq!(state.remaining_seconds, 58);
            assert_eq!(state.phase, Phase::Running);
        }

        #[tokio::test(start_paused = true)]
        async fn test_reset_suppresses_pending_tick() {
            let (engine, mut rx) = create_engine();

            engine.start().await;
            let _ = drain(&mut rx);

            // Halfway into the pending one-second wait
            sleep(Duration::from_millis(500)).await;
            engine.reset().await;
            let _ = drain(&mut rx);

            sleep(Duration::from_secs(2)).await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Inactive);
            assert_eq!(state.remaining_seconds, 60);
            assert!(drain(&mut rx).is_empty(), "no tick may fire after reset");
        }

        #[tokio::test(start_paused = true)]
        async fn test_full_countdown_finishes_inactive() {
            let (engine, mut rx) = create_engine();

            engine.start().await;
            let _ = drain(&mut rx);

            sleep(Duration::from_millis(60_500)).await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Inactive);
            assert_eq!(state.remaining_seconds, 0);

            let events = drain(&mut rx);
            let ticks = events
                .iter()
                .filter(|e| matches!(e, TimerEvent::Tick { .. }))
                .count();
            assert_eq!(ticks, 60);
            assert_eq!(events.last(), Some(&TimerEvent::Finished));
        }

        #[tokio::test(start_paused = true)]
        async fn test_no_ticks_after_finish_until_restart() {
            let (engine, mut rx) = create_engine();
            engine.set_config(TimerConfig::with_total_seconds(2)).await;

            engine.start().await;
            sleep(Duration::from_millis(2500)).await;
            let _ = drain(&mut rx);

            sleep(Duration::from_secs(3)).await;
            assert!(drain(&mut rx).is_empty(), "finished countdown must stay quiet");

            engine.start().await;
            sleep(Duration::from_millis(1100)).await;

            let state = engine.snapshot().await;
            assert_eq!(state.phase, Phase::Running);
            assert_eq!(state.remaining_seconds, 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_pause_freezes_and_resume_continues_countdown() {
            // total=60: start -> 1s -> 59 -> pause -> 5s -> 59 -> resume -> 1s -> 58
            let (engine, _rx) = create_engine();

            engine.start().await;
            sleep(Duration::from_millis(1100)).await;
            assert_eq!(engine.snapshot().await.remaining_seconds, 59);

            engine.pause().await;
            sleep(Duration::from_secs(5)).await;
            assert_eq!(engine.snapshot().await.remaining_seconds, 59);

            engine.resume().await;
            sleep(Duration::from_millis(1100)).await;
            assert_eq!(engine.snapshot().await.remaining_seconds, 58);
        }

        #[tokio::test(start_paused = true)]
        async fn test_progress_fraction_tracks_ticks() {
            let (engine, _rx) = create_engine();

            engine.start().await;
            sleep(Duration::from_millis(30_500)).await;

            let state = engine.snapshot().await;
            assert_eq!(state.remaining_seconds, 30);
            assert!((state.progress_fraction() - 0.5).abs() < f64::EPSILON);
            assert_eq!(state.minutes(), 0);
            assert_eq!(state.seconds(), 30);
        }
    }
}
