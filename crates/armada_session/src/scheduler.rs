//! # Turn Scheduler
//!
//! Owns whose turn it is, the placement-to-battle readiness barrier, and
//! turn advancement including skip-on-elimination.
//!
//! ## Design
//!
//! The original design shared readiness flags behind a lock object with
//! wait/notify. Here all turn state lives behind one mutex inside the
//! scheduler, and the barrier is a `Notify` whose waiters re-check the
//! readiness predicate after every wakeup, so spurious wakeups are
//! harmless. No two tasks ever write the same field from outside the
//! scheduler's exclusive section.

use parking_lot::Mutex;
use rand::Rng;
use tokio::sync::Notify;

use crate::protocol::PlayerSlot;

/// Lifecycle states of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// Waiting for both players to finish placement.
    AwaitingReadiness,
    /// Battle in progress; a current player exists.
    Active,
    /// The match is over; no further turns will be scheduled.
    Finished,
}

/// Turn state, mutated only under the scheduler's mutex.
struct TurnState {
    phase: SchedulerPhase,
    ready: [bool; 2],
    current: Option<PlayerSlot>,
    /// Monotonic count of turns handed out, starting at 1.
    turn: u64,
}

/// The single owner of turn state for one session.
pub struct TurnScheduler {
    state: Mutex<TurnState>,
    started: Notify,
}

impl TurnScheduler {
    /// Creates a scheduler awaiting both players' readiness.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TurnState {
                phase: SchedulerPhase::AwaitingReadiness,
                ready: [false; 2],
                current: None,
                turn: 0,
            }),
            started: Notify::new(),
        }
    }

    /// Records a slot as ready. The transition to [`SchedulerPhase::Active`]
    /// happens atomically with the second slot's readiness, waking every
    /// task blocked in [`TurnScheduler::wait_until_active`].
    pub fn mark_ready(&self, slot: PlayerSlot) {
        let mut state = self.state.lock();
        state.ready[slot.index()] = true;
        tracing::debug!(%slot, "slot marked ready");
        if state.ready.iter().all(|ready| *ready)
            && state.phase == SchedulerPhase::AwaitingReadiness
        {
            state.phase = SchedulerPhase::Active;
            drop(state);
            tracing::info!("both players ready, entering battle");
            self.started.notify_waiters();
        }
    }

    /// Suspends until both slots are ready.
    ///
    /// Returns immediately if the barrier already opened. The waiter
    /// registers with the notifier BEFORE checking the predicate, so a
    /// notification landing between the check and the await is never
    /// lost; the predicate is re-checked after every wakeup.
    pub async fn wait_until_active(&self) {
        let mut notified = std::pin::pin!(self.started.notified());
        loop {
            notified.as_mut().enable();
            if self.state.lock().phase != SchedulerPhase::AwaitingReadiness {
                return;
            }
            notified.as_mut().await;
            notified.set(self.started.notified());
        }
    }

    /// Selects the first attacker uniformly at random.
    ///
    /// # Panics
    ///
    /// Panics if called before the barrier opened or more than once per
    /// session - both are orchestrator bugs.
    pub fn choose_first_attacker<R: Rng>(&self, rng: &mut R) -> PlayerSlot {
        let slot = if rng.gen_range(0..2) == 0 {
            PlayerSlot::One
        } else {
            PlayerSlot::Two
        };
        self.start_with(slot)
    }

    /// Installs `slot` as the first attacker.
    ///
    /// # Panics
    ///
    /// Panics if called before the barrier opened or more than once per
    /// session.
    pub fn start_with(&self, slot: PlayerSlot) -> PlayerSlot {
        let mut state = self.state.lock();
        assert_eq!(
            state.phase,
            SchedulerPhase::Active,
            "first attacker chosen before both players were ready"
        );
        assert!(state.current.is_none(), "first attacker already chosen");
        state.current = Some(slot);
        state.turn = 1;
        tracing::info!(%slot, "first attacker selected");
        slot
    }

    /// The slot whose turn it is.
    ///
    /// # Panics
    ///
    /// Panics before the first attacker is chosen; callers must not ask
    /// for a current player until the battle phase began.
    pub fn current_player(&self) -> PlayerSlot {
        let state = self.state.lock();
        assert_eq!(
            state.phase,
            SchedulerPhase::Active,
            "no current player outside the battle phase"
        );
        state.current.expect("active scheduler without a current player")
    }

    /// Hands the turn to the next living slot.
    ///
    /// Skips a slot whose fleet is gone; if every slot is eliminated the
    /// scheduler terminates in [`SchedulerPhase::Finished`] instead of
    /// toggling forever.
    ///
    /// # Panics
    ///
    /// Panics if the battle phase has not begun.
    pub fn advance(&self, has_lost: impl Fn(PlayerSlot) -> bool) -> SchedulerPhase {
        let mut state = self.state.lock();
        assert_eq!(
            state.phase,
            SchedulerPhase::Active,
            "advance called outside the battle phase"
        );
        let current = state
            .current
            .expect("active scheduler without a current player");
        let mut candidate = current.opponent();
        // Two slots, so two checks cover everyone; past that, both are
        // eliminated and the match is over.
        for _ in 0..2 {
            if !has_lost(candidate) {
                state.current = Some(candidate);
                state.turn += 1;
                return SchedulerPhase::Active;
            }
            candidate = candidate.opponent();
        }
        state.phase = SchedulerPhase::Finished;
        SchedulerPhase::Finished
    }

    /// Marks the match finished. Idempotent.
    pub fn finish(&self) {
        self.state.lock().phase = SchedulerPhase::Finished;
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SchedulerPhase {
        self.state.lock().phase
    }

    /// Monotonic turn counter; 0 until the first attacker is chosen.
    #[must_use]
    pub fn turn(&self) -> u64 {
        self.state.lock().turn
    }
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}
