//! # Session Orchestrator
//!
//! The top-level state machine for one match:
//!
//! ```text
//! Connecting ──► Placing ──► Battling ──► Ended
//! ```
//!
//! - **Connecting**: both connections are in hand; slots are announced.
//! - **Placing**: two placement coordinators run concurrently and are
//!   joined; the readiness barrier opens when both fleets are complete.
//! - **Battling**: alternating turns until one fleet is gone. A malformed
//!   attack forfeits the turn; an out-of-bounds or repeated attack is
//!   rejected without consuming it.
//! - **Ended**: win/loss announcements, then everything is dropped.
//!
//! Transport failures at any point abandon the match and surface as
//! [`SessionError`]; they never take the host process down with them.

use armada_engine::{AttackOutcome, BoardEngine, FLEET_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::connection::Connection;
use crate::error::SessionError;
use crate::placement::PlacementCoordinator;
use crate::protocol::{commands, ClientMessage, PlayerSlot, ServerMessage};
use crate::scheduler::{SchedulerPhase, TurnScheduler};

/// Welcome banner and instructions, broadcast when placement begins.
pub const WELCOME_TEXT: &str = "\
============================================================
          A R M A D A   -   B A T T L E S H I P
============================================================
Each player has two 10x10 grids: a SELF grid showing your
ships and a TARGET grid tracking your attacks.

Place 5 ships with:  <type> <row> <col> <orientation>
  types:        carrier battleship cruiser submarine destroyer
  orientation:  0 = horizontal, 1 = vertical

Cell states: 0 empty, 1 ship, 2 miss, 3 hit.

Once both fleets are placed, players alternate attacks:
  <row> <col>
The first player to lose every ship loses the game.
============================================================";

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Connections accepted, roles not yet announced.
    Connecting,
    /// Both players are placing ships.
    Placing,
    /// Alternating attack turns.
    Battling,
    /// Outcome announced; resources about to be released.
    Ended,
}

/// Per-session tunables.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionConfig {
    /// Forces the first attacker instead of rolling for it. Test hook;
    /// `None` selects uniformly at random.
    pub first_attacker: Option<PlayerSlot>,
}

/// One player's half of the session: slot, channel, and board.
struct PlayerSide<S, E> {
    slot: PlayerSlot,
    conn: Connection<S>,
    engine: E,
}

/// How one battle-loop iteration ended.
enum TurnResult {
    /// Malformed command; the turn was forfeited.
    Forfeited,
    /// The engine rejected the attack; the turn is still open.
    Rejected,
    /// The attack resolved (miss, hit, or sink).
    Resolved,
}

/// A single match from role announcement to outcome.
pub struct Session<S, E> {
    players: [PlayerSide<S, E>; 2],
    scheduler: TurnScheduler,
    config: SessionConfig,
    phase: Phase,
}

impl<S, E> Session<S, E>
where
    S: AsyncRead + AsyncWrite + Unpin,
    E: BoardEngine,
{
    /// Builds a session. The first accepted connection is slot One -
    /// the assignment never changes afterwards.
    pub fn new(first: S, second: S, engines: (E, E), config: SessionConfig) -> Self {
        Self {
            players: [
                PlayerSide {
                    slot: PlayerSlot::One,
                    conn: Connection::new(first),
                    engine: engines.0,
                },
                PlayerSide {
                    slot: PlayerSlot::Two,
                    conn: Connection::new(second),
                    engine: engines.1,
                },
            ],
            scheduler: TurnScheduler::new(),
            config,
            phase: Phase::Connecting,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs the match to completion and returns the winning slot.
    ///
    /// # Errors
    ///
    /// Any transport failure abandons the match. Player mistakes never
    /// surface here.
    pub async fn run(&mut self) -> Result<PlayerSlot, SessionError> {
        self.assign_roles().await?;
        self.run_placement().await?;
        let winner = self.run_battle().await?;
        self.announce_outcome(winner).await?;
        Ok(winner)
    }

    /// Announces each player's slot.
    async fn assign_roles(&mut self) -> Result<(), SessionError> {
        for side in &mut self.players {
            side.conn
                .send(&ServerMessage::RoleAssignment { slot: side.slot })
                .await?;
            tracing::info!(slot = %side.slot, "role assigned");
        }
        Ok(())
    }

    /// Runs both placement loops concurrently and joins on them.
    async fn run_placement(&mut self) -> Result<(), SessionError> {
        self.phase = Phase::Placing;
        self.broadcast(&ServerMessage::WelcomeText {
            body: WELCOME_TEXT.to_string(),
        })
        .await?;

        let Self {
            players, scheduler, ..
        } = self;
        let [one, two] = players;
        let (placed_one, placed_two) = tokio::try_join!(
            PlacementCoordinator::new(one.slot).run(&mut one.conn, &mut one.engine, scheduler),
            PlacementCoordinator::new(two.slot).run(&mut two.conn, &mut two.engine, scheduler),
        )?;
        debug_assert_eq!(placed_one, FLEET_SIZE);
        debug_assert_eq!(placed_two, FLEET_SIZE);

        // Both coordinators marked their slots ready, so this cannot block;
        // it still goes through the barrier rather than assuming so.
        scheduler.wait_until_active().await;
        self.broadcast(&ServerMessage::PlacementComplete).await?;
        tracing::info!("placement complete on both sides");
        Ok(())
    }

    /// Alternating turns until one fleet is eliminated.
    async fn run_battle(&mut self) -> Result<PlayerSlot, SessionError> {
        self.phase = Phase::Battling;
        let first = match self.config.first_attacker {
            Some(slot) => self.scheduler.start_with(slot),
            None => {
                let mut rng = StdRng::from_entropy();
                self.scheduler.choose_first_attacker(&mut rng)
            }
        };
        tracing::info!(%first, "battle phase started");

        while self.eliminated_player().is_none() {
            self.play_turn().await?;
        }

        let loser = self
            .eliminated_player()
            .expect("battle loop exited without an eliminated player");
        self.scheduler.finish();
        Ok(loser.opponent())
    }

    /// One iteration of the battle loop: prompt, receive, resolve.
    async fn play_turn(&mut self) -> Result<(), SessionError> {
        let attacker_slot = self.scheduler.current_player();
        let Self {
            players, scheduler, ..
        } = self;

        let result = {
            let (attacker, defender) = split_pair(players, attacker_slot);
            attacker.conn.send(&ServerMessage::TurnPrompt).await?;
            defender
                .conn
                .send(&ServerMessage::OpponentWaiting {
                    slot: attacker_slot,
                })
                .await?;

            let ClientMessage::Command { line } = attacker.conn.receive().await?;
            match commands::parse_attack(&line) {
                Err(err) => {
                    tracing::debug!(slot = %attacker_slot, %err, "malformed attack, turn forfeited");
                    attacker.conn.send(&ServerMessage::InvalidInput).await?;
                    TurnResult::Forfeited
                }
                Ok(command) => {
                    let outcome =
                        attacker
                            .engine
                            .attack(command.x, command.y, &mut defender.engine);
                    tracing::info!(
                        slot = %attacker_slot,
                        x = command.x,
                        y = command.y,
                        turn = scheduler.turn(),
                        ?outcome,
                        "attack resolved"
                    );
                    match outcome {
                        AttackOutcome::OutOfBounds => {
                            attacker.conn.send(&ServerMessage::AttackOutOfBounds).await?;
                            TurnResult::Rejected
                        }
                        AttackOutcome::AlreadyAttacked => {
                            attacker.conn.send(&ServerMessage::AlreadyAttacked).await?;
                            TurnResult::Rejected
                        }
                        AttackOutcome::Miss | AttackOutcome::Hit | AttackOutcome::Sunk => {
                            let notice = ServerMessage::AttackNotice {
                                x: command.x,
                                y: command.y,
                            };
                            attacker.conn.send(&notice).await?;
                            defender.conn.send(&notice).await?;

                            let (attacker_text, defender_text) = narratives(outcome);
                            defender
                                .conn
                                .send(&ServerMessage::SelfGridUpdate {
                                    grid: defender.engine.render_self_grid(),
                                    narrative: defender_text.to_string(),
                                })
                                .await?;
                            attacker
                                .conn
                                .send(&ServerMessage::TargetGridUpdate {
                                    grid: attacker.engine.render_target_grid(),
                                    narrative: attacker_text.to_string(),
                                })
                                .await?;
                            TurnResult::Resolved
                        }
                    }
                }
            }
        };

        match result {
            // Rejected attempts leave the turn with the same player.
            TurnResult::Rejected => {}
            TurnResult::Forfeited | TurnResult::Resolved => {
                let phase =
                    scheduler.advance(|slot| players[slot.index()].engine.has_lost());
                if phase == SchedulerPhase::Finished {
                    tracing::warn!("both fleets eliminated, scheduler finished");
                }
            }
        }
        Ok(())
    }

    /// Sends the win and loss announcements.
    async fn announce_outcome(&mut self, winner: PlayerSlot) -> Result<(), SessionError> {
        self.phase = Phase::Ended;
        for side in &mut self.players {
            let narrative = if side.slot == winner {
                "You have taken down all opponent ships! You Win!"
            } else {
                "You have lost all ships! You Lose..."
            };
            side.conn
                .send(&ServerMessage::GameOver {
                    winner,
                    narrative: narrative.to_string(),
                })
                .await?;
        }
        tracing::info!(%winner, "session complete");
        Ok(())
    }

    /// The slot whose fleet is gone, if any.
    fn eliminated_player(&self) -> Option<PlayerSlot> {
        self.players
            .iter()
            .find(|side| side.engine.has_lost())
            .map(|side| side.slot)
    }

    /// Sends a message to both players, slot One first.
    async fn broadcast(&mut self, message: &ServerMessage) -> Result<(), SessionError> {
        for side in &mut self.players {
            side.conn.send(message).await?;
        }
        Ok(())
    }
}

/// Splits the player pair into (attacker, defender) for `slot`.
fn split_pair<S, E>(
    players: &mut [PlayerSide<S, E>; 2],
    slot: PlayerSlot,
) -> (&mut PlayerSide<S, E>, &mut PlayerSide<S, E>) {
    let [one, two] = players;
    match slot {
        PlayerSlot::One => (one, two),
        PlayerSlot::Two => (two, one),
    }
}

/// Attacker and defender narratives for a resolved outcome.
fn narratives(outcome: AttackOutcome) -> (&'static str, &'static str) {
    match outcome {
        AttackOutcome::Miss => ("You missed!", "Opponent missed!"),
        AttackOutcome::Hit => ("You have hit a ship!", "Opponent has hit your ship!"),
        AttackOutcome::Sunk => (
            "You have taken down an enemy ship!",
            "Your ship has been taken down!",
        ),
        AttackOutcome::OutOfBounds | AttackOutcome::AlreadyAttacked => {
            unreachable!("rejected outcomes have no narrative")
        }
    }
}
