//! # Placement Coordinator
//!
//! Drives exactly one player through placing their fleet. Two coordinators
//! run concurrently, one per player, each owning its own progress counter -
//! there is no shared mutable state between them, so a player flooding the
//! server with junk can never stall or corrupt the other player's progress.

use armada_engine::{BoardEngine, FLEET_SIZE};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::connection::Connection;
use crate::error::SessionError;
use crate::protocol::{commands, ClientMessage, PlayerSlot, ServerMessage};
use crate::scheduler::TurnScheduler;

/// One player's placement loop and progress counter.
pub struct PlacementCoordinator {
    slot: PlayerSlot,
    placed: usize,
    target: usize,
}

impl PlacementCoordinator {
    /// Creates a coordinator for `slot` with the standard fleet target.
    #[must_use]
    pub fn new(slot: PlayerSlot) -> Self {
        Self {
            slot,
            placed: 0,
            target: FLEET_SIZE,
        }
    }

    /// Runs the placement loop to completion.
    ///
    /// Receives commands until the player has made exactly `target`
    /// distinct successful placements. Shape failures get
    /// [`ServerMessage::InvalidFormat`], engine rejections get
    /// [`ServerMessage::InvalidPlacement`]; neither consumes a placement
    /// and the loop simply continues - there is no retry limit. On
    /// completion the slot is marked ready on the scheduler and the final
    /// count is returned.
    ///
    /// # Errors
    ///
    /// Propagates any transport failure, which abandons the match.
    pub async fn run<S, E>(
        mut self,
        conn: &mut Connection<S>,
        engine: &mut E,
        scheduler: &TurnScheduler,
    ) -> Result<usize, SessionError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        E: BoardEngine,
    {
        tracing::info!(slot = %self.slot, "placement phase started");
        while self.placed < self.target {
            let ClientMessage::Command { line } = conn.receive().await?;
            let command = match commands::parse_placement(&line) {
                Ok(command) => command,
                Err(err) => {
                    tracing::debug!(slot = %self.slot, %err, "malformed placement command");
                    conn.send(&ServerMessage::InvalidFormat).await?;
                    continue;
                }
            };
            match engine.place_ship(&command.ship, command.x, command.y, command.orientation) {
                Err(err) => {
                    tracing::debug!(slot = %self.slot, %err, "placement rejected by engine");
                    conn.send(&ServerMessage::InvalidPlacement).await?;
                }
                Ok(()) => {
                    self.placed += 1;
                    tracing::info!(
                        slot = %self.slot,
                        ship = %command.ship,
                        x = command.x,
                        y = command.y,
                        placed = self.placed,
                        "ship placed"
                    );
                    conn.send(&ServerMessage::PlacementAccepted {
                        grid: engine.render_self_grid(),
                    })
                    .await?;
                }
            }
        }
        scheduler.mark_ready(self.slot);
        tracing::info!(slot = %self.slot, "fleet complete, slot ready");
        Ok(self.placed)
    }
}
