//! End-to-end match over in-memory transports: two scripted clients play a
//! complete game against the real grid engine, exercising placement
//! retries, turn hand-off, the turn-consumption policy, and the final
//! win/loss announcements.

use armada_engine::GridBoard;
use armada_session::{
    ClientMessage, Connection, Phase, PlayerSlot, ServerMessage, Session, SessionConfig,
    SessionError,
};
use std::collections::VecDeque;
use tokio::io::DuplexStream;

/// Plays one side: placements are sent in lockstep, attacks on prompt.
/// Returns every message the server sent this client.
async fn scripted_client(
    io: DuplexStream,
    placements: Vec<&'static str>,
    attacks: Vec<&'static str>,
) -> Vec<ServerMessage> {
    let mut conn = Connection::new(io);
    let mut attacks: VecDeque<&str> = attacks.into();
    let mut received = Vec::new();

    for placement in placements {
        conn.send(&ClientMessage::command(placement)).await.unwrap();
        loop {
            let msg: ServerMessage = conn.receive().await.unwrap();
            let is_response = matches!(
                msg,
                ServerMessage::PlacementAccepted { .. }
                    | ServerMessage::InvalidFormat
                    | ServerMessage::InvalidPlacement
            );
            received.push(msg);
            if is_response {
                break;
            }
        }
    }

    loop {
        let msg: ServerMessage = conn.receive().await.unwrap();
        match &msg {
            ServerMessage::TurnPrompt => {
                received.push(msg);
                let line = attacks.pop_front().expect("attack script exhausted");
                conn.send(&ClientMessage::command(line)).await.unwrap();
            }
            ServerMessage::GameOver { .. } => {
                received.push(msg);
                return received;
            }
            _ => received.push(msg),
        }
    }
}

fn count(messages: &[ServerMessage], predicate: impl Fn(&ServerMessage) -> bool) -> usize {
    messages.iter().filter(|msg| predicate(msg)).count()
}

const FLEET: [&str; 5] = [
    "carrier 0 0 0",
    "battleship 1 0 0",
    "cruiser 2 0 0",
    "submarine 3 0 0",
    "destroyer 4 0 0",
];

/// Every cell of the fleet above, row by row: 17 attacks that win a game.
const WINNING_ATTACKS: [&str; 17] = [
    "0 0", "0 1", "0 2", "0 3", "0 4", // carrier
    "1 0", "1 1", "1 2", "1 3", // battleship
    "2 0", "2 1", "2 2", // cruiser
    "3 0", "3 1", "3 2", // submarine
    "4 0", "4 1", // destroyer
];

#[tokio::test]
async fn test_full_match_with_rejections_and_forfeits() {
    let (one_server, one_client) = tokio::io::duplex(64 * 1024);
    let (two_server, two_client) = tokio::io::duplex(64 * 1024);

    // Player One: clean placement; opens with an out-of-bounds attack
    // (rejected, turn kept), later repeats an already-attacked cell
    // (rejected, turn kept), and sinks the whole enemy fleet.
    let mut one_attacks = vec!["99 99"];
    one_attacks.extend(WINNING_ATTACKS);
    one_attacks.insert(6, "0 0"); // already hit by the first carrier attack
    let one = tokio::spawn(scripted_client(one_client, FLEET.to_vec(), one_attacks));

    // Player Two: floods the placement phase with junk first, then makes
    // one malformed attack (turn forfeited) and otherwise only misses.
    let two_placements = vec![
        "hello",          // wrong arity
        "carrier 0 0",    // wrong arity
        "frigate 0 0 0",  // unknown class
        "carrier 0 9 0",  // engine: out of bounds
        FLEET[0],
        FLEET[1],
        FLEET[2],
        FLEET[3],
        FLEET[4],
    ];
    let mut two_attacks = vec!["abc"];
    two_attacks.extend([
        "9 0", "9 1", "9 2", "9 3", "9 4", "9 5", "9 6", "9 7", "9 8", "9 9", //
        "8 0", "8 1", "8 2", "8 3", "8 4",
    ]);
    let two = tokio::spawn(scripted_client(two_client, two_placements, two_attacks));

    let mut session = Session::new(
        one_server,
        two_server,
        (GridBoard::new(), GridBoard::new()),
        SessionConfig {
            first_attacker: Some(PlayerSlot::One),
        },
    );
    let winner = session.run().await.unwrap();
    assert_eq!(winner, PlayerSlot::One);
    assert_eq!(session.phase(), Phase::Ended);

    let one_msgs = one.await.unwrap();
    let two_msgs = two.await.unwrap();

    // Roles are announced exactly once, first connection is slot One.
    assert_eq!(
        one_msgs[0],
        ServerMessage::RoleAssignment {
            slot: PlayerSlot::One
        }
    );
    assert_eq!(
        two_msgs[0],
        ServerMessage::RoleAssignment {
            slot: PlayerSlot::Two
        }
    );

    // Player Two's junk placements were each rejected with a reason and
    // never consumed a placement.
    assert_eq!(count(&two_msgs, |m| matches!(m, ServerMessage::InvalidFormat)), 2);
    assert_eq!(count(&two_msgs, |m| matches!(m, ServerMessage::InvalidPlacement)), 2);
    assert_eq!(
        count(&two_msgs, |m| matches!(m, ServerMessage::PlacementAccepted { .. })),
        5
    );
    assert_eq!(
        count(&one_msgs, |m| matches!(m, ServerMessage::PlacementAccepted { .. })),
        5
    );
    assert_eq!(count(&one_msgs, |m| matches!(m, ServerMessage::PlacementComplete)), 1);
    assert_eq!(count(&two_msgs, |m| matches!(m, ServerMessage::PlacementComplete)), 1);

    // The out-of-bounds and repeated-cell attacks were reported to the
    // attacker alone and did NOT consume the turn: One was prompted 19
    // times for 17 resolved attacks, and Two never saw either rejection.
    assert_eq!(count(&one_msgs, |m| matches!(m, ServerMessage::AttackOutOfBounds)), 1);
    assert_eq!(count(&two_msgs, |m| matches!(m, ServerMessage::AttackOutOfBounds)), 0);
    assert_eq!(count(&one_msgs, |m| matches!(m, ServerMessage::AlreadyAttacked)), 1);
    assert_eq!(count(&two_msgs, |m| matches!(m, ServerMessage::AlreadyAttacked)), 0);
    assert_eq!(count(&one_msgs, |m| matches!(m, ServerMessage::TurnPrompt)), 19);

    // The malformed attack DID consume Two's turn: 16 prompts, 15 resolved.
    assert_eq!(count(&two_msgs, |m| matches!(m, ServerMessage::InvalidInput)), 1);
    assert_eq!(count(&two_msgs, |m| matches!(m, ServerMessage::TurnPrompt)), 16);

    // Every resolved attack produced one notice for both players plus
    // exactly one grid update for each side.
    let resolved = 17 + 15;
    assert_eq!(
        count(&one_msgs, |m| matches!(m, ServerMessage::AttackNotice { .. })),
        resolved
    );
    assert_eq!(
        count(&two_msgs, |m| matches!(m, ServerMessage::AttackNotice { .. })),
        resolved
    );
    assert_eq!(
        count(&one_msgs, |m| matches!(m, ServerMessage::TargetGridUpdate { .. })),
        17
    );
    assert_eq!(
        count(&one_msgs, |m| matches!(m, ServerMessage::SelfGridUpdate { .. })),
        15
    );
    assert_eq!(
        count(&two_msgs, |m| matches!(m, ServerMessage::SelfGridUpdate { .. })),
        17
    );
    assert_eq!(
        count(&two_msgs, |m| matches!(m, ServerMessage::TargetGridUpdate { .. })),
        15
    );

    // Five sink narratives for the attacker, five loss narratives for the
    // defender.
    let sunk_seen_by_one = count(&one_msgs, |m| {
        matches!(m, ServerMessage::TargetGridUpdate { narrative, .. }
            if narrative == "You have taken down an enemy ship!")
    });
    let sunk_seen_by_two = count(&two_msgs, |m| {
        matches!(m, ServerMessage::SelfGridUpdate { narrative, .. }
            if narrative == "Your ship has been taken down!")
    });
    assert_eq!(sunk_seen_by_one, 5);
    assert_eq!(sunk_seen_by_two, 5);

    // Role-specific endgame messages.
    let ServerMessage::GameOver { winner, narrative } = one_msgs.last().unwrap() else {
        panic!("player one did not receive a game-over message");
    };
    assert_eq!(*winner, PlayerSlot::One);
    assert!(narrative.contains("You Win"));

    let ServerMessage::GameOver { winner, narrative } = two_msgs.last().unwrap() else {
        panic!("player two did not receive a game-over message");
    };
    assert_eq!(*winner, PlayerSlot::One);
    assert!(narrative.contains("You Lose"));
}

#[tokio::test]
async fn test_disconnect_abandons_the_match() {
    let (one_server, one_client) = tokio::io::duplex(1024);
    let (two_server, two_client) = tokio::io::duplex(1024);
    drop(one_client);
    drop(two_client);

    let mut session = Session::new(
        one_server,
        two_server,
        (GridBoard::new(), GridBoard::new()),
        SessionConfig::default(),
    );
    let err = session.run().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::ConnectionClosed | SessionError::Io(_)
    ));
}

#[tokio::test]
async fn test_flooding_one_side_never_blocks_the_other() {
    let (one_server, one_client) = tokio::io::duplex(256 * 1024);
    let (two_server, two_client) = tokio::io::duplex(256 * 1024);

    // Player One places cleanly and then wins fast.
    let one = tokio::spawn(scripted_client(
        one_client,
        FLEET.to_vec(),
        WINNING_ATTACKS.to_vec(),
    ));

    // Player Two drowns its own placement loop in garbage before finally
    // cooperating; One's progress must be unaffected.
    let mut two_placements = vec!["junk"; 200];
    two_placements.extend(FLEET);
    let two_attacks = vec![
        "9 0", "9 1", "9 2", "9 3", "9 4", "9 5", "9 6", "9 7", "9 8", "9 9", //
        "8 0", "8 1", "8 2", "8 3", "8 4", "8 5",
    ];
    let two = tokio::spawn(scripted_client(two_client, two_placements, two_attacks));

    let mut session = Session::new(
        one_server,
        two_server,
        (GridBoard::new(), GridBoard::new()),
        SessionConfig {
            first_attacker: Some(PlayerSlot::One),
        },
    );
    let winner = session.run().await.unwrap();
    assert_eq!(winner, PlayerSlot::One);

    let one_msgs = one.await.unwrap();
    let two_msgs = two.await.unwrap();
    assert_eq!(count(&two_msgs, |m| matches!(m, ServerMessage::InvalidFormat)), 200);
    assert_eq!(
        count(&one_msgs, |m| matches!(m, ServerMessage::PlacementAccepted { .. })),
        5
    );
}
