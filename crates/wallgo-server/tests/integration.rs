//! Integration tests for the room layer.
//!
//! Drives full sessions through `RoomManager` the way the network loop does:
//! join, placement, turns, wall building, and the end of the game.

use wallgo_core::{EndRule, GameConfig};
use wallgo_protocol::{Intent, Outcome, Phase, PlayerId, Square, WallSlot};
use wallgo_server::{
    protocol::{
        deserialize_client_message, deserialize_server_message, serialize_client_message,
        serialize_server_message, ClientMessage, ServerMessage,
    },
    JoinError, RoomManager, SubmitOutcome,
};

const ALICE: u64 = 100;
const BOB: u64 = 101;

fn three_by_three() -> RoomManager {
    RoomManager::new(GameConfig {
        size: 3,
        pieces_per_player: 2,
        moves_per_turn: 2,
        end_rule: EndRule::ReachableShortfall,
    })
}

fn seated_room(seed: u64) -> RoomManager {
    let mut rooms = three_by_three();
    assert!(!rooms.join(ALICE, "table", "Alice".into(), seed).unwrap().started);
    assert!(rooms.join(BOB, "table", "Bob".into(), seed).unwrap().started);
    rooms
}

fn submit(rooms: &mut RoomManager, client: u64, intent: Intent) -> SubmitOutcome {
    rooms.submit_intent(client, intent).unwrap()
}

fn place(rooms: &mut RoomManager, client: u64, row: i8, col: i8) -> SubmitOutcome {
    submit(
        rooms,
        client,
        Intent::PlacePiece {
            at: Square::new(row, col),
        },
    )
}

fn step(rooms: &mut RoomManager, client: u64, from: (i8, i8), to: (i8, i8)) -> SubmitOutcome {
    submit(
        rooms,
        client,
        Intent::MovePiece {
            from: Square::new(from.0, from.1),
            to: Square::new(to.0, to.1),
        },
    )
}

/// Map the engine's randomly drawn first mover onto client ids.
fn turn_order(rooms: &RoomManager) -> (u64, u64) {
    let (snapshot, _) = rooms.state_for(ALICE).unwrap();
    match snapshot.current_player {
        PlayerId(0) => (ALICE, BOB),
        _ => (BOB, ALICE),
    }
}

#[test]
fn room_capacity_is_two() {
    let mut rooms = seated_room(1);
    assert_eq!(
        rooms.join(102, "table", "Charlie".into(), 1),
        Err(JoinError::RoomFull)
    );
}

#[test]
fn full_game_to_the_end_through_the_room_layer() {
    let mut rooms = seated_room(7);
    let (first, second) = turn_order(&rooms);

    // Placement, strictly alternating. The corner (0,0) stays empty.
    place(&mut rooms, first, 0, 1);
    place(&mut rooms, second, 2, 2);
    place(&mut rooms, first, 1, 0);
    let out = place(&mut rooms, second, 2, 0);
    assert_eq!(out.snapshot.phase, Phase::Move);

    // Three turns; the last wall seals the empty corner and ends the game.
    let turns = [
        (first, (0, 1), (1, 1), WallSlot::vertical(0, 0)),
        (second, (2, 2), (1, 2), WallSlot::horizontal(1, 2)),
        (first, (1, 0), (1, 1), WallSlot::horizontal(0, 0)),
    ];
    let mut last = None;
    for (client, home, via, slot) in turns {
        step(&mut rooms, client, home, via);
        step(&mut rooms, client, via, home);
        last = Some(submit(&mut rooms, client, Intent::PlaceWall { slot }));
    }

    let end = last.unwrap();
    assert_eq!(end.snapshot.phase, Phase::End);
    // Both pieces of each player share the surviving region: a draw.
    assert_eq!(end.outcome, Some(Outcome::Draw));
    assert_eq!(end.snapshot.walls.len(), 3);
    assert_ne!(end.checksum, 0);

    // The finished game accepts nothing further.
    let err = rooms
        .submit_intent(
            second,
            Intent::MovePiece {
                from: Square::new(2, 2),
                to: Square::new(2, 1),
            },
        )
        .unwrap_err();
    assert!(err.to_string().contains("over"));
}

#[test]
fn rejected_intents_do_not_change_the_broadcast_state() {
    let mut rooms = seated_room(3);
    let (first, second) = turn_order(&rooms);

    place(&mut rooms, first, 0, 0);
    let before = rooms.state_for(ALICE).unwrap();

    // Occupied square.
    assert!(rooms
        .submit_intent(
            second,
            Intent::PlacePiece {
                at: Square::new(0, 0)
            }
        )
        .is_err());
    // Out of turn.
    assert!(rooms
        .submit_intent(
            first,
            Intent::PlacePiece {
                at: Square::new(1, 1)
            }
        )
        .is_err());

    assert_eq!(rooms.state_for(ALICE).unwrap(), before);
}

#[test]
fn disconnect_resets_the_room_mid_game() {
    let mut rooms = seated_room(5);
    let (first, _) = turn_order(&rooms);
    place(&mut rooms, first, 0, 0);

    let left = rooms.leave(BOB).unwrap();
    assert_eq!(left.remaining_client, Some(ALICE));
    assert!(left.game_discarded);

    // Survivor waits; the half-played game is gone.
    let (snapshot, _) = rooms.state_for(ALICE).unwrap();
    assert_eq!(snapshot.phase, Phase::Waiting);
    assert!(snapshot.board.iter().all(Option::is_none));

    // A new opponent starts a brand new game.
    assert!(rooms.join(102, "table", "Carol".into(), 9).unwrap().started);
    let (snapshot, _) = rooms.state_for(ALICE).unwrap();
    assert_eq!(snapshot.phase, Phase::Placement);
}

#[test]
fn message_serialization_roundtrip() {
    let join_msg = ClientMessage::JoinRoom {
        room: "table".into(),
        player_name: "Alice".into(),
    };
    let data = serialize_client_message(&join_msg).unwrap();
    match deserialize_client_message(&data).unwrap() {
        ClientMessage::JoinRoom { room, player_name } => {
            assert_eq!(room, "table");
            assert_eq!(player_name, "Alice");
        }
        _ => panic!("Wrong message type"),
    }

    // A live snapshot survives the server message framing.
    let mut rooms = seated_room(2);
    let (first, _) = turn_order(&rooms);
    let out = place(&mut rooms, first, 1, 1);

    let msg = ServerMessage::GameState {
        snapshot: out.snapshot.clone(),
        checksum: out.checksum,
    };
    let data = serialize_server_message(&msg).unwrap();
    match deserialize_server_message(&data).unwrap() {
        ServerMessage::GameState { snapshot, checksum } => {
            assert_eq!(snapshot, out.snapshot);
            assert_eq!(checksum, out.checksum);
        }
        _ => panic!("Wrong message type"),
    }
}
