//! Session lifecycle over a shared in-memory store with loopback
//! publishing: the closest thing to two clients on one relay.

mod common;

use common::{move_event, start_event};
use game_core::{GameOverReason, GameStatus, MovableColor};
use game_session::{
    GameSession, Identity, LoopbackPublisher, MoveRecordStore, SessionPhase, SharedMemoryStore,
    SubmitError,
};

fn player(pubkey: &str) -> Identity {
    Identity {
        pubkey: pubkey.to_string(),
        seckey: format!("sec-{pubkey}"),
    }
}

fn session_for(
    store: &SharedMemoryStore,
    game_id: &str,
    identity: Option<Identity>,
) -> GameSession<LoopbackPublisher> {
    GameSession::new(
        game_id.to_string(),
        identity,
        LoopbackPublisher::new(store.clone()),
    )
}

fn sync(session: &mut GameSession<LoopbackPublisher>, store: &SharedMemoryStore) {
    let game_id = session.game_id().to_string();
    session.on_snapshot(store.get_start(&game_id), &store.get_moves(&game_id));
}

#[test]
fn two_players_alternate_over_loopback() {
    let store = SharedMemoryStore::new();
    store.insert_start(start_event("g1", "white-key", 0));

    let mut white = session_for(&store, "g1", Some(player("white-key")));
    let mut black = session_for(&store, "g1", Some(player("black-key")));
    sync(&mut white, &store);
    sync(&mut black, &store);

    assert_eq!(white.color(), MovableColor::White);
    assert_eq!(black.color(), MovableColor::Black);
    assert_eq!(white.status(), Some(GameStatus::YourTurn));
    assert_eq!(black.status(), Some(GameStatus::WaitingForOpponent));

    let first = white.submit_move("e2", "e4").unwrap();
    sync(&mut white, &store);
    sync(&mut black, &store);
    assert_eq!(white.head_id(), Some(first.id.as_str()));
    assert_eq!(black.head_id(), Some(first.id.as_str()));
    assert_eq!(black.status(), Some(GameStatus::YourTurn));

    let second = black.submit_move("e7", "e5").unwrap();
    assert_eq!(second.parent_move_id.as_deref(), Some(first.id.as_str()));
    sync(&mut white, &store);
    sync(&mut black, &store);

    assert_eq!(white.pgn(), "1. e4 e5");
    assert_eq!(white.pgn(), black.pgn());
    assert_eq!(white.phase(), SessionPhase::HeadSettled);
}

#[test]
fn finished_game_rejects_further_moves() {
    let store = SharedMemoryStore::new();
    store.insert_start(start_event("g1", "white-key", 0));
    // Fool's mate, delivered as relay events.
    store.insert_move(move_event("m1", "g1", None, 1, "f2f3"));
    store.insert_move(move_event("m2", "g1", Some("m1"), 2, "e7e5"));
    store.insert_move(move_event("m3", "g1", Some("m2"), 3, "g2g4"));
    store.insert_move(move_event("m4", "g1", Some("m3"), 4, "d8h4"));

    let mut session = session_for(&store, "g1", Some(player("white-key")));
    sync(&mut session, &store);

    assert_eq!(
        session.status(),
        Some(GameStatus::Over(GameOverReason::BlackWon))
    );
    assert!(matches!(
        session.submit_move("a2", "a3"),
        Err(SubmitError::GameOver)
    ));
}

#[test]
fn searching_head_blocks_submission() {
    let store = SharedMemoryStore::new();
    store.insert_start(start_event("g1", "white-key", 0));
    // The earliest child is garbage, a legal sibling exists: the head parks
    // at the start and keeps searching.
    store.insert_move(move_event("junk", "g1", None, 1, "a1a1"));
    store.insert_move(move_event("legal", "g1", None, 10, "e2e4"));

    let mut session = session_for(&store, "g1", Some(player("white-key")));
    sync(&mut session, &store);

    assert_eq!(session.phase(), SessionPhase::HeadSearching);
    assert_eq!(session.head_id(), Some("g1"));
    assert!(matches!(
        session.submit_move("e2", "e4"),
        Err(SubmitError::HeadSearching)
    ));
}

#[test]
fn spectator_never_submits() {
    let store = SharedMemoryStore::new();
    store.insert_start(start_event("g1", "white-key", 0));

    let mut session = session_for(&store, "g1", None);
    sync(&mut session, &store);

    assert_eq!(session.color(), MovableColor::None);
    assert_eq!(session.status(), Some(GameStatus::WhiteToMove));
    assert!(matches!(
        session.submit_move("e2", "e4"),
        Err(SubmitError::IdentityUnavailable)
    ));
}

#[test]
fn duplicate_deliveries_do_not_disturb_the_head() {
    let store = SharedMemoryStore::new();
    store.insert_start(start_event("g1", "white-key", 0));
    let m1 = move_event("m1", "g1", None, 1, "d2d4");
    store.insert_move(m1.clone());
    store.insert_move(m1.clone());
    store.insert_move(m1);

    let mut session = session_for(&store, "g1", None);
    sync(&mut session, &store);
    sync(&mut session, &store);

    assert_eq!(session.head_id(), Some("m1"));
    assert_eq!(session.pgn(), "1. d4");
    assert_eq!(session.phase(), SessionPhase::HeadSettled);
}
