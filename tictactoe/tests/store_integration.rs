//! Integration tests for the session store.
//!
//! Covers full game flows, the new-round negotiation, lazy expiry and
//! concurrent moves against the same game.

use chrono::Duration;
use std::sync::Arc;
use tictactoe::{
    GameError, GameStore, InvalidStateKind, Outcome, ResetAction, ResetStatus, StoreConfig,
    Symbol,
};

fn store() -> GameStore {
    GameStore::new(StoreConfig::default())
}

async fn started_game(store: &GameStore) -> String {
    let created = store.create_game("alice", Some("Alice")).await;
    store
        .join_game(&created.game_id, "bob", Some("Bob"))
        .await
        .unwrap();
    created.game_id
}

// ============================================================================
// Game Flow Tests
// ============================================================================

#[tokio::test]
async fn test_column_win_end_to_end() {
    let store = store();
    let created = store.create_game("A", None).await;
    let joined = store.join_game(&created.game_id, "B", None).await.unwrap();
    assert!(joined.game_active);
    assert_eq!(joined.current_player, Symbol::X);

    store.make_move(&created.game_id, "A", 4).await.unwrap();
    store.make_move(&created.game_id, "B", 0).await.unwrap();
    store.make_move(&created.game_id, "A", 1).await.unwrap();
    store.make_move(&created.game_id, "B", 3).await.unwrap();
    let last = store.make_move(&created.game_id, "A", 7).await.unwrap();

    assert_eq!(last.winner, Some(Outcome::Won(Symbol::X)));
    assert!(!last.game_active);
    assert_eq!(last.last_move.unwrap().cell_index, 7);
}

#[tokio::test]
async fn test_second_join_reports_full_game() {
    let store = store();
    let game_id = started_game(&store).await;

    let err = store.join_game(&game_id, "carol", None).await.unwrap_err();
    assert_eq!(err, GameError::InvalidState(InvalidStateKind::GameFull));
}

#[tokio::test]
async fn test_double_move_is_not_your_turn() {
    let store = store();
    let game_id = started_game(&store).await;

    store.make_move(&game_id, "alice", 0).await.unwrap();
    let err = store.make_move(&game_id, "alice", 1).await.unwrap_err();
    assert_eq!(err, GameError::InvalidState(InvalidStateKind::NotYourTurn));
}

#[tokio::test]
async fn test_finished_game_stays_queryable() {
    let store = store();
    let game_id = started_game(&store).await;

    for (user, cell) in [("alice", 0), ("bob", 3), ("alice", 1), ("bob", 4), ("alice", 2)] {
        store.make_move(&game_id, user, cell).await.unwrap();
    }

    let snapshot = store.game_state(&game_id, Some("bob")).await.unwrap();
    assert_eq!(snapshot.winner, Some(Outcome::Won(Symbol::X)));
    assert!(!snapshot.game_active);
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let store = store();
    let game_id = started_game(&store).await;
    store.make_move(&game_id, "alice", 8).await.unwrap();

    let first = store.game_state(&game_id, Some("alice")).await.unwrap();
    let second = store.game_state(&game_id, Some("alice")).await.unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Reset Negotiation Tests
// ============================================================================

#[tokio::test]
async fn test_request_then_reject_then_accept_fails() {
    let store = store();
    let game_id = started_game(&store).await;
    store.make_move(&game_id, "alice", 4).await.unwrap();

    store.reset_game(&game_id, "alice", "request").await.unwrap();
    let rejected = store.reset_game(&game_id, "bob", "REJECT").await.unwrap();

    let pending = rejected.pending_reset.unwrap();
    assert_eq!(pending.status, ResetStatus::Rejected);
    assert_eq!(pending.rejected_by.as_deref(), Some("bob"));
    assert_eq!(pending.requested_by, "alice");
    assert_eq!(rejected.board.get(4).and_then(|c| c.symbol()), Some(Symbol::X));
    assert!(rejected.winner.is_none());

    let err = store.reset_game(&game_id, "bob", "accept").await.unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidState(InvalidStateKind::NoPendingReset(ResetAction::Accept))
    );
}

#[tokio::test]
async fn test_accepted_reset_starts_fresh_round() {
    let store = store();
    let game_id = started_game(&store).await;

    for (user, cell) in [("alice", 0), ("bob", 3), ("alice", 1), ("bob", 4), ("alice", 2)] {
        store.make_move(&game_id, user, cell).await.unwrap();
    }

    store.reset_game(&game_id, "bob", "request").await.unwrap();
    let fresh = store.reset_game(&game_id, "alice", "accept").await.unwrap();

    assert!(fresh.game_active);
    assert!(fresh.winner.is_none());
    assert!(fresh.last_move.is_none());
    assert!(fresh.pending_reset.is_none());
    assert_eq!(fresh.current_player, Symbol::X);
    assert!(fresh.board.cells().iter().all(|cell| cell.is_empty()));

    // Players and symbols carry over into the new round
    store.make_move(&game_id, "alice", 4).await.unwrap();
}

#[tokio::test]
async fn test_reset_can_be_requested_mid_game() {
    let store = store();
    let game_id = started_game(&store).await;
    store.make_move(&game_id, "alice", 0).await.unwrap();

    let snapshot = store.reset_game(&game_id, "alice", "request").await.unwrap();
    assert!(snapshot.game_active);
    assert_eq!(
        snapshot.pending_reset.unwrap().status,
        ResetStatus::Requested
    );
}

// ============================================================================
// Expiry Tests
// ============================================================================

#[tokio::test]
async fn test_expired_game_is_swept_by_any_request() {
    let store = GameStore::new(StoreConfig {
        retention: Duration::milliseconds(20),
        ..StoreConfig::default()
    });
    let old = store.create_game("alice", None).await;

    tokio::time::sleep(std::time::Duration::from_millis(60)).await;

    // Touching a different game id still sweeps the old one
    let err = store.game_state("game_other", None).await.unwrap_err();
    assert_eq!(err, GameError::NotFound);
    assert_eq!(store.game_count().await, 0);

    let err = store.join_game(&old.game_id, "bob", None).await.unwrap_err();
    assert_eq!(err, GameError::NotFound);
}

#[tokio::test]
async fn test_fresh_games_survive_sweep() {
    let store = store();
    let game_id = started_game(&store).await;

    store.create_game("carol", None).await;
    assert_eq!(store.game_count().await, 2);
    assert!(store.game_state(&game_id, None).await.is_ok());
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_on_one_game_apply_once() {
    let store = Arc::new(store());
    let game_id = started_game(&store).await;

    let mut handles = Vec::new();
    for cell in 0..9 {
        let store = store.clone();
        let game_id = game_id.clone();
        handles.push(tokio::spawn(async move {
            store.make_move(&game_id, "alice", cell).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => {
                assert_eq!(err, GameError::InvalidState(InvalidStateKind::NotYourTurn))
            }
        }
    }

    assert_eq!(successes, 1);
    let snapshot = store.game_state(&game_id, None).await.unwrap();
    assert_eq!(snapshot.current_player, Symbol::O);
    assert_eq!(
        snapshot
            .board
            .cells()
            .iter()
            .filter(|cell| !cell.is_empty())
            .count(),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_seat_exactly_one_player() {
    let store = Arc::new(store());
    let created = store.create_game("alice", None).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        let game_id = created.game_id.clone();
        handles.push(tokio::spawn(async move {
            store.join_game(&game_id, &format!("guest{i}"), None).await
        }));
    }

    let mut joined = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            joined += 1;
        }
    }
    assert_eq!(joined, 1);
}
