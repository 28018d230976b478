//! Retention-window expiry.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use super::GameId;
use crate::game::GameSession;

/// Anything that records when it was created.
pub trait Expiring {
    fn created_at(&self) -> DateTime<Utc>;
}

impl Expiring for GameSession {
    fn created_at(&self) -> DateTime<Utc> {
        GameSession::created_at(self)
    }
}

/// True when a session created at `created_at` has outlived `retention`.
pub fn is_expired(created_at: DateTime<Utc>, now: DateTime<Utc>, retention: Duration) -> bool {
    now - created_at > retention
}

/// Returns the sessions still inside the retention window at `now`.
///
/// Active games are dropped like any other; age is the only criterion.
pub fn sweep<S: Expiring>(
    mut sessions: HashMap<GameId, S>,
    now: DateTime<Utc>,
    retention: Duration,
) -> HashMap<GameId, S> {
    sessions.retain(|_, session| !is_expired(session.created_at(), now, retention));
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_aged(id: &str, now: DateTime<Utc>, age: Duration) -> (GameId, GameSession) {
        let mut session = GameSession::new(id.to_string(), "alice", None, now - age);
        session.join("bob", None).unwrap();
        (id.to_string(), session)
    }

    #[test]
    fn test_is_expired_boundary() {
        let now = Utc::now();
        let retention = Duration::hours(1);

        assert!(!is_expired(now - Duration::minutes(59), now, retention));
        assert!(!is_expired(now - retention, now, retention));
        assert!(is_expired(now - Duration::minutes(61), now, retention));
    }

    #[test]
    fn test_sweep_drops_only_old_sessions() {
        let now = Utc::now();
        let sessions: HashMap<_, _> = [
            session_aged("game_fresh", now, Duration::minutes(5)),
            session_aged("game_stale", now, Duration::hours(2)),
            session_aged("game_edge", now, Duration::minutes(60)),
        ]
        .into_iter()
        .collect();

        let retained = sweep(sessions, now, Duration::hours(1));

        assert_eq!(retained.len(), 2);
        assert!(retained.contains_key("game_fresh"));
        assert!(retained.contains_key("game_edge"));
        assert!(!retained.contains_key("game_stale"));
    }

    #[test]
    fn test_sweep_removes_active_games() {
        let now = Utc::now();
        let (id, session) = session_aged("game_active", now, Duration::hours(3));
        assert!(session.is_active());

        let retained = sweep(HashMap::from([(id, session)]), now, Duration::hours(1));
        assert!(retained.is_empty());
    }
}
