//! Store configuration.

use chrono::Duration;

/// Sessions older than this are removed (one hour).
pub const DEFAULT_RETENTION_SECS: i64 = 3600;

/// Base URL used for invite links when none is configured.
pub const DEFAULT_INVITE_BASE_URL: &str = "https://krestiki-noliki-liard.vercel.app";

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum session age before it is swept
    pub retention: Duration,

    /// Base of the shareable join link, without a trailing slash
    pub invite_base_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            retention: Duration::seconds(DEFAULT_RETENTION_SECS),
            invite_base_url: DEFAULT_INVITE_BASE_URL.to_string(),
        }
    }
}

impl StoreConfig {
    /// Join link handed to the second player.
    pub fn invite_link(&self, game_id: &str) -> String {
        format!(
            "{}/?gameId={}&player=2",
            self.invite_base_url.trim_end_matches('/'),
            game_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retention_is_one_hour() {
        assert_eq!(StoreConfig::default().retention, Duration::hours(1));
    }

    #[test]
    fn test_invite_link_format() {
        let config = StoreConfig {
            invite_base_url: "https://example.test/".to_string(),
            ..StoreConfig::default()
        };
        assert_eq!(
            config.invite_link("game_abc123"),
            "https://example.test/?gameId=game_abc123&player=2"
        );
    }
}
