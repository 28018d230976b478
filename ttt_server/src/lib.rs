//! HTTP server for two-player tic-tac-toe sessions.
//!
//! Wraps the [`tictactoe`] session store in a JSON API consumed by the web
//! client and the Telegram mini app.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
