//! # Pitchside
//!
//! A terminal-based admin console for a sports-match listing service
//! backed by PocketBase.
//!
//! ## Features
//! - Superuser login with persisted sessions
//! - Match list with status filtering
//! - Create, edit and delete matches
//! - Score and odds management with validation
//! - Automatic retry on transient network/server failures
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod constants;
pub mod error;
pub mod messages;
pub mod models;
pub mod network;
pub mod storage;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use error::ApiError;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{AuthSession, DraftField, Match, MatchDraft, MatchStatus, User};
pub use network::{NetworkActor, PbClient};
pub use storage::SessionStorage;
