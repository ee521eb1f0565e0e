//! Network messages - communication between App and Network layers

use crate::error::ApiError;
use crate::models::{AuthSession, Match, MatchStatus};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Authenticate with email and password
    Login {
        id: u64,
        email: String,
        password: String,
    },
    /// Validate a persisted token and refresh it
    RestoreSession { id: u64, token: String },
    /// Fetch the match list, optionally filtered server-side by status
    FetchMatches {
        id: u64,
        token: String,
        filter: Option<MatchStatus>,
    },
    /// Create a new match record
    CreateMatch {
        id: u64,
        token: String,
        payload: serde_json::Value,
    },
    /// Update an existing match record
    UpdateMatch {
        id: u64,
        token: String,
        record_id: String,
        payload: serde_json::Value,
    },
    /// Delete a match record
    DeleteMatch {
        id: u64,
        token: String,
        record_id: String,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Login or session restore succeeded
    SessionEstablished { id: u64, session: AuthSession },
    /// Match list fetched
    Matches { id: u64, matches: Vec<Match> },
    /// A fetch attempt failed with a retryable error; another attempt is scheduled
    FetchRetrying {
        id: u64,
        attempt: u32,
        max_attempts: u32,
        delay_ms: u64,
    },
    /// A record was created or updated; carries the server's accepted state
    MatchSaved { id: u64, record: Match },
    /// A record was deleted
    MatchDeleted { id: u64, record_id: String },
    /// The operation failed terminally
    Failed { id: u64, error: ApiError },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::SessionEstablished { id, .. } => *id,
            NetworkResponse::Matches { id, .. } => *id,
            NetworkResponse::FetchRetrying { id, .. } => *id,
            NetworkResponse::MatchSaved { id, .. } => *id,
            NetworkResponse::MatchDeleted { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
        }
    }

    /// Check if this is a terminal response (no more messages expected for this id)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NetworkResponse::FetchRetrying { .. })
    }
}
