//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default PocketBase server URL, overridable via `PITCHSIDE_SERVER_URL`
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8090";

/// Environment variable for the server base URL
pub const SERVER_URL_ENV: &str = "PITCHSIDE_SERVER_URL";

/// PocketBase collection holding admin accounts
pub const ADMIN_COLLECTION: &str = "_superusers";

/// PocketBase collection holding match records
pub const MATCH_COLLECTION: &str = "matches";

/// Page size used when walking the record list
pub const LIST_PAGE_SIZE: u32 = 200;

/// Maximum attempts for the match list fetch
pub const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "Pitchside";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve the server base URL from the environment, falling back to the default
pub fn server_url() -> String {
    std::env::var(SERVER_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}
