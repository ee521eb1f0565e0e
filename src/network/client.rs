//! PocketBase client - collection auth and record CRUD over REST

use serde::Deserialize;

use crate::constants::{ADMIN_COLLECTION, LIST_PAGE_SIZE, MATCH_COLLECTION};
use crate::error::ApiError;
use crate::models::{AuthSession, Match, MatchStatus, User};

/// Thin wrapper over the PocketBase collection REST API.
///
/// Stateless with regard to auth: the token travels with each call, so a
/// cloned client can be moved into spawned tasks freely.
#[derive(Clone)]
pub struct PbClient {
    http: reqwest::Client,
    base_url: String,
}

/// Wire shape of the password-auth and auth-refresh responses
#[derive(Deserialize)]
struct AuthPayload {
    token: String,
    record: User,
}

/// Wire shape of a record list page
#[derive(Deserialize)]
struct RecordPage {
    page: u32,
    #[serde(rename = "totalPages")]
    total_pages: u32,
    items: Vec<Match>,
}

/// Wire shape of a PocketBase error body
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl PbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        PbClient {
            http: create_client(),
            base_url: base_url.into(),
        }
    }

    fn collection_url(&self, collection: &str, tail: &str) -> String {
        format!(
            "{}/api/collections/{}/{}",
            self.base_url.trim_end_matches('/'),
            collection,
            tail
        )
    }

    /// POST `auth-with-password` against the admin collection
    pub async fn auth_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        let url = self.collection_url(ADMIN_COLLECTION, "auth-with-password");
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "identity": email, "password": password }))
            .send()
            .await?;
        let payload: AuthPayload = read_json(resp).await?;
        Ok(AuthSession {
            token: payload.token,
            user: payload.record,
        })
    }

    /// POST `auth-refresh` to validate a persisted token and rotate it
    pub async fn auth_refresh(&self, token: &str) -> Result<AuthSession, ApiError> {
        let url = self.collection_url(ADMIN_COLLECTION, "auth-refresh");
        let resp = self
            .http
            .post(&url)
            .header("Authorization", token)
            .send()
            .await?;
        let payload: AuthPayload = read_json(resp).await?;
        Ok(AuthSession {
            token: payload.token,
            user: payload.record,
        })
    }

    /// Fetch every match record, newest kickoff first, optionally filtered
    /// server-side by status. Walks `totalPages` until the list is complete.
    pub async fn list_matches(
        &self,
        token: &str,
        filter: Option<MatchStatus>,
    ) -> Result<Vec<Match>, ApiError> {
        let url = self.collection_url(MATCH_COLLECTION, "records");
        let mut matches = Vec::new();
        let mut page = 1u32;

        loop {
            let mut req = self
                .http
                .get(&url)
                .header("Authorization", token)
                .query(&[("page", page.to_string())])
                .query(&[("perPage", LIST_PAGE_SIZE.to_string())])
                .query(&[("sort", "-starts_at")]);
            if let Some(status) = filter {
                req = req.query(&[("filter", status_filter_expr(status))]);
            }

            let resp = req.send().await?;
            let body: RecordPage = read_json(resp).await?;
            matches.extend(body.items);

            if body.page >= body.total_pages {
                break;
            }
            page += 1;
        }

        Ok(matches)
    }

    pub async fn create_match(
        &self,
        token: &str,
        payload: &serde_json::Value,
    ) -> Result<Match, ApiError> {
        let url = self.collection_url(MATCH_COLLECTION, "records");
        let resp = self
            .http
            .post(&url)
            .header("Authorization", token)
            .json(payload)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn update_match(
        &self,
        token: &str,
        record_id: &str,
        payload: &serde_json::Value,
    ) -> Result<Match, ApiError> {
        let url = self.collection_url(MATCH_COLLECTION, &format!("records/{}", record_id));
        let resp = self
            .http
            .patch(&url)
            .header("Authorization", token)
            .json(payload)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn delete_match(&self, token: &str, record_id: &str) -> Result<(), ApiError> {
        let url = self.collection_url(MATCH_COLLECTION, &format!("records/{}", record_id));
        let resp = self
            .http
            .delete(&url)
            .header("Authorization", token)
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(read_error(resp).await)
        }
    }
}

/// PocketBase filter expression for a status
pub fn status_filter_expr(status: MatchStatus) -> String {
    format!("(status='{}')", status.as_str())
}

/// Decode a success body or classify the error response
async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    if !resp.status().is_success() {
        return Err(read_error(resp).await);
    }
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Network(format!("malformed response: {}", e)))
}

async fn read_error(resp: reqwest::Response) -> ApiError {
    let status = resp.status().as_u16();
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) if !body.message.is_empty() => body.message,
        _ => format!("request failed with status {}", status),
    };
    ApiError::from_status(status, message)
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    use std::time::Duration;

    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_expr() {
        assert_eq!(status_filter_expr(MatchStatus::Live), "(status='live')");
        assert_eq!(
            status_filter_expr(MatchStatus::Cancelled),
            "(status='cancelled')"
        );
    }

    #[test]
    fn test_collection_url_strips_trailing_slash() {
        let client = PbClient::new("http://localhost:8090/");
        assert_eq!(
            client.collection_url("matches", "records"),
            "http://localhost:8090/api/collections/matches/records"
        );
        assert_eq!(
            client.collection_url("_superusers", "auth-with-password"),
            "http://localhost:8090/api/collections/_superusers/auth-with-password"
        );
    }

    #[test]
    fn test_record_page_deserializes() {
        let page: RecordPage = serde_json::from_str(
            r#"{
                "page": 1,
                "perPage": 200,
                "totalPages": 1,
                "totalItems": 1,
                "items": [{
                    "id": "m1",
                    "league": "Bundesliga",
                    "tour": 5,
                    "home_team": "Bayern",
                    "away_team": "Dortmund",
                    "starts_at": "2025-02-11 19:30:00.000Z",
                    "status": "live",
                    "home_score": 1,
                    "away_score": 0
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].home_team, "Bayern");
    }
}
