//! Network actor - executes PocketBase calls in the Tokio runtime
//!
//! Commands are spawned as independent tasks; list fetches carry the bounded
//! retry loop keyed on error classification.

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::constants::MAX_FETCH_ATTEMPTS;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::MatchStatus;
use crate::network::client::PbClient;

/// Network actor that processes backend commands
pub struct NetworkActor {
    client: PbClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_tasks: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: PbClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_tasks: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Login { id, email, password }) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_tasks.spawn(async move {
                                tracing::info!(id, %email, "Authenticating");
                                let result = client.auth_with_password(&email, &password).await;
                                let response = match result {
                                    Ok(session) => NetworkResponse::SessionEstablished { id, session },
                                    Err(error) => {
                                        tracing::warn!(id, %error, "Login failed");
                                        NetworkResponse::Failed { id, error }
                                    }
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::RestoreSession { id, token }) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_tasks.spawn(async move {
                                tracing::info!(id, "Validating persisted session");
                                let response = match client.auth_refresh(&token).await {
                                    Ok(session) => NetworkResponse::SessionEstablished { id, session },
                                    Err(error) => {
                                        tracing::warn!(id, %error, "Session restore failed");
                                        NetworkResponse::Failed { id, error }
                                    }
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::FetchMatches { id, token, filter }) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_tasks.spawn(async move {
                                fetch_with_retry(&client, &token, filter, id, response_tx).await;
                            });
                        }

                        Some(NetworkCommand::CreateMatch { id, token, payload }) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_tasks.spawn(async move {
                                tracing::info!(id, "Creating match record");
                                let response = match client.create_match(&token, &payload).await {
                                    Ok(record) => NetworkResponse::MatchSaved { id, record },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::UpdateMatch { id, token, record_id, payload }) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_tasks.spawn(async move {
                                tracing::info!(id, %record_id, "Updating match record");
                                let response = match client.update_match(&token, &record_id, &payload).await {
                                    Ok(record) => NetworkResponse::MatchSaved { id, record },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::DeleteMatch { id, token, record_id }) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_tasks.spawn(async move {
                                tracing::info!(id, %record_id, "Deleting match record");
                                let response = match client.delete_match(&token, &record_id).await {
                                    Ok(()) => NetworkResponse::MatchDeleted { id, record_id },
                                    Err(error) => NetworkResponse::Failed { id, error },
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_tasks.join_next() => {}
            }
        }
    }
}

/// Fetch the match list with bounded, classification-gated retries.
///
/// Network errors wait `2000ms * attempt`, server errors `1000ms * attempt`;
/// auth and client errors surface immediately.
async fn fetch_with_retry(
    client: &PbClient,
    token: &str,
    filter: Option<MatchStatus>,
    id: u64,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
) {
    let mut attempt = 1u32;
    loop {
        tracing::info!(id, attempt, "Fetching match list");
        match client.list_matches(token, filter).await {
            Ok(matches) => {
                tracing::info!(id, count = matches.len(), "Match list loaded");
                let _ = response_tx.send(NetworkResponse::Matches { id, matches });
                return;
            }
            Err(error) => {
                if attempt < MAX_FETCH_ATTEMPTS && error.is_retryable() {
                    let delay = error.retry_delay(attempt);
                    tracing::warn!(
                        id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "Fetch failed, retrying"
                    );
                    let _ = response_tx.send(NetworkResponse::FetchRetrying {
                        id,
                        attempt,
                        max_attempts: MAX_FETCH_ATTEMPTS,
                        delay_ms: delay.as_millis() as u64,
                    });
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                } else {
                    tracing::error!(id, attempt, %error, "Fetch failed terminally");
                    let _ = response_tx.send(NetworkResponse::Failed { id, error });
                    return;
                }
            }
        }
    }
}
