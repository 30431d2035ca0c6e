use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, info, warn};
use match_api::MatchRecord;
use match_api::client::{ApiError, MatchApi, MatchQuery};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Serves requests one at a time, so at most one HTTP call is ever outstanding.
pub struct NetworkWorker {
    client: MatchApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: MatchApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let response = match request {
                NetworkRequest::FetchMatches { request_id, base_url, query } => {
                    match self.handle_fetch_matches(&base_url, &query).await {
                        Ok(matches) => NetworkResponse::MatchesLoaded { request_id, matches },
                        Err(err) => {
                            if let Some(status) = err.status() {
                                warn!("server answered {status} for request {request_id}");
                            }
                            NetworkResponse::FetchFailed { request_id, message: err.to_string() }
                        }
                    }
                }
            };

            debug!("network request complete");
            let is_ok = !matches!(response, NetworkResponse::FetchFailed { .. });
            self.stop_loading_animation(is_ok).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_fetch_matches(
        &self,
        base_url: &str,
        query: &MatchQuery,
    ) -> Result<Vec<MatchRecord>, ApiError> {
        match query.url(base_url) {
            Ok(url) => info!("Fetching data from: {url}"),
            Err(_) => info!("Fetching data from: {base_url}"),
        }
        let matches = self.client.fetch_matches(base_url, query).await?;
        debug!("fetched {} matches", matches.len());
        Ok(matches)
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
