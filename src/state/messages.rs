use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use match_api::MatchRecord;
use match_api::client::MatchQuery;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// `request_id` is echoed back so the UI can drop stale results.
    FetchMatches {
        request_id: u64,
        base_url: String,
        query: MatchQuery,
    },
}

impl NetworkRequest {
    pub fn request_id(&self) -> u64 {
        match self {
            NetworkRequest::FetchMatches { request_id, .. } => *request_id,
        }
    }
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    MatchesLoaded { request_id: u64, matches: Vec<MatchRecord> },
    FetchFailed { request_id: u64, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
