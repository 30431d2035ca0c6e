use crate::components::event_popup::EventPopup;
use crate::components::match_tree::{TreeRow, build_match_tree};
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Focus, PopupState};
use crate::state::messages::NetworkRequest;
use chrono::{Local, Utc};
use log::{debug, error, info, warn};
use match_api::MatchRecord;

pub const FETCH_FAILED_ALERT: &str = "Failed to fetch matches. Check the logs for details.";

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self {
            state: AppState::new(&settings),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Fetch lifecycle
    // -----------------------------------------------------------------------

    /// Build the next request from the form, or `None` if one is already
    /// running or there is nowhere to send it.
    pub fn begin_fetch(&mut self) -> Option<NetworkRequest> {
        let base_url = self.state.form.base_url.trim().to_string();
        if base_url.is_empty() {
            warn!("fetch requested without a base URL");
            self.state.status_message = Some("Enter a base URL first".to_string());
            return None;
        }

        let Some(request_id) = self.state.fetch.begin() else {
            warn!(
                "fetch {:?} still running, ignoring new request",
                self.state.fetch.in_flight()
            );
            self.state.status_message = Some("A fetch is already running".to_string());
            return None;
        };

        self.state.form.editing = false;
        self.state.status_message = Some("Fetching matches...".to_string());
        Some(NetworkRequest::FetchMatches {
            request_id,
            base_url,
            query: self.state.form.query.clone(),
        })
    }

    pub fn on_matches_loaded(&mut self, request_id: u64, matches: Vec<MatchRecord>) {
        if !self.state.fetch.finish(request_id) {
            debug!("dropping stale response for request {request_id}");
            return;
        }

        let count = matches.len();
        info!("loaded {count} matches");
        let tree = build_match_tree(matches, Utc::now(), &Local);

        self.state.popup = None;
        self.state.alert = None;
        self.state.tree.load(tree);
        self.state.status_message = Some(match count {
            0 => "No matches found".to_string(),
            1 => "Loaded 1 match".to_string(),
            n => format!("Loaded {n} matches"),
        });
        if count > 0 {
            self.state.focus = Focus::Tree;
        }
    }

    /// Every failure kind ends up as the same alert; the detail goes to the log.
    pub fn on_fetch_failed(&mut self, request_id: u64, message: String) {
        if !self.state.fetch.finish(request_id) {
            debug!("dropping stale failure for request {request_id}: {message}");
            return;
        }

        error!("Error fetching matches: {message}");
        self.state.alert = Some(FETCH_FAILED_ALERT.to_string());
        self.state.status_message = None;
    }

    // -----------------------------------------------------------------------
    // Tree navigation
    // -----------------------------------------------------------------------

    /// Enter on a matchday header toggles it; Enter on a finished match opens its events.
    pub fn activate_selected(&mut self) {
        enum Action {
            Toggle(usize),
            Open(Box<EventPopup>),
            NotFinished,
        }

        let action = match self.state.tree.selected_row() {
            Some(TreeRow::Matchday(matchday)) => Action::Toggle(matchday.id),
            Some(TreeRow::Match(leaf)) if leaf.is_selectable() => {
                Action::Open(Box::new(EventPopup::from_match(&leaf.record)))
            }
            Some(TreeRow::Match(_)) => Action::NotFinished,
            _ => return,
        };

        match action {
            Action::Toggle(id) => {
                if let Some(tree) = self.state.tree.tree.as_mut()
                    && let Some(expanded) = tree.toggle_matchday(id)
                {
                    debug!("matchday {id} expanded={expanded}");
                }
                self.state.tree.clamp_cursor();
            }
            Action::Open(popup) => {
                self.open_popup(*popup);
            }
            Action::NotFinished => {
                self.state.status_message =
                    Some("Match events are available once a match is finished".to_string());
            }
        }
    }

    pub fn set_all_expanded(&mut self, expanded: bool) {
        if let Some(tree) = self.state.tree.tree.as_mut() {
            tree.set_all_expanded(expanded);
        }
        self.state.tree.clamp_cursor();
    }

    // -----------------------------------------------------------------------
    // Overlays
    // -----------------------------------------------------------------------

    /// Returns false if a popup is already showing.
    pub fn open_popup(&mut self, popup: EventPopup) -> bool {
        if self.state.popup.is_some() {
            return false;
        }
        debug!("opening events for match {}", popup.match_id);
        self.state.popup = Some(PopupState { popup, scroll_offset: 0 });
        true
    }

    pub fn close_popup(&mut self) {
        self.state.popup = None;
    }

    /// Scroll by one line, never past the last line of the popup.
    pub fn scroll_popup(&mut self, down: bool) {
        if let Some(popup) = self.state.popup.as_mut() {
            let max_offset =
                u16::try_from(popup.popup.line_count().saturating_sub(1)).unwrap_or(u16::MAX);
            popup.scroll_offset = if down {
                popup.scroll_offset.saturating_add(1).min(max_offset)
            } else {
                popup.scroll_offset.saturating_sub(1)
            };
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.state.alert = None;
    }

    // -----------------------------------------------------------------------
    // Form + layout toggles
    // -----------------------------------------------------------------------

    pub fn toggle_focus(&mut self) {
        self.state.form.editing = false;
        self.state.focus = self.state.focus.toggle();
    }

    pub fn start_editing(&mut self) {
        self.state.focus = Focus::Form;
        self.state.form.editing = true;
    }

    pub fn stop_editing(&mut self) {
        self.state.form.editing = false;
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}
