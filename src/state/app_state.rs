use crate::components::event_popup::EventPopup;
use crate::components::match_tree::{MatchTree, TreeRow};
use crate::state::app_settings::AppSettings;
use chrono::{DateTime, Local};
use match_api::client::MatchQuery;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Form,
    Tree,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Form => Focus::Tree,
            Focus::Tree => Focus::Form,
        }
    }
}

// ---------------------------------------------------------------------------
// Query form
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    BaseUrl,
    CompetitionId,
    FromDate,
    ToDate,
    SeasonYear,
    UtcOffset,
    Offset,
    Limit,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::BaseUrl,
        FormField::CompetitionId,
        FormField::FromDate,
        FormField::ToDate,
        FormField::SeasonYear,
        FormField::UtcOffset,
        FormField::Offset,
        FormField::Limit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::BaseUrl => "Base URL",
            FormField::CompetitionId => "Competition ID",
            FormField::FromDate => "From date",
            FormField::ToDate => "To date",
            FormField::SeasonYear => "Season year",
            FormField::UtcOffset => "UTC offset",
            FormField::Offset => "Offset",
            FormField::Limit => "Limit",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryForm {
    pub base_url: String,
    pub query: MatchQuery,
    pub selected: FormField,
    /// Keystrokes go into the selected field while set.
    pub editing: bool,
}

impl QueryForm {
    pub fn new(base_url: String, query: MatchQuery) -> Self {
        Self { base_url, query, ..Self::default() }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::BaseUrl => &self.base_url,
            FormField::CompetitionId => &self.query.competition_id,
            FormField::FromDate => &self.query.from_date,
            FormField::ToDate => &self.query.to_date,
            FormField::SeasonYear => &self.query.season_year,
            FormField::UtcOffset => &self.query.utc_offset,
            FormField::Offset => &self.query.offset,
            FormField::Limit => &self.query.limit,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::BaseUrl => &mut self.base_url,
            FormField::CompetitionId => &mut self.query.competition_id,
            FormField::FromDate => &mut self.query.from_date,
            FormField::ToDate => &mut self.query.to_date,
            FormField::SeasonYear => &mut self.query.season_year,
            FormField::UtcOffset => &mut self.query.utc_offset,
            FormField::Offset => &mut self.query.offset,
            FormField::Limit => &mut self.query.limit,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.value_mut(self.selected).push(c);
    }

    pub fn pop_char(&mut self) {
        self.value_mut(self.selected).pop();
    }

    pub fn select_next(&mut self) {
        self.selected = self.selected.next();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.prev();
    }
}

// ---------------------------------------------------------------------------
// Accordion tree + cursor
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TreeState {
    /// `None` until the first successful fetch.
    pub tree: Option<MatchTree>,
    /// Index into `visible_rows`.
    pub cursor: usize,
    pub loaded_at: Option<DateTime<Local>>,
}

impl TreeState {
    /// Replace the whole tree. The previous one is discarded, not merged.
    pub fn load(&mut self, tree: MatchTree) {
        self.tree = Some(tree);
        self.cursor = 0;
        self.loaded_at = Some(Local::now());
    }

    pub fn visible_rows(&self) -> Vec<TreeRow<'_>> {
        self.tree.as_ref().map(MatchTree::visible_rows).unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.visible_rows().len()
    }

    pub fn selected_row(&self) -> Option<TreeRow<'_>> {
        self.visible_rows().get(self.cursor).copied()
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.row_count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_first(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_last(&mut self) {
        self.cursor = self.row_count().saturating_sub(1);
    }

    /// Pull the cursor back inside the visible rows after a collapse.
    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.row_count().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Fetch bookkeeping
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FetchState {
    in_flight: Option<u64>,
    next_id: u64,
}

impl FetchState {
    /// Claim the single fetch slot. `None` while another request is pending.
    pub fn begin(&mut self) -> Option<u64> {
        if self.in_flight.is_some() {
            return None;
        }
        self.next_id += 1;
        self.in_flight = Some(self.next_id);
        self.in_flight
    }

    /// Release the slot if `request_id` is the one in flight.
    /// Returns false for stale or unknown ids.
    pub fn finish(&mut self, request_id: u64) -> bool {
        if self.in_flight == Some(request_id) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct PopupState {
    pub popup: EventPopup,
    pub scroll_offset: u16,
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub focus: Focus,
    pub form: QueryForm,
    pub tree: TreeState,
    pub fetch: FetchState,
    /// At most one popup is ever open.
    pub popup: Option<PopupState>,
    /// Modal error text, dismissed with Enter or Esc.
    pub alert: Option<String>,
    pub status_message: Option<String>,
    pub show_logs: bool,
}

impl AppState {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            form: QueryForm::new(settings.base_url.clone(), settings.query.clone()),
            ..Self::default()
        }
    }
}
