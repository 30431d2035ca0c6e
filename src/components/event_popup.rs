use match_api::group::group_by;
use match_api::{MatchRecord, PlayerEvent};

pub const NO_RED_CARDS: &str = "No red cards.";
pub const NO_SCORERS: &str = "No scorers.";

/// Red cards and scorers for one finished match.
#[derive(Debug, Clone, Default)]
pub struct EventPopup {
    pub match_id: String,
    pub title: String,
    /// In arrival order.
    pub red_cards: Vec<RedCardEntry>,
    /// One block per team id, in order of each team's first goal.
    pub scorers: Vec<TeamScorers>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntry {
    pub player_name: String,
    pub image_url: String,
    pub time_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedCardEntry {
    pub team_name: String,
    pub entry: EventEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamScorers {
    pub team_id: String,
    pub team_name: String,
    pub players: Vec<EventEntry>,
}

impl EventPopup {
    pub fn from_match(record: &MatchRecord) -> Self {
        let red_cards = record
            .red_cards
            .iter()
            .map(|event| RedCardEntry {
                team_name: record.team_name_for(event.team_id.as_deref()).to_string(),
                entry: event_entry(event),
            })
            .collect();

        let scorers = group_by(&record.scorers, |event| event.team_id.clone().unwrap_or_default())
            .into_iter()
            .map(|(team_id, events)| {
                let team_name = record.team_name_for(Some(team_id.as_str()).filter(|id| !id.is_empty()));
                TeamScorers {
                    team_name: team_name.to_string(),
                    team_id,
                    players: events.into_iter().map(event_entry).collect(),
                }
            })
            .collect();

        Self {
            match_id: record.id.clone(),
            title: format!("{} vs {}", record.home_team.name, record.away_team.name),
            red_cards,
            scorers,
        }
    }

    /// Placeholder text shown instead of the red card list, if any.
    pub fn red_cards_placeholder(&self) -> Option<&'static str> {
        self.red_cards.is_empty().then_some(NO_RED_CARDS)
    }

    pub fn scorers_placeholder(&self) -> Option<&'static str> {
        self.scorers.is_empty().then_some(NO_SCORERS)
    }

    /// Unwrapped line count of the rendered popup: two headings, a spacer,
    /// two lines per event and one heading line per scoring team.
    pub fn line_count(&self) -> usize {
        let red_cards = if self.red_cards.is_empty() { 1 } else { self.red_cards.len() * 2 };
        let scorers = if self.scorers.is_empty() {
            1
        } else {
            self.scorers.iter().map(|team| 1 + team.players.len() * 2).sum()
        };
        3 + red_cards + scorers
    }
}

fn event_entry(event: &PlayerEvent) -> EventEntry {
    EventEntry {
        player_name: event.player.name.clone(),
        image_url: event.player.image_url.clone(),
        time_label: event.time.label(),
    }
}
