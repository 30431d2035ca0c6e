pub mod client;
pub mod group;
pub mod wire;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Fallback labels substituted during normalization and rendering
// ---------------------------------------------------------------------------

pub const UNKNOWN_HOME_TEAM: &str = "Unknown Home Team";
pub const UNKNOWN_AWAY_TEAM: &str = "Unknown Away Team";
pub const UNKNOWN_TEAM: &str = "Unknown Team";
pub const PLACEHOLDER_LOGO: &str = "placeholder.png";
pub const GENERIC_HEAD: &str = "generic-head.svg";

pub const SCORE_NOT_AVAILABLE: &str = "Score not available";
pub const NOT_AVAILABLE: &str = "Not available";

// ---------------------------------------------------------------------------
// Domain types, independent of the JSON wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MatchRecord {
    pub id: String,
    /// Grouping names. Empty string when the wire omitted them.
    pub competition: String,
    pub group: String,
    pub round: String,
    pub matchday: Matchday,
    pub kickoff: Kickoff,
    pub status: MatchStatus,
    pub lineup_available: bool,
    pub home_team: Team,
    pub away_team: Team,
    /// Regular-time score, only meaningful once the match is finished.
    pub score: Option<Score>,
    pub full_time_at: Option<DateTime<Utc>>,
    pub red_cards: Vec<PlayerEvent>,
    pub scorers: Vec<PlayerEvent>,
}

impl MatchRecord {
    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Display category for a match at `now`.
    ///
    /// There is no explicit live marker in the feed, so a match counts as live
    /// once kickoff has passed and lineups are published. A finished match that
    /// the feed hasn't flagged yet stays live until its status flips.
    pub fn display_status(&self, now: DateTime<Utc>) -> DisplayStatus {
        if self.is_finished() {
            return DisplayStatus::Finished;
        }
        let kicked_off = self.kickoff.date_time.is_some_and(|kickoff| now >= kickoff);
        if kicked_off && self.lineup_available {
            DisplayStatus::Live
        } else {
            DisplayStatus::Scheduled
        }
    }

    /// Human readable score. Never shows a score before the final whistle.
    pub fn score_label(&self) -> String {
        if !self.is_finished() {
            return NOT_AVAILABLE.to_string();
        }
        match self.score {
            Some(score) => format!("{} - {}", score.home, score.away),
            None => SCORE_NOT_AVAILABLE.to_string(),
        }
    }

    /// Resolve an event's team id against the two sides of this match.
    pub fn team_name_for(&self, team_id: Option<&str>) -> &str {
        let Some(team_id) = team_id else {
            return UNKNOWN_TEAM;
        };
        if self.home_team.id.as_deref() == Some(team_id) {
            &self.home_team.name
        } else if self.away_team.id.as_deref() == Some(team_id) {
            &self.away_team.name
        } else {
            UNKNOWN_TEAM
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Finished,
    /// Any other marker the feed sends, kept verbatim.
    Other(String),
}

impl MatchStatus {
    pub fn label(&self) -> &str {
        match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayStatus {
    Finished,
    Live,
    #[default]
    Scheduled,
}

impl DisplayStatus {
    /// Stable category name, e.g. for styling or export.
    pub fn class_name(&self) -> &'static str {
        match self {
            DisplayStatus::Finished => "match-finished",
            DisplayStatus::Live => "match-live",
            DisplayStatus::Scheduled => "match-scheduled",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            DisplayStatus::Finished => "FT",
            DisplayStatus::Live => "LIVE",
            DisplayStatus::Scheduled => "SCH",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Matchday {
    pub name: String,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct Kickoff {
    /// Calendar day label used for the per-day buckets, e.g. "2024-09-17".
    pub date: String,
    pub date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct Team {
    pub id: Option<String>,
    /// Display name, with the home/away fallback already applied.
    pub name: String,
    /// The name exactly as the feed sent it, if it sent one.
    pub given_name: Option<String>,
    pub logo_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub home: u16,
    pub away: u16,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerEvent {
    pub team_id: Option<String>,
    pub player: Player,
    pub time: EventTime,
}

#[derive(Debug, Clone, Default)]
pub struct Player {
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTime {
    pub minute: u16,
    pub second: u16,
}

impl EventTime {
    pub fn label(&self) -> String {
        format!("{}m {}s", self.minute, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn kickoff_at(hour: u32) -> Kickoff {
        Kickoff {
            date: "2024-09-17".into(),
            date_time: Some(Utc.with_ymd_and_hms(2024, 9, 17, hour, 0, 0).unwrap()),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 17, 20, 0, 0).unwrap()
    }

    #[test]
    fn finished_match_shows_regular_score() {
        let m = MatchRecord {
            status: MatchStatus::Finished,
            score: Some(Score { home: 2, away: 1 }),
            ..Default::default()
        };
        assert_eq!(m.score_label(), "2 - 1");
    }

    #[test]
    fn finished_match_without_score_uses_sentinel() {
        let m = MatchRecord { status: MatchStatus::Finished, ..Default::default() };
        assert_eq!(m.score_label(), SCORE_NOT_AVAILABLE);
    }

    #[test]
    fn scheduled_match_never_shows_score() {
        let m = MatchRecord {
            status: MatchStatus::Scheduled,
            score: Some(Score { home: 4, away: 0 }),
            ..Default::default()
        };
        assert_eq!(m.score_label(), NOT_AVAILABLE);
    }

    #[test]
    fn finished_wins_even_with_future_kickoff() {
        let m = MatchRecord {
            status: MatchStatus::Finished,
            kickoff: kickoff_at(23),
            ..Default::default()
        };
        assert_eq!(m.display_status(now()), DisplayStatus::Finished);
    }

    #[test]
    fn past_kickoff_with_lineups_is_live() {
        let mut m = MatchRecord { kickoff: kickoff_at(18), lineup_available: true, ..Default::default() };
        assert_eq!(m.display_status(now()), DisplayStatus::Live);

        m.lineup_available = false;
        assert_eq!(m.display_status(now()), DisplayStatus::Scheduled);
    }

    #[test]
    fn kickoff_instant_itself_counts_as_started() {
        let m = MatchRecord { kickoff: kickoff_at(20), lineup_available: true, ..Default::default() };
        assert_eq!(m.display_status(now()), DisplayStatus::Live);
    }

    #[test]
    fn missing_kickoff_is_never_live() {
        let m = MatchRecord { lineup_available: true, ..Default::default() };
        assert_eq!(m.display_status(now()), DisplayStatus::Scheduled);
    }

    #[test]
    fn unknown_status_marker_is_not_finished() {
        let m = MatchRecord {
            status: MatchStatus::Other("POSTPONED".into()),
            score: Some(Score { home: 1, away: 1 }),
            ..Default::default()
        };
        assert!(!m.is_finished());
        assert_eq!(m.score_label(), NOT_AVAILABLE);
        assert_eq!(m.status.label(), "POSTPONED");
    }

    #[test]
    fn team_name_resolution() {
        let m = MatchRecord {
            home_team: Team { id: Some("10".into()), name: "Juventus".into(), ..Default::default() },
            away_team: Team { id: Some("20".into()), name: "PSV".into(), ..Default::default() },
            ..Default::default()
        };
        assert_eq!(m.team_name_for(Some("10")), "Juventus");
        assert_eq!(m.team_name_for(Some("20")), "PSV");
        assert_eq!(m.team_name_for(Some("30")), UNKNOWN_TEAM);
        assert_eq!(m.team_name_for(None), UNKNOWN_TEAM);
    }

    #[test]
    fn event_time_label() {
        assert_eq!(EventTime { minute: 57, second: 3 }.label(), "57m 3s");
    }
}
