use chrono::{DateTime, TimeZone, Utc};
use match_api::group::group_by;
use match_api::{DisplayStatus, MatchRecord};
use std::fmt;

// ---------------------------------------------------------------------------
// View model for the matchday accordion
//
// competition → group → round → matchday → day → match
//
// Built in one pass from a fetch result and thrown away on the next fetch.
// The draw module only ever reads it through `visible_rows`.
// ---------------------------------------------------------------------------

/// e.g. "Sep 17, 2024, 06:45:00 PM"
pub const DATE_TIME_FORMAT: &str = "%b %-d, %Y, %I:%M:%S %p";
pub const UNKNOWN_INSTANT: &str = "Unknown";

#[derive(Debug, Clone, Default)]
pub struct MatchTree {
    pub competitions: Vec<CompetitionNode>,
}

#[derive(Debug, Clone)]
pub struct CompetitionNode {
    pub name: String,
    pub groups: Vec<GroupNode>,
}

#[derive(Debug, Clone)]
pub struct GroupNode {
    pub name: String,
    pub rounds: Vec<RoundNode>,
}

#[derive(Debug, Clone)]
pub struct RoundNode {
    pub name: String,
    pub matchdays: Vec<MatchdayNode>,
}

#[derive(Debug, Clone)]
pub struct MatchdayNode {
    /// Position of this matchday across the whole tree, in render order.
    pub id: usize,
    pub name: String,
    /// "(start - end)" taken from the first match in the bucket.
    pub range_label: String,
    pub expanded: bool,
    pub days: Vec<DayNode>,
}

#[derive(Debug, Clone)]
pub struct DayNode {
    pub day: String,
    pub matches: Vec<MatchLeaf>,
}

#[derive(Debug, Clone)]
pub struct MatchLeaf {
    pub home: TeamBadge,
    pub away: TeamBadge,
    pub score: String,
    pub status: DisplayStatus,
    pub kickoff_label: String,
    pub full_time_label: Option<String>,
    /// Kept whole so a finished match can open its event popup later.
    pub record: MatchRecord,
}

impl MatchLeaf {
    /// Only finished matches have events worth showing.
    pub fn is_selectable(&self) -> bool {
        self.status == DisplayStatus::Finished
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamBadge {
    pub name: String,
    pub logo_url: String,
    pub logo_alt: String,
}

/// One line of the flattened, currently visible tree.
#[derive(Debug, Clone, Copy)]
pub enum TreeRow<'a> {
    Competition(&'a CompetitionNode),
    Group(&'a GroupNode),
    Round(&'a RoundNode),
    Matchday(&'a MatchdayNode),
    Day(&'a DayNode),
    Match(&'a MatchLeaf),
}

impl TreeRow<'_> {
    pub fn depth(&self) -> usize {
        match self {
            TreeRow::Competition(_) => 0,
            TreeRow::Group(_) => 1,
            TreeRow::Round(_) => 2,
            TreeRow::Matchday(_) => 3,
            TreeRow::Day(_) => 4,
            TreeRow::Match(_) => 5,
        }
    }
}

impl MatchTree {
    pub fn is_empty(&self) -> bool {
        self.competitions.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.matchdays()
            .flat_map(|md| md.days.iter())
            .map(|day| day.matches.len())
            .sum()
    }

    pub fn matchdays(&self) -> impl Iterator<Item = &MatchdayNode> {
        self.competitions
            .iter()
            .flat_map(|c| c.groups.iter())
            .flat_map(|g| g.rounds.iter())
            .flat_map(|r| r.matchdays.iter())
    }

    fn matchdays_mut(&mut self) -> impl Iterator<Item = &mut MatchdayNode> {
        self.competitions
            .iter_mut()
            .flat_map(|c| c.groups.iter_mut())
            .flat_map(|g| g.rounds.iter_mut())
            .flat_map(|r| r.matchdays.iter_mut())
    }

    /// Flip one matchday open or closed. Every other matchday is left alone.
    /// Returns the new state, or `None` for an unknown id.
    pub fn toggle_matchday(&mut self, id: usize) -> Option<bool> {
        let matchday = self.matchdays_mut().find(|md| md.id == id)?;
        matchday.expanded = !matchday.expanded;
        Some(matchday.expanded)
    }

    pub fn set_all_expanded(&mut self, expanded: bool) {
        for matchday in self.matchdays_mut() {
            matchday.expanded = expanded;
        }
    }

    /// Flatten the tree into display rows, skipping the insides of collapsed matchdays.
    pub fn visible_rows(&self) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::new();
        for competition in &self.competitions {
            rows.push(TreeRow::Competition(competition));
            for group in &competition.groups {
                rows.push(TreeRow::Group(group));
                for round in &group.rounds {
                    rows.push(TreeRow::Round(round));
                    for matchday in &round.matchdays {
                        rows.push(TreeRow::Matchday(matchday));
                        if !matchday.expanded {
                            continue;
                        }
                        for day in &matchday.days {
                            rows.push(TreeRow::Day(day));
                            rows.extend(day.matches.iter().map(TreeRow::Match));
                        }
                    }
                }
            }
        }
        rows
    }
}

/// Group a fetch result into the accordion tree. Every matchday starts collapsed.
pub fn build_match_tree<Tz>(matches: Vec<MatchRecord>, now: DateTime<Utc>, tz: &Tz) -> MatchTree
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut next_matchday_id = 0;
    let mut competitions = Vec::new();

    for (competition_name, competition_matches) in group_by(matches, |m| m.competition.clone()) {
        let mut groups = Vec::new();

        for (group_name, group_matches) in group_by(competition_matches, |m| m.group.clone()) {
            let mut rounds = Vec::new();

            for (round_name, round_matches) in group_by(group_matches, |m| m.round.clone()) {
                let mut matchdays = Vec::new();

                for (matchday_name, matchday_matches) in
                    group_by(round_matches, |m| m.matchday.name.clone())
                {
                    let range_label = matchday_matches
                        .first()
                        .map(|m| {
                            format!(
                                "({} - {})",
                                format_instant(m.matchday.date_from, tz),
                                format_instant(m.matchday.date_to, tz)
                            )
                        })
                        .unwrap_or_default();

                    let days = group_by(matchday_matches, |m| m.kickoff.date.clone())
                        .into_iter()
                        .map(|(day, day_matches)| DayNode {
                            day,
                            matches: day_matches
                                .into_iter()
                                .map(|m| build_leaf(m, now, tz))
                                .collect(),
                        })
                        .collect();

                    matchdays.push(MatchdayNode {
                        id: next_matchday_id,
                        name: matchday_name,
                        range_label,
                        expanded: false,
                        days,
                    });
                    next_matchday_id += 1;
                }

                rounds.push(RoundNode { name: round_name, matchdays });
            }

            groups.push(GroupNode { name: group_name, rounds });
        }

        competitions.push(CompetitionNode { name: competition_name, groups });
    }

    MatchTree { competitions }
}

fn build_leaf<Tz>(record: MatchRecord, now: DateTime<Utc>, tz: &Tz) -> MatchLeaf
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    MatchLeaf {
        home: team_badge(&record.home_team, "Home Team"),
        away: team_badge(&record.away_team, "Away Team"),
        score: record.score_label(),
        status: record.display_status(now),
        kickoff_label: format!("Kickoff: {}", format_instant(record.kickoff.date_time, tz)),
        full_time_label: record
            .full_time_at
            .map(|ft| format!("Full Time: {}", format_instant(Some(ft), tz))),
        record,
    }
}

fn team_badge(team: &match_api::Team, side: &str) -> TeamBadge {
    TeamBadge {
        name: team.name.clone(),
        logo_url: team.logo_url.clone(),
        logo_alt: format!("{} Logo", team.given_name.as_deref().unwrap_or(side)),
    }
}

/// Format an instant in the viewer's zone, or `Unknown` when missing.
pub fn format_instant<Tz>(instant: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    instant
        .map(|dt| dt.with_timezone(tz).format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_else(|| UNKNOWN_INSTANT.to_string())
}
