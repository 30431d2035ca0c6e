use crate::wire::{WireMatch, WireNamed, WirePlayerEvent, WireTeam};
use crate::{
    EventTime, GENERIC_HEAD, Kickoff, MatchRecord, MatchStatus, Matchday, PLACEHOLDER_LOGO,
    Player, PlayerEvent, Score, Team, UNKNOWN_AWAY_TEAM, UNKNOWN_HOME_TEAM,
};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// The listing is always requested oldest-first.
pub const SORT_ORDER: &str = "ASC";

const FINISHED_MARKER: &str = "FINISHED";
const LINEUP_AVAILABLE_MARKER: &str = "AVAILABLE";

/// Client for the match listing endpoint. The base URL is supplied per call.
#[derive(Debug, Clone)]
pub struct MatchApi {
    client: Client,
    timeout: Duration,
}

impl Default for MatchApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("mdtui/0.1 (terminal matchday viewer)")
                .build()
                .unwrap_or_default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Status(StatusCode, String),
    Parsing(serde_json::Error, String),
    Other(String),
}

impl ApiError {
    /// HTTP status for a non-success response, if that is what failed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status(status, _) => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Status(status, url) => write!(f, "HTTP error for {url}: status {status}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Query parameters for one listing request. Values are passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchQuery {
    pub competition_id: String,
    pub from_date: String,
    pub to_date: String,
    pub season_year: String,
    pub utc_offset: String,
    pub offset: String,
    pub limit: String,
}

impl MatchQuery {
    pub fn query_pairs(&self) -> [(&'static str, &str); 8] {
        [
            ("competitionId", self.competition_id.as_str()),
            ("fromDate", self.from_date.as_str()),
            ("toDate", self.to_date.as_str()),
            ("seasonYear", self.season_year.as_str()),
            ("utcOffset", self.utc_offset.as_str()),
            ("offset", self.offset.as_str()),
            ("limit", self.limit.as_str()),
            ("order", SORT_ORDER),
        ]
    }

    /// Full request URL for `base_url` with every parameter attached.
    pub fn url(&self, base_url: &str) -> ApiResult<Url> {
        Url::parse_with_params(base_url.trim(), self.query_pairs())
            .map_err(|e| ApiError::Other(format!("invalid base url {base_url:?}: {e}")))
    }
}

impl MatchApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout, ..Self::default() }
    }

    /// Fetch one page of matches and normalize it.
    pub async fn fetch_matches(&self, base_url: &str, query: &MatchQuery) -> ApiResult<Vec<MatchRecord>> {
        let url = query.url(base_url)?;
        let body = self.get_text(url).await?;
        parse_matches(&body).map_err(|e| ApiError::Parsing(e, base_url.to_owned()))
    }

    async fn get_text(&self, url: Url) -> ApiResult<String> {
        let url_str = url.to_string();
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url_str.clone()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status, url_str));
        }

        response
            .text()
            .await
            .map_err(|e| ApiError::Network(e, url_str))
    }
}

/// Parse a listing body (a JSON array of matches) into normalized records.
pub fn parse_matches(body: &str) -> Result<Vec<MatchRecord>, serde_json::Error> {
    let raw: Vec<WireMatch> = serde_json::from_str(body)?;
    Ok(raw.into_iter().map(map_match).collect())
}

// ---------------------------------------------------------------------------
// Normalization: wire types → clean domain types
// ---------------------------------------------------------------------------

/// The one place optional wire fields get their defaults.
pub fn map_match(raw: WireMatch) -> MatchRecord {
    let matchday = raw
        .matchday
        .map(|md| Matchday {
            name: md.long_name.unwrap_or_default(),
            date_from: md.date_from.as_deref().and_then(parse_instant),
            date_to: md.date_to.as_deref().and_then(parse_instant),
        })
        .unwrap_or_default();

    let kickoff = {
        let wire = raw.kick_off_time.unwrap_or_default();
        let date_time = wire.date_time.as_deref().and_then(parse_instant);
        let date = wire
            .date
            .filter(|d| !d.trim().is_empty())
            .or_else(|| date_time.map(|dt| dt.format("%Y-%m-%d").to_string()))
            .unwrap_or_default();
        Kickoff { date, date_time }
    };

    let score = raw
        .score
        .and_then(|s| s.regular)
        .and_then(|goals| goals.home.zip(goals.away))
        .map(|(home, away)| Score { home, away });

    let (red_cards, scorers) = raw
        .player_events
        .map(|events| {
            (
                map_events(events.red_cards.unwrap_or_default()),
                map_events(events.scorers.unwrap_or_default()),
            )
        })
        .unwrap_or_default();

    MatchRecord {
        id: raw.id.unwrap_or_default(),
        competition: meta_name(raw.competition.as_ref()),
        group: raw
            .group
            .and_then(|g| g.meta_data)
            .and_then(|m| m.group_name)
            .unwrap_or_default(),
        round: meta_name(raw.round.as_ref()),
        matchday,
        kickoff,
        status: parse_status(raw.status.as_deref()),
        lineup_available: raw.lineup_status.as_deref() == Some(LINEUP_AVAILABLE_MARKER),
        home_team: map_team(raw.home_team, UNKNOWN_HOME_TEAM),
        away_team: map_team(raw.away_team, UNKNOWN_AWAY_TEAM),
        score,
        full_time_at: raw.full_time_at.as_deref().and_then(parse_instant),
        red_cards,
        scorers,
    }
}

fn meta_name(named: Option<&WireNamed>) -> String {
    named
        .and_then(|n| n.meta_data.as_ref())
        .and_then(|m| m.name.clone())
        .unwrap_or_default()
}

fn map_team(team: Option<WireTeam>, fallback_name: &str) -> Team {
    let team = team.unwrap_or_default();
    let given_name = team.international_name.filter(|n| !n.is_empty());
    Team {
        id: team.id,
        name: given_name.clone().unwrap_or_else(|| fallback_name.to_string()),
        given_name,
        logo_url: team
            .logo_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_LOGO.to_string()),
    }
}

fn map_events(events: Vec<WirePlayerEvent>) -> Vec<PlayerEvent> {
    events
        .into_iter()
        .map(|e| {
            let player = e.player.unwrap_or_default();
            let time = e.time.unwrap_or_default();
            PlayerEvent {
                team_id: e.team_id,
                player: Player {
                    name: player.club_shirt_name.unwrap_or_default(),
                    image_url: player
                        .image_url
                        .filter(|u| !u.is_empty())
                        .unwrap_or_else(|| GENERIC_HEAD.to_string()),
                },
                time: EventTime {
                    minute: time.minute.unwrap_or_default(),
                    second: time.second.unwrap_or_default(),
                },
            }
        })
        .collect()
}

fn parse_status(s: Option<&str>) -> MatchStatus {
    match s {
        Some(FINISHED_MARKER) => MatchStatus::Finished,
        None | Some("") | Some("SCHEDULED") | Some("UPCOMING") => MatchStatus::Scheduled,
        Some(other) => MatchStatus::Other(other.to_string()),
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Matcher;

    const FULL_MATCH: &str = r#"[{
        "id": "2036161",
        "status": "FINISHED",
        "lineupStatus": "AVAILABLE",
        "competition": { "metaData": { "name": "UEFA Champions League" } },
        "group": { "metaData": { "groupName": "Group A" } },
        "round": { "metaData": { "name": "Group stage" } },
        "matchday": { "longName": "Matchday 1", "dateFrom": "2024-09-17T00:00:00Z", "dateTo": "2024-09-19T23:59:59Z" },
        "kickOffTime": { "date": "2024-09-17", "dateTime": "2024-09-17T16:45:00Z" },
        "homeTeam": { "id": "50139", "internationalName": "Juventus", "logoUrl": "https://img/juve.png" },
        "awayTeam": { "id": 50062, "internationalName": "PSV" },
        "score": { "regular": { "home": 3, "away": 1 } },
        "fullTimeAt": "2024-09-17T18:40:12Z",
        "playerEvents": {
            "redCards": [],
            "scorers": [
                { "teamId": "50139", "player": { "clubShirtName": "Yildiz", "imageUrl": "https://img/y.png" }, "time": { "minute": 21, "second": 4 } },
                { "teamId": "50062", "player": { "clubShirtName": "Saibari" }, "time": { "minute": 90 } }
            ]
        }
    }]"#;

    fn query() -> MatchQuery {
        MatchQuery {
            competition_id: "1".into(),
            from_date: "2024-09-17".into(),
            to_date: "2024-09-19".into(),
            season_year: "2025".into(),
            utc_offset: "2".into(),
            offset: "0".into(),
            limit: "50".into(),
        }
    }

    #[test]
    fn query_pairs_include_fixed_ascending_order() {
        let q = query();
        let pairs = q.query_pairs();
        assert_eq!(pairs.len(), 8);
        assert_eq!(pairs[0], ("competitionId", "1"));
        assert_eq!(pairs[7], ("order", "ASC"));
    }

    #[test]
    fn url_passes_values_through_unvalidated() {
        let q = MatchQuery { limit: "lots".into(), ..query() };
        let url = q.url("https://example.test/api/v5/matches").unwrap();
        assert_eq!(url.path(), "/api/v5/matches");
        assert!(url.query().unwrap().contains("limit=lots"));
        assert!(url.query().unwrap().ends_with("order=ASC"));
    }

    #[test]
    fn unparseable_base_url_is_reported() {
        let err = query().url("not a url").unwrap_err();
        assert!(matches!(err, ApiError::Other(_)));
    }

    #[test]
    fn full_match_normalizes() {
        let matches = parse_matches(FULL_MATCH).unwrap();
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.id, "2036161");
        assert_eq!(m.competition, "UEFA Champions League");
        assert_eq!(m.group, "Group A");
        assert_eq!(m.round, "Group stage");
        assert_eq!(m.matchday.name, "Matchday 1");
        assert_eq!(
            m.matchday.date_from,
            Some(Utc.with_ymd_and_hms(2024, 9, 17, 0, 0, 0).unwrap())
        );
        assert_eq!(m.kickoff.date, "2024-09-17");
        assert_eq!(m.status, MatchStatus::Finished);
        assert!(m.lineup_available);
        assert_eq!(m.score, Some(Score { home: 3, away: 1 }));
        assert_eq!(m.away_team.id.as_deref(), Some("50062"));
        assert_eq!(m.away_team.logo_url, PLACEHOLDER_LOGO);
        assert!(m.red_cards.is_empty());
        assert_eq!(m.scorers.len(), 2);
        assert_eq!(m.scorers[1].player.image_url, GENERIC_HEAD);
        assert_eq!(m.scorers[1].time, EventTime { minute: 90, second: 0 });
    }

    #[test]
    fn empty_object_normalizes_to_defaults() {
        let matches = parse_matches("[{}]").unwrap();
        let m = &matches[0];
        assert_eq!(m.competition, "");
        assert_eq!(m.group, "");
        assert_eq!(m.round, "");
        assert_eq!(m.matchday.name, "");
        assert_eq!(m.kickoff.date, "");
        assert!(m.kickoff.date_time.is_none());
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert!(!m.lineup_available);
        assert_eq!(m.home_team.name, UNKNOWN_HOME_TEAM);
        assert_eq!(m.away_team.name, UNKNOWN_AWAY_TEAM);
        assert!(m.home_team.given_name.is_none());
        assert!(m.score.is_none());
        assert!(m.red_cards.is_empty());
        assert!(m.scorers.is_empty());
    }

    #[test]
    fn kickoff_day_falls_back_to_instant() {
        let matches =
            parse_matches(r#"[{"kickOffTime": {"dateTime": "2024-10-01T19:00:00Z"}}]"#).unwrap();
        assert_eq!(matches[0].kickoff.date, "2024-10-01");
    }

    #[test]
    fn bad_instants_become_none() {
        let matches = parse_matches(
            r#"[{"fullTimeAt": "yesterday", "matchday": {"longName": "MD2", "dateFrom": "soon"}}]"#,
        )
        .unwrap();
        assert!(matches[0].full_time_at.is_none());
        assert!(matches[0].matchday.date_from.is_none());
        assert_eq!(matches[0].matchday.name, "MD2");
    }

    #[test]
    fn partial_score_is_dropped() {
        let matches = parse_matches(r#"[{"score": {"regular": {"home": 1}}}]"#).unwrap();
        assert!(matches[0].score.is_none());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(Some("FINISHED")), MatchStatus::Finished);
        assert_eq!(parse_status(Some("UPCOMING")), MatchStatus::Scheduled);
        assert_eq!(parse_status(None), MatchStatus::Scheduled);
        assert_eq!(parse_status(Some("LIVE")), MatchStatus::Other("LIVE".into()));
    }

    #[test]
    fn one_malformed_event_keeps_the_rest_of_the_listing() {
        let matches = parse_matches(
            r#"[
                {"id": "1", "status": "FINISHED", "score": {"regular": {"home": 2, "away": 0}}},
                {"id": "2", "status": "FINISHED", "lineupStatus": 1,
                 "score": {"regular": {"home": "3", "away": 1}},
                 "playerEvents": {"scorers": [{"teamId": 9, "player": {"clubShirtName": "Late"},
                                               "time": {"minute": "45+2", "second": 30}}]}}
            ]"#,
        )
        .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].score, Some(Score { home: 2, away: 0 }));
        let second = &matches[1];
        assert!(!second.lineup_available);
        assert!(second.score.is_none());
        assert_eq!(second.scorers.len(), 1);
        assert_eq!(second.scorers[0].player.name, "Late");
        assert_eq!(second.scorers[0].time, EventTime { minute: 0, second: 30 });
    }

    #[test]
    fn non_array_body_is_a_parse_error() {
        assert!(parse_matches(r#"{"matches": []}"#).is_err());
        assert!(parse_matches("<html>").is_err());
    }

    // -----------------------------------------------------------------------
    // HTTP round trips against a mock server
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fetch_sends_every_parameter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v5/matches")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("competitionId".into(), "1".into()),
                Matcher::UrlEncoded("fromDate".into(), "2024-09-17".into()),
                Matcher::UrlEncoded("toDate".into(), "2024-09-19".into()),
                Matcher::UrlEncoded("seasonYear".into(), "2025".into()),
                Matcher::UrlEncoded("utcOffset".into(), "2".into()),
                Matcher::UrlEncoded("offset".into(), "0".into()),
                Matcher::UrlEncoded("limit".into(), "50".into()),
                Matcher::UrlEncoded("order".into(), "ASC".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(FULL_MATCH)
            .create_async()
            .await;

        let api = MatchApi::new();
        let url = format!("{}/v5/matches", server.url());
        let matches = api.fetch_matches(&url, &query()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].home_team.name, "Juventus");
    }

    #[tokio::test]
    async fn non_success_status_carries_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v5/matches")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let api = MatchApi::new();
        let url = format!("{}/v5/matches", server.url());
        let err = api.fetch_matches(&url, &query()).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn client_errors_are_not_swallowed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v5/matches")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let api = MatchApi::new();
        let url = format!("{}/v5/matches", server.url());
        let err = api.fetch_matches(&url, &query()).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v5/matches")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[{\"id\": ")
            .create_async()
            .await;

        let api = MatchApi::new();
        let url = format!("{}/v5/matches", server.url());
        let err = api.fetch_matches(&url, &query()).await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)));
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let api = MatchApi::with_timeout(Duration::from_secs(2));
        let url = format!("http://127.0.0.1:{port}/v5/matches");
        let err = api.fetch_matches(&url, &query()).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(..)));
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn stalled_server_hits_the_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            // accept and never answer
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let api = MatchApi::with_timeout(Duration::from_millis(50));
        let url = format!("http://{addr}/v5/matches");
        let result =
            tokio::time::timeout(Duration::from_secs(5), api.fetch_matches(&url, &query())).await;
        server.abort();

        let err = result.expect("request should give up on its own").unwrap_err();
        assert!(matches!(err, ApiError::Network(..)));
    }

    #[tokio::test]
    async fn empty_listing_is_ok() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v5/matches")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let api = MatchApi::with_timeout(Duration::from_secs(2));
        let url = format!("{}/v5/matches", server.url());
        let matches = api.fetch_matches(&url, &query()).await.unwrap();
        assert!(matches.is_empty());
    }
}
