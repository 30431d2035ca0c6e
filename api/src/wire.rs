//! Raw wire types for the match listing endpoint.
//! Every field is optional; `client::map_match` turns these into the domain model.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireMatch {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub lineup_status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub competition: Option<WireNamed>,
    #[serde(default, deserialize_with = "lenient")]
    pub group: Option<WireNamed>,
    #[serde(default, deserialize_with = "lenient")]
    pub round: Option<WireNamed>,
    #[serde(default, deserialize_with = "lenient")]
    pub matchday: Option<WireMatchday>,
    #[serde(default, deserialize_with = "lenient")]
    pub kick_off_time: Option<WireKickOff>,
    #[serde(default, deserialize_with = "lenient")]
    pub home_team: Option<WireTeam>,
    #[serde(default, deserialize_with = "lenient")]
    pub away_team: Option<WireTeam>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<WireScore>,
    #[serde(default, deserialize_with = "lenient")]
    pub full_time_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub player_events: Option<WirePlayerEvents>,
}

/// `competition`, `group` and `round` all nest their label under `metaData`.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireNamed {
    #[serde(default, deserialize_with = "lenient")]
    pub meta_data: Option<WireMetaData>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireMetaData {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Only groups carry this one.
    #[serde(default, deserialize_with = "lenient")]
    pub group_name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireMatchday {
    #[serde(default, deserialize_with = "lenient")]
    pub long_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date_from: Option<String>, // ISO 8601
    #[serde(default, deserialize_with = "lenient")]
    pub date_to: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireKickOff {
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date_time: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireTeam {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub international_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireScore {
    #[serde(default, deserialize_with = "lenient")]
    pub regular: Option<WireGoals>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireGoals {
    #[serde(default, deserialize_with = "lenient")]
    pub home: Option<u16>,
    #[serde(default, deserialize_with = "lenient")]
    pub away: Option<u16>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WirePlayerEvents {
    #[serde(default, deserialize_with = "lenient")]
    pub red_cards: Option<Vec<WirePlayerEvent>>,
    #[serde(default, deserialize_with = "lenient")]
    pub scorers: Option<Vec<WirePlayerEvent>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WirePlayerEvent {
    #[serde(default, deserialize_with = "string_or_number")]
    pub team_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub player: Option<WirePlayer>,
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<WireEventTime>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WirePlayer {
    #[serde(default, deserialize_with = "lenient")]
    pub club_shirt_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireEventTime {
    #[serde(default, deserialize_with = "lenient")]
    pub minute: Option<u16>,
    #[serde(default, deserialize_with = "lenient")]
    pub second: Option<u16>,
}

/// Ids show up as both `"50051"` and `50051` depending on the endpoint.
/// Anything else is treated as missing.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A field of the wrong shape becomes `None` instead of failing the whole listing.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| T::deserialize(v).ok()))
}
