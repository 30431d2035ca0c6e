use log::LevelFilter;
use match_api::client::{DEFAULT_TIMEOUT, MatchQuery};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub timeout: Duration,
    /// Initial form contents. A non-empty base URL triggers a fetch on start-up.
    pub base_url: String,
    pub query: MatchQuery,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            timeout: DEFAULT_TIMEOUT,
            base_url: String::new(),
            query: MatchQuery {
                offset: "0".to_string(),
                limit: "50".to_string(),
                utc_offset: "0".to_string(),
                ..MatchQuery::default()
            },
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any `MDTUI_*` lookup; blank values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(level) = get("MDTUI_LOG").and_then(|v| LevelFilter::from_str(v.trim()).ok()) {
            settings.log_level = Some(level);
        }
        if let Some(secs) = get("MDTUI_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok())
            && secs > 0
        {
            settings.timeout = Duration::from_secs(secs);
        }

        let fields: [(&str, &mut String); 8] = [
            ("MDTUI_BASE_URL", &mut settings.base_url),
            ("MDTUI_COMPETITION_ID", &mut settings.query.competition_id),
            ("MDTUI_FROM_DATE", &mut settings.query.from_date),
            ("MDTUI_TO_DATE", &mut settings.query.to_date),
            ("MDTUI_SEASON_YEAR", &mut settings.query.season_year),
            ("MDTUI_UTC_OFFSET", &mut settings.query.utc_offset),
            ("MDTUI_OFFSET", &mut settings.query.offset),
            ("MDTUI_LIMIT", &mut settings.query.limit),
        ];
        for (key, slot) in fields {
            if let Some(value) = get(key) {
                *slot = value;
            }
        }

        settings
    }

    pub fn fetch_on_start(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = AppSettings::from_lookup(lookup(&[]));
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
        assert_eq!(settings.query.limit, "50");
        assert!(settings.log_level.is_none());
        assert!(!settings.fetch_on_start());
    }

    #[test]
    fn environment_prefills_form() {
        let settings = AppSettings::from_lookup(lookup(&[
            ("MDTUI_BASE_URL", "https://example.test/v5/matches"),
            ("MDTUI_COMPETITION_ID", "1"),
            ("MDTUI_SEASON_YEAR", "2025"),
            ("MDTUI_LIMIT", "  "),
            ("MDTUI_LOG", "debug"),
            ("MDTUI_TIMEOUT_SECS", "3"),
        ]));
        assert!(settings.fetch_on_start());
        assert_eq!(settings.query.competition_id, "1");
        assert_eq!(settings.query.season_year, "2025");
        assert_eq!(settings.query.limit, "50");
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
        assert_eq!(settings.timeout, Duration::from_secs(3));
    }

    #[test]
    fn invalid_numbers_are_ignored() {
        let settings = AppSettings::from_lookup(lookup(&[
            ("MDTUI_TIMEOUT_SECS", "soon"),
            ("MDTUI_LOG", "loud"),
        ]));
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
        assert!(settings.log_level.is_none());
    }
}
