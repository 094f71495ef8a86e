use kickoff_api::client::DEFAULT_BASE_URL;
use log::LevelFilter;
use std::str::FromStr;

pub const API_URL_VAR: &str = "KICKOFF_API_URL";
pub const LOG_VAR: &str = "KICKOFF_LOG";
pub const LEAGUE_VAR: &str = "KICKOFF_LEAGUE";
pub const SEGMENTS_VAR: &str = "KICKOFF_SEGMENTS";
pub const KNOCKOUT_VAR: &str = "KICKOFF_KNOCKOUT";

const DEFAULT_LEAGUE: &str = "premier";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub api_url: String,
    /// Competition shown first on the League tab.
    pub league: String,
    /// Backend segment overrides, `slug=segment,...`.
    pub segment_overrides: Option<String>,
    /// Knockout round ids, `slug:phase=round,...`.
    pub knockout_rounds: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            api_url: DEFAULT_BASE_URL.to_string(),
            league: DEFAULT_LEAGUE.to_string(),
            segment_overrides: None,
            knockout_rounds: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            full_screen: false,
            log_level: get(LOG_VAR).and_then(|v| LevelFilter::from_str(&v).ok()),
            api_url: get(API_URL_VAR).unwrap_or(defaults.api_url),
            league: get(LEAGUE_VAR).unwrap_or(defaults.league),
            segment_overrides: get(SEGMENTS_VAR),
            knockout_rounds: get(KNOCKOUT_VAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.api_url, DEFAULT_BASE_URL);
        assert_eq!(s.league, "premier");
        assert_eq!(s.log_level, None);
        assert_eq!(s.segment_overrides, None);
        assert_eq!(s.knockout_rounds, None);
    }

    #[test]
    fn test_env_overrides() {
        let s = settings(&[
            (API_URL_VAR, "https://scores.example.org/api/"),
            (LOG_VAR, "debug"),
            (LEAGUE_VAR, "laliga"),
            (SEGMENTS_VAR, "champions-league:cup=ChampionsLeague"),
            (KNOCKOUT_VAR, "champions-league:11=6"),
        ]);
        assert_eq!(s.api_url, "https://scores.example.org/api/");
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
        assert_eq!(s.league, "laliga");
        assert_eq!(s.segment_overrides.as_deref(), Some("champions-league:cup=ChampionsLeague"));
        assert_eq!(s.knockout_rounds.as_deref(), Some("champions-league:11=6"));
    }

    #[test]
    fn test_blank_and_invalid_values_are_ignored() {
        let s = settings(&[(API_URL_VAR, "  "), (LOG_VAR, "chatty")]);
        assert_eq!(s.api_url, DEFAULT_BASE_URL);
        assert_eq!(s.log_level, None);
    }
}
