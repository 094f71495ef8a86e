//! Backend wire shapes. Each endpoint that has been observed returning more
//! than one payload layout gets an untagged enum here. Decoding picks the
//! variant once; the `From` impls fold every variant into the single domain
//! shape from lib.rs.

use crate::{Match, MatchDetail, MatchStat, NormalizedMatches, StandingRow, Standings, TournamentRef};
use log::debug;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Knockout / playoff rounds
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MatchesPayload {
    List(Vec<Match>),
    Envelope(MatchesEnvelope),
}

#[derive(Debug, Deserialize)]
pub struct MatchesEnvelope {
    pub message: Option<String>,
    pub tournament: Option<String>,
    pub round: Option<u32>,
    pub matches: Vec<Match>,
}

impl From<MatchesPayload> for NormalizedMatches {
    fn from(payload: MatchesPayload) -> Self {
        match payload {
            MatchesPayload::List(matches) => NormalizedMatches { matches, message: None },
            MatchesPayload::Envelope(env) => NormalizedMatches {
                matches: env.matches,
                message: env.message,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Match detail
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DetailPayload {
    Wrapped {
        #[serde(rename = "match")]
        inner: MatchDetail,
    },
    Bare(MatchDetail),
}

impl From<DetailPayload> for MatchDetail {
    fn from(payload: DetailPayload) -> Self {
        match payload {
            DetailPayload::Wrapped { inner } => inner,
            DetailPayload::Bare(detail) => detail,
        }
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StandingsPayload {
    Rows(Vec<StandingRow>),
    Table(StandingsTable),
}

#[derive(Debug, Deserialize)]
pub struct StandingsTable {
    pub tournament: Option<TournamentRef>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub rows: Vec<StandingRow>,
}

impl From<StandingsPayload> for Standings {
    fn from(payload: StandingsPayload) -> Self {
        let mut standings = match payload {
            StandingsPayload::Rows(rows) => Standings { tournament: None, kind: None, rows },
            StandingsPayload::Table(t) => Standings {
                tournament: t.tournament,
                kind: t.kind,
                rows: t.rows,
            },
        };
        standings.rows.sort_by_key(|r| r.position);
        standings
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTime {
    Text(String),
    Unix(i64),
}

/// Kickoff times arrive either as strings or as unix-second numbers; keep
/// them as text so `parse_start_time` has a single input type.
pub(crate) fn start_time<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawTime>::deserialize(deserializer)? {
        Some(RawTime::Text(s)) => s,
        Some(RawTime::Unix(secs)) => secs.to_string(),
        None => String::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStat {
    Known(MatchStat),
    Other(IgnoredAny),
}

/// Statistic rows whose period is not ALL, 1ST or 2ND (extra time,
/// penalties) are dropped rather than failing the whole detail.
pub(crate) fn known_period_stats<'de, D>(deserializer: D) -> Result<Vec<MatchStat>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawStat>::deserialize(deserializer)?;
    let total = raw.len();
    let stats: Vec<MatchStat> = raw
        .into_iter()
        .filter_map(|s| match s {
            RawStat::Known(stat) => Some(stat),
            RawStat::Other(_) => None,
        })
        .collect();
    if stats.len() < total {
        debug!("dropped {} statistic rows with an unknown period", total - stats.len());
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatPeriod;

    const DETAIL: &str = r#"{
        "id": 77,
        "homeTeam": "Arsenal",
        "awayTeam": "Chelsea",
        "homeScore": 2,
        "awayScore": 1,
        "status": "Ended",
        "startTime": "2025-03-01T15:00:00Z",
        "tournament": "Premier League",
        "round": 27,
        "stadium": "Emirates Stadium",
        "referee": "M. Oliver",
        "attendance": 60254,
        "stats": [
            {"period": "ALL", "name": "Ball possession", "homeValue": "55%", "awayValue": "45%", "compareCode": 1},
            {"period": "1ST", "name": "Ball possession", "homeValue": "60%", "awayValue": "40%", "compareCode": 1}
        ],
        "incidents": [
            {"incidentType": "goal", "time": 23, "addedTime": 0, "isHome": true, "playerName": "Saka"}
        ]
    }"#;

    #[test]
    fn test_bare_array_knockout_has_no_message() {
        let raw = r#"[{"id": 1, "homeTeam": "A", "awayTeam": "B", "status": "Not started", "startTime": "2025-02-11T20:00:00Z"}]"#;
        let payload: MatchesPayload = serde_json::from_str(raw).unwrap();
        let normalized = NormalizedMatches::from(payload);
        assert_eq!(normalized.matches.len(), 1);
        assert_eq!(normalized.matches[0].id, 1);
        assert_eq!(normalized.message, None);
    }

    #[test]
    fn test_envelope_knockout_keeps_message() {
        let raw = r#"{
            "message": "m",
            "tournament": "UEFA Champions League",
            "round": 5,
            "matches": [{"id": 9, "homeTeam": "A", "awayTeam": "B", "status": "Ended", "startTime": "x", "homeScore": 1, "awayScore": 0}]
        }"#;
        let payload: MatchesPayload = serde_json::from_str(raw).unwrap();
        let normalized = NormalizedMatches::from(payload);
        assert_eq!(normalized.message.as_deref(), Some("m"));
        assert_eq!(normalized.matches.len(), 1);
        assert_eq!(normalized.matches[0].home_score, Some(1));
    }

    #[test]
    fn test_envelope_without_matches_is_rejected() {
        let raw = r#"{"message": "Draw not made yet", "tournament": "UCL"}"#;
        assert!(serde_json::from_str::<MatchesPayload>(raw).is_err());
        assert!(serde_json::from_str::<MatchesPayload>(r#"{"error": "tournament not found"}"#).is_err());

        let empty = r#"{"message": "Draw not made yet", "tournament": "UCL", "matches": []}"#;
        let normalized = NormalizedMatches::from(serde_json::from_str::<MatchesPayload>(empty).unwrap());
        assert!(normalized.matches.is_empty());
        assert_eq!(normalized.message.as_deref(), Some("Draw not made yet"));
    }

    #[test]
    fn test_wrapped_and_bare_detail_decode_identically() {
        let wrapped = format!(r#"{{"match": {DETAIL}}}"#);
        let a = MatchDetail::from(serde_json::from_str::<DetailPayload>(&wrapped).unwrap());
        let b = MatchDetail::from(serde_json::from_str::<DetailPayload>(DETAIL).unwrap());
        assert_eq!(a, b);
        assert_eq!(a.summary.home_team, "Arsenal");
        assert_eq!(a.stadium.as_deref(), Some("Emirates Stadium"));
        assert_eq!(a.attendance, Some(60254));
        assert_eq!(a.stats_for(StatPeriod::FirstHalf).count(), 1);
        assert_eq!(a.incidents[0].player_name.as_deref(), Some("Saka"));
    }

    #[test]
    fn test_unknown_stat_period_is_dropped() {
        let raw = r#"{
            "id": 5, "homeTeam": "Inter", "awayTeam": "Milan", "status": "Ended", "startTime": "x",
            "stats": [
                {"period": "ALL", "name": "Shots", "homeValue": "14", "awayValue": "9", "compareCode": 1},
                {"period": "ET", "name": "Shots", "homeValue": "2", "awayValue": "1", "compareCode": 1},
                {"period": "2ND", "name": "Shots", "homeValue": "8", "awayValue": "4", "compareCode": 1}
            ]
        }"#;
        let detail = MatchDetail::from(serde_json::from_str::<DetailPayload>(raw).unwrap());
        assert_eq!(detail.summary.home_team, "Inter");
        assert_eq!(detail.stats.len(), 2);
        let split: usize = StatPeriod::ORDER.iter().map(|p| detail.stats_for(*p).count()).sum();
        assert_eq!(split, detail.stats.len());
        assert_eq!(detail.stats_for(StatPeriod::SecondHalf).count(), 1);
    }

    #[test]
    fn test_standings_rows_and_table_forms() {
        let rows = r#"[
            {"position": 2, "team": {"id": 2, "name": "B"}, "matches": 3, "wins": 2, "draws": 0, "losses": 1,
             "scoresFor": 5, "scoresAgainst": 3, "points": 6, "promotion": null, "updatedAt": "2025-01-01T00:00:00Z"},
            {"position": 1, "team": {"id": 1, "name": "A"}, "matches": 3, "wins": 3, "draws": 0, "losses": 0,
             "scoresFor": 9, "scoresAgainst": 1, "points": 9, "promotion": {"id": 4, "text": "Champions League"}, "updatedAt": "2025-01-01T00:00:00Z"}
        ]"#;
        let bare = Standings::from(serde_json::from_str::<StandingsPayload>(rows).unwrap());
        assert_eq!(bare.tournament, None);
        assert_eq!(bare.rows[0].team.name, "A");
        assert_eq!(bare.rows[0].goal_difference(), 8);
        assert!(bare.is_complete());

        let table = format!(
            r#"{{"tournament": {{"id": 7, "name": "UEFA Champions League"}}, "type": "total", "rows": {rows}}}"#
        );
        let wrapped = Standings::from(serde_json::from_str::<StandingsPayload>(&table).unwrap());
        assert_eq!(wrapped.kind.as_deref(), Some("total"));
        assert_eq!(wrapped.tournament.map(|t| t.id), Some(7));
        assert_eq!(wrapped.rows, bare.rows);
    }

    #[test]
    fn test_unix_start_time_is_kept_as_text() {
        let raw = r#"{"id": 3, "homeTeam": "A", "awayTeam": "B", "status": "Live", "startTime": 1740841200}"#;
        let m: Match = serde_json::from_str(raw).unwrap();
        assert_eq!(m.start_time, "1740841200");
        assert!(m.kickoff().is_some());
    }

    #[test]
    fn test_unrecognized_shape_is_rejected() {
        assert!(serde_json::from_str::<MatchesPayload>(r#""nope""#).is_err());
        assert!(serde_json::from_str::<StandingsPayload>(r#"42"#).is_err());
        assert!(serde_json::from_str::<StandingsPayload>(r#"{"tournament": null, "type": "total"}"#).is_err());
    }
}
