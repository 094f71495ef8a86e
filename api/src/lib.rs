pub mod client;
pub mod competition;
pub mod phase;
pub mod wire;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Domain types: the shapes every caller sees after normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: u64,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>, // None before kickoff
    pub away_score: Option<u32>,
    pub status: String,
    /// Raw kickoff time as sent by the backend. See [`parse_start_time`].
    #[serde(default, deserialize_with = "wire::start_time")]
    pub start_time: String,
    pub tournament: Option<String>,
    pub round: Option<u32>,
}

impl Match {
    pub fn status_kind(&self) -> MatchStatus {
        MatchStatus::from_label(&self.status)
    }

    pub fn is_live(&self) -> bool {
        self.status_kind() == MatchStatus::Live
    }

    pub fn is_finished(&self) -> bool {
        self.status_kind() == MatchStatus::Finished
    }

    /// "2 - 1", or "-" when either side has no score yet.
    pub fn score_line(&self) -> String {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) => format!("{h} - {a}"),
            _ => "-".to_string(),
        }
    }

    pub fn kickoff(&self) -> Option<DateTime<Utc>> {
        parse_start_time(&self.start_time)
    }
}

/// Coarse classification of the backend's free-form status label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Finished,
    Postponed,
    Cancelled,
}

impl MatchStatus {
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        match lower.as_str() {
            "live" | "inplay" | "halftime" => MatchStatus::Live,
            "ended" | "finished" => MatchStatus::Finished,
            "postponed" => MatchStatus::Postponed,
            "cancelled" | "canceled" => MatchStatus::Cancelled,
            s if s.starts_with("1st") || s.starts_with("2nd") => MatchStatus::Live,
            _ => MatchStatus::Scheduled,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "Scheduled",
            MatchStatus::Live => "Live",
            MatchStatus::Finished => "Finished",
            MatchStatus::Postponed => "Postponed",
            MatchStatus::Cancelled => "Cancelled",
        }
    }
}

/// Parse a kickoff time in any of the forms the backend has used:
/// RFC 3339, ISO-8601 without an offset (taken as UTC), or unix seconds.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

// ---------------------------------------------------------------------------
// Match detail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(flatten)]
    pub summary: Match,
    pub stadium: Option<String>,
    pub referee: Option<String>,
    pub attendance: Option<u32>,
    #[serde(default, deserialize_with = "wire::known_period_stats")]
    pub stats: Vec<MatchStat>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

impl MatchDetail {
    /// Statistic rows recorded for exactly `period`.
    pub fn stats_for(&self, period: StatPeriod) -> impl Iterator<Item = &MatchStat> {
        self.stats.iter().filter(move |s| s.period == period)
    }

    pub fn has_period(&self, period: StatPeriod) -> bool {
        self.stats_for(period).next().is_some()
    }

    /// Whether the second-half tab has anything to show yet.
    pub fn second_half_available(&self) -> bool {
        let first_half_live = self.summary.is_live()
            && self.summary.status.to_lowercase().contains("1st");
        !first_half_live && self.has_period(StatPeriod::SecondHalf)
    }

    /// Goals and cards in match order.
    pub fn timeline(&self) -> Vec<&Incident> {
        let mut events: Vec<&Incident> = self
            .incidents
            .iter()
            .filter(|i| matches!(i.kind(), IncidentKind::Goal | IncidentKind::Card))
            .collect();
        events.sort_by_key(|i| (i.time, i.added_time));
        events
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum StatPeriod {
    #[default]
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "1ST")]
    FirstHalf,
    #[serde(rename = "2ND")]
    SecondHalf,
}

impl StatPeriod {
    pub const ORDER: [StatPeriod; 3] = [StatPeriod::All, StatPeriod::FirstHalf, StatPeriod::SecondHalf];

    pub fn label(&self) -> &'static str {
        match self {
            StatPeriod::All => "Full match",
            StatPeriod::FirstHalf => "1st half",
            StatPeriod::SecondHalf => "2nd half",
        }
    }

    pub fn next(self) -> Self {
        match self {
            StatPeriod::All => StatPeriod::FirstHalf,
            StatPeriod::FirstHalf => StatPeriod::SecondHalf,
            StatPeriod::SecondHalf => StatPeriod::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStat {
    pub period: StatPeriod,
    pub name: String,
    pub home_value: String,
    pub away_value: String,
    /// 1 = home side better, 2 = away side better, anything else = level.
    #[serde(default)]
    pub compare_code: u8,
}

impl MatchStat {
    /// Home share of the bar in percent. Percentage stats are taken as-is,
    /// counts are split proportionally, and 0-0 splits evenly.
    pub fn home_share(&self) -> f64 {
        let parse = |v: &str| v.trim().trim_end_matches('%').trim().parse::<f64>().unwrap_or(0.0);
        let home = parse(&self.home_value);
        let away = parse(&self.away_value);
        if self.home_value.contains('%') {
            return home.clamp(0.0, 100.0);
        }
        let total = home + away;
        if total > 0.0 { home / total * 100.0 } else { 50.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub incident_type: String,
    pub incident_class: Option<String>,
    #[serde(default)]
    pub time: i32,
    #[serde(default)]
    pub added_time: i32,
    #[serde(default)]
    pub is_home: bool,
    pub player_name: Option<String>,
    pub assist_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentKind {
    Goal,
    Card,
    Substitution,
    Other,
}

impl Incident {
    pub fn kind(&self) -> IncidentKind {
        match self.incident_type.as_str() {
            "goal" => IncidentKind::Goal,
            "card" => IncidentKind::Card,
            "substitution" => IncidentKind::Substitution,
            _ => IncidentKind::Other,
        }
    }

    /// "45'" or "90+3'".
    pub fn minute(&self) -> String {
        if self.added_time > 0 {
            format!("{}+{}'", self.time, self.added_time)
        } else {
            format!("{}'", self.time)
        }
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub position: u32,
    pub team: TeamRef,
    pub matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub scores_for: u32,
    pub scores_against: u32,
    pub points: u32,
    pub promotion: Option<Promotion>,
    #[serde(default)]
    pub updated_at: String,
}

impl StandingRow {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.scores_for) - i64::from(self.scores_against)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TeamRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Promotion {
    pub id: u64,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    ChampionsLeague,
    Europa,
    Relegation,
    Other,
}

impl Promotion {
    pub fn zone(&self) -> Zone {
        if self.text.contains("Champions League") {
            Zone::ChampionsLeague
        } else if self.text.contains("Europa") {
            Zone::Europa
        } else if self.text.contains("Relegation") {
            Zone::Relegation
        } else {
            Zone::Other
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TournamentRef {
    pub id: u64,
    pub name: String,
}

/// A standings table regardless of whether the backend sent bare rows or
/// the `{tournament, type, rows}` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Standings {
    pub tournament: Option<TournamentRef>,
    pub kind: Option<String>,
    pub rows: Vec<StandingRow>,
}

impl Standings {
    /// Highest "matches played" across the table, 0 when empty.
    pub fn max_played(&self) -> u32 {
        self.rows.iter().map(|r| r.matches).max().unwrap_or(0)
    }

    /// Rows ordered by position with positions 1..=n and no gaps.
    pub fn is_complete(&self) -> bool {
        self.rows
            .iter()
            .enumerate()
            .all(|(i, r)| r.position as usize == i + 1)
    }
}

// ---------------------------------------------------------------------------
// Knockout rounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedMatches {
    pub matches: Vec<Match>,
    pub message: Option<String>,
}

impl From<Vec<Match>> for NormalizedMatches {
    fn from(matches: Vec<Match>) -> Self {
        Self { matches, message: None }
    }
}

// ---------------------------------------------------------------------------
// Predictions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPrediction {
    #[serde(rename = "match")]
    pub info: MatchInfo,
    pub home_team_analysis: TeamFormAnalysis,
    pub away_team_analysis: TeamFormAnalysis,
    pub predictions: PredictionResults,
    pub confidence: String,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub id: u64,
    pub home_team: String,
    pub away_team: String,
    pub tournament: String,
    pub round: Option<u32>,
    pub date_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamFormAnalysis {
    pub games_analyzed: u32,
    pub context: String,
    pub offensive: OffensiveMetrics,
    pub defensive: DefensiveMetrics,
    pub discipline: DisciplineMetrics,
    pub results: ResultMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OffensiveMetrics {
    pub avg_goals_scored: f64,
    pub avg_shots_on_target: f64,
    pub goals_first_half: u32,
    pub goals_second_half: u32,
    pub scored_first_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefensiveMetrics {
    pub avg_goals_conceded: f64,
    pub clean_sheets: u32,
    pub goals_conceded_first_half: u32,
    pub goals_conceded_second_half: u32,
    pub conceded_first_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisciplineMetrics {
    pub avg_yellow_cards: f64,
    pub avg_red_cards: f64,
    pub avg_total_cards: f64,
    pub avg_fouls_committed: f64,
    pub total_yellow_cards: u32,
    pub total_red_cards: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultMetrics {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub win_percentage: f64,
    pub games_played: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictionResults {
    pub result: ResultPrediction,
    pub goals: GoalsPrediction,
    pub first_goal: FirstGoalPrediction,
    pub half_time: HalfTimePrediction,
    pub cards: CardsPrediction,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultPrediction {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GoalsPrediction {
    #[serde(rename = "over25")]
    pub over_2_5: f64,
    #[serde(rename = "under25")]
    pub under_2_5: f64,
    pub btts: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirstGoalPrediction {
    pub home_team: f64,
    pub away_team: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HalfTimePrediction {
    pub home_leading: f64,
    pub draw: f64,
    pub away_leading: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardsPrediction {
    pub expected_total_cards: f64,
    #[serde(rename = "over35Cards")]
    pub over_3_5_cards: f64,
    #[serde(rename = "under35Cards")]
    pub under_3_5_cards: f64,
    pub most_disciplined_team: String,
}
