use chrono::{DateTime, Local, TimeZone};
use kickoff_api::phase::Phase;
use kickoff_api::{Match, MatchStatus};
use std::fmt::Display;
use tui::style::Color;

/// "Today, 15:00", "Tomorrow, 20:45", "Yesterday, 18:30" or "01/03 at 15:00".
pub fn relative_kickoff<Tz>(kickoff: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = kickoff.format("%H:%M");
    let days = (kickoff.date_naive() - now.date_naive()).num_days();
    match days {
        0 => format!("Today, {time}"),
        1 => format!("Tomorrow, {time}"),
        -1 => format!("Yesterday, {time}"),
        _ => format!("{} at {time}", kickoff.format("%d/%m")),
    }
}

pub fn kickoff_label(m: &Match) -> String {
    m.kickoff()
        .map(|k| relative_kickoff(&k.with_timezone(&Local), &Local::now()))
        .unwrap_or_else(|| "TBD".to_string())
}

/// Short status tag plus its color. Scheduled matches show their kickoff.
pub fn status_tag(m: &Match) -> (String, Color) {
    match m.status_kind() {
        MatchStatus::Live if m.status.eq_ignore_ascii_case("live") => ("LIVE".to_string(), Color::Green),
        MatchStatus::Live => (m.status.to_uppercase(), Color::Green),
        MatchStatus::Finished => ("FT".to_string(), Color::Gray),
        MatchStatus::Postponed => ("PPD".to_string(), Color::Yellow),
        MatchStatus::Cancelled => ("CANC".to_string(), Color::Red),
        MatchStatus::Scheduled => (kickoff_label(m), Color::White),
    }
}

/// "  Arsenal  2 - 1  Chelsea" with both names padded to `name_width`.
pub fn fixture_line(m: &Match, name_width: usize) -> String {
    format!(
        "{:>w$} {:^7} {}",
        truncate(&m.home_team, name_width),
        m.score_line(),
        truncate(&m.away_team, name_width),
        w = name_width,
    )
}

/// Cut `name` to at most `max` characters, marking the cut with '…'.
pub fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let mut s: String = name.chars().take(max.saturating_sub(1)).collect();
    s.push('…');
    s
}

/// "+8", "0", "-3".
pub fn signed(value: i64) -> String {
    if value > 0 { format!("+{value}") } else { value.to_string() }
}

pub fn percent(value: f64) -> String {
    format!("{value:.0}%")
}

/// Compact phase label for the cup phase strip.
pub fn phase_short_label(phase: &Phase) -> String {
    if phase.is_league_stage() {
        return phase.id.to_string();
    }
    match phase.name.as_str() {
        "Playoffs" => "PO".to_string(),
        "Round of 16" => "R16".to_string(),
        "Quarter-finals" => "QF".to_string(),
        "Semi-finals" => "SF".to_string(),
        "Final" => "F".to_string(),
        other => other.chars().take(3).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kickoff_api::phase::{DEFAULT_KNOCKOUT_ROUNDS, PhaseCatalog};

    #[test]
    fn test_relative_kickoff() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2025, 3, d, h, 30, 0).unwrap();
        assert_eq!(relative_kickoff(&at(1, 20), &now), "Today, 20:30");
        assert_eq!(relative_kickoff(&at(2, 9), &now), "Tomorrow, 09:30");
        assert_eq!(relative_kickoff(&Utc.with_ymd_and_hms(2025, 2, 28, 18, 0, 0).unwrap(), &now), "Yesterday, 18:00");
        assert_eq!(relative_kickoff(&at(9, 15), &now), "09/03 at 15:30");
    }

    #[test]
    fn test_fixture_line() {
        let m = Match {
            home_team: "Wolverhampton Wanderers".into(),
            away_team: "Fulham".into(),
            home_score: Some(2),
            away_score: Some(0),
            ..Default::default()
        };
        assert_eq!(fixture_line(&m, 8), "Wolverh…  2 - 0  Fulham");
    }

    #[test]
    fn test_helpers() {
        assert_eq!(truncate("Arsenal", 10), "Arsenal");
        assert_eq!(truncate("Arsenal", 4), "Ars…");
        assert_eq!(signed(8), "+8");
        assert_eq!(signed(0), "0");
        assert_eq!(signed(-3), "-3");
        assert_eq!(percent(45.6), "46%");
    }

    #[test]
    fn test_phase_labels() {
        let cup = PhaseCatalog::cup(&DEFAULT_KNOCKOUT_ROUNDS);
        let labels: Vec<String> = cup.phases().iter().map(phase_short_label).collect();
        assert_eq!(labels, vec!["1", "2", "3", "4", "5", "6", "7", "8", "PO", "R16", "QF", "SF", "F"]);
    }

    #[test]
    fn test_status_tag() {
        let mut m = Match { status: "Ended".into(), ..Default::default() };
        assert_eq!(status_tag(&m).0, "FT");
        m.status = "Postponed".into();
        assert_eq!(status_tag(&m).0, "PPD");
        m.status = "2nd half".into();
        assert_eq!(status_tag(&m), ("2ND HALF".to_string(), Color::Green));
        m.status = "Not started".into();
        assert_eq!(status_tag(&m).0, "TBD");
    }
}
