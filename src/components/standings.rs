use kickoff_api::{StandingRow, Zone};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::ui::format::{signed, truncate};

/// Columns other than the team name, including the zone marker.
const FIXED_WIDTH: usize = 24;
const MIN_NAME_WIDTH: usize = 6;
const MAX_NAME_WIDTH: usize = 24;

/// League table with a colored marker for promotion/relegation zones.
pub struct StandingsTable<'a> {
    pub rows: &'a [StandingRow],
    /// Team to highlight, e.g. one side of the selected match.
    pub highlight: Option<&'a str>,
}

impl Widget for StandingsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || (area.width as usize) < FIXED_WIDTH + MIN_NAME_WIDTH {
            return;
        }
        let width = area.width as usize;
        let name_width = width.saturating_sub(FIXED_WIDTH).clamp(MIN_NAME_WIDTH, MAX_NAME_WIDTH);

        buf.set_stringn(
            area.x + 1,
            area.y,
            header_text(name_width),
            width - 1,
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        );

        let visible = area.height.saturating_sub(1) as usize;
        for (i, row) in self.rows.iter().take(visible).enumerate() {
            let y = area.y + 1 + i as u16;
            if let Some(color) = zone_color(row) {
                buf.set_string(area.x, y, "▌", Style::default().fg(color));
            }
            let style = if self.highlight == Some(row.team.name.as_str()) {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            buf.set_stringn(area.x + 1, y, row_text(row, name_width), width - 1, style);
        }
    }
}

pub fn zone_color(row: &StandingRow) -> Option<Color> {
    match row.promotion.as_ref()?.zone() {
        Zone::ChampionsLeague => Some(Color::Blue),
        Zone::Europa => Some(Color::Yellow),
        Zone::Relegation => Some(Color::Red),
        Zone::Other => Some(Color::Cyan),
    }
}

fn header_text(name_width: usize) -> String {
    format!(
        "{:>2} {:<w$} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3}",
        "#", "Team", "P", "W", "D", "L", "GD", "Pts",
        w = name_width,
    )
}

pub fn row_text(row: &StandingRow, name_width: usize) -> String {
    format!(
        "{:>2} {:<w$} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3}",
        row.position,
        truncate(&row.team.name, name_width),
        row.matches,
        row.wins,
        row.draws,
        row.losses,
        signed(row.goal_difference()),
        row.points,
        w = name_width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickoff_api::{Promotion, TeamRef};

    fn row() -> StandingRow {
        StandingRow {
            position: 1,
            team: TeamRef { id: 42, name: "Liverpool".into() },
            matches: 27,
            wins: 20,
            draws: 6,
            losses: 1,
            scores_for: 64,
            scores_against: 25,
            points: 66,
            promotion: Some(Promotion { id: 804, text: "Champions League".into() }),
            ..Default::default()
        }
    }

    #[test]
    fn test_row_text_columns() {
        assert_eq!(row_text(&row(), 10), " 1 Liverpool  27 20  6  1 +39  66");
        assert_eq!(header_text(10), " # Team        P  W  D  L  GD Pts");
    }

    #[test]
    fn test_zone_colors() {
        let mut r = row();
        assert_eq!(zone_color(&r), Some(Color::Blue));
        r.promotion = Some(Promotion { id: 1, text: "Relegation".into() });
        assert_eq!(zone_color(&r), Some(Color::Red));
        r.promotion = None;
        assert_eq!(zone_color(&r), None);
    }

    #[test]
    fn test_render_marks_zone_and_highlight() {
        let rows = vec![row()];
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        StandingsTable { rows: &rows, highlight: Some("Liverpool") }.render(area, &mut buf);

        assert_eq!(buf[(0, 1)].symbol(), "▌");
        assert_eq!(buf[(0, 1)].fg, Color::Blue);
        assert!(buf[(3, 1)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_narrow_area_renders_nothing() {
        let rows = vec![row()];
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        StandingsTable { rows: &rows, highlight: None }.render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
