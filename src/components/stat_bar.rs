use kickoff_api::MatchStat;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

/// Rows used by one stat: values/name line plus the bar.
pub const STAT_BAR_HEIGHT: u16 = 2;

const LEADING: Color = Color::Green;
const TRAILING: Color = Color::DarkGray;

/// One comparison stat: "55%   Ball possession   45%" over a split bar
/// whose brighter side is the side the backend marks as better.
pub struct StatBar<'a> {
    pub stat: &'a MatchStat,
}

impl Widget for StatBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < STAT_BAR_HEIGHT || area.width < 10 {
            return;
        }
        let stat = self.stat;
        let width = area.width as usize;
        let bold = Style::default().add_modifier(Modifier::BOLD);

        buf.set_stringn(area.x, area.y, &stat.home_value, width, bold);
        let name_x = area.x + (area.width.saturating_sub(stat.name.chars().count() as u16)) / 2;
        buf.set_stringn(name_x, area.y, &stat.name, width, Style::default().fg(Color::Gray));
        let away_len = stat.away_value.chars().count() as u16;
        buf.set_stringn(area.x + area.width.saturating_sub(away_len), area.y, &stat.away_value, width, bold);

        let (home_cells, away_cells) = split_width(stat.home_share(), area.width);
        let (home_color, away_color) = match stat.compare_code {
            1 => (LEADING, TRAILING),
            2 => (TRAILING, LEADING),
            _ => (Color::Gray, Color::Gray),
        };
        let y = area.y + 1;
        buf.set_string(area.x, y, "━".repeat(home_cells as usize), Style::default().fg(home_color));
        buf.set_string(area.x + home_cells, y, "━".repeat(away_cells as usize), Style::default().fg(away_color));
    }
}

/// Split `width` cells by the home share in percent. Both sides keep at
/// least one cell when there is room, so a 0% side stays visible.
pub fn split_width(home_share: f64, width: u16) -> (u16, u16) {
    if width < 2 {
        return (width, 0);
    }
    let share = home_share.clamp(0.0, 100.0) / 100.0;
    let home = ((f64::from(width) * share).round() as u16).clamp(1, width - 1);
    (home, width - home)
}
