use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::standings::StandingsTable;
use crate::components::stat_bar::{STAT_BAR_HEIGHT, StatBar};
use crate::state::app_state::{CompetitionPage, FetchState, MATCHES_PER_PAGE};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::format::{fixture_line, kickoff_label, percent, phase_short_label, status_tag};
use crate::ui::layout::LayoutAreas;
use kickoff_api::{IncidentKind, Match, MatchDetail, MatchPrediction, StatPeriod};

static TABS: &[&str; 4] = &["Live", "League", "Cup", "Match"];

const NAME_WIDTH: usize = 18;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Live => draw_live(f, layout.main, app),
            MenuItem::League => draw_competition(f, layout.main, &app.state.league),
            MenuItem::Cup => match app.state.cup.as_ref() {
                Some(cup) => draw_competition(f, layout.main, cup),
                None => draw_placeholder(f, layout.main, "No cup competition configured"),
            },
            MenuItem::Match => draw_match(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Live => 0,
        MenuItem::League => 1,
        MenuItem::Cup => 2,
        MenuItem::Match => 3,
        MenuItem::Help => match app.state.previous_tab {
            MenuItem::League => 1,
            MenuItem::Cup => 2,
            MenuItem::Match => 3,
            _ => 0,
        },
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    // Last failure stays flagged until the next successful load.
    let (help_text, help_style) = match app.state.last_error {
        Some(_) => ("! Help: ? ", Style::default().fg(Color::Red)),
        None => ("Help: ? ", style),
    };
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(help_style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Live
// ---------------------------------------------------------------------------

fn draw_live(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Live ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let live = &app.state.live;
    if let Some(message) = fetch_placeholder(&live.matches, "live matches") {
        f.render_widget(message, inner);
        return;
    }
    if live.all().is_empty() {
        f.render_widget(muted("No live matches right now"), inner);
        return;
    }

    let first = live.page * MATCHES_PER_PAGE + 1;
    let last = first + live.visible().len() - 1;
    let mut lines = vec![
        Line::from(format!(
            "{} in play · {first}-{last} · page {}/{}",
            live.all().len(),
            live.page + 1,
            live.page_count(),
        )),
        Line::styled(
            "h/l page, j/k move, Enter for detail",
            Style::default().fg(Color::DarkGray),
        ),
        Line::from(""),
    ];

    for (idx, m) in live.visible().iter().enumerate() {
        lines.push(match_line(m, idx == live.selected));
        let context = match (&m.tournament, m.round) {
            (Some(t), Some(r)) => format!("    {t} · Round {r}"),
            (Some(t), None) => format!("    {t}"),
            _ => String::new(),
        };
        lines.push(Line::styled(context, Style::default().fg(Color::DarkGray)));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// League / Cup
// ---------------------------------------------------------------------------

fn draw_competition(f: &mut Frame, area: Rect, page: &CompetitionPage) {
    let comp = &page.competition;
    let block = default_border(Color::White).title(format!(" {} · {} ", comp.name, comp.country));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [nav_area, _gap, body] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(navigation_line(page)), nav_area);

    if page.shows_standings() {
        let [standings_area, matches_area] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);
        draw_standings(f, standings_area, page);
        draw_round_matches(f, matches_area, page);
    } else {
        draw_round_matches(f, body, page);
    }
}

/// "◀ Round 5 / 38 ▶" for leagues; the phase strip for cups.
fn navigation_line(page: &CompetitionPage) -> Line<'static> {
    let nav = &page.navigator;
    let arrow = |enabled: bool, glyph: &'static str| {
        let color = if enabled { Color::White } else { Color::DarkGray };
        Span::styled(glyph, Style::default().fg(color))
    };

    let Some(current) = nav.current() else {
        return Line::styled("Finding current round...", Style::default().fg(Color::DarkGray));
    };

    let mut spans = vec![arrow(nav.can_previous(), "◀ ")];
    if page.competition.is_cup() {
        for phase in page.phases.phases() {
            let style = if phase.id == current {
                Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else if phase.is_league_stage() {
                Style::default().fg(Color::Gray)
            } else {
                Style::default().fg(Color::Cyan)
            };
            spans.push(Span::styled(phase_short_label(phase), style));
            spans.push(Span::raw(" "));
        }
        spans.push(arrow(nav.can_next(), "▶"));
        if let Some(phase) = page.current_phase() {
            let stage = if phase.is_league_stage() { "League stage" } else { "Knockout stage" };
            spans.push(Span::styled(
                format!("   {} · {stage}", phase.name),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
    } else {
        spans.push(Span::styled(
            format!("Round {current} / {}", nav.max()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(arrow(nav.can_next(), " ▶"));
    }
    Line::from(spans)
}

fn draw_standings(f: &mut Frame, area: Rect, page: &CompetitionPage) {
    let block = default_border(Color::DarkGray).title(" Standings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(message) = fetch_placeholder(&page.standings, "standings") {
        f.render_widget(message, inner);
        return;
    }
    let rows = page.standings.data().map(|s| s.rows.as_slice()).unwrap_or_default();
    if rows.is_empty() {
        f.render_widget(muted("No standings yet"), inner);
        return;
    }

    let selected = page.visible_matches().get(page.selected_match);
    f.render_widget(
        StandingsTable {
            rows,
            highlight: selected.map(|m| m.home_team.as_str()),
        },
        inner,
    );
}

fn draw_round_matches(f: &mut Frame, area: Rect, page: &CompetitionPage) {
    let title = page
        .current_phase()
        .map(|p| format!(" {} ", p.name))
        .unwrap_or_else(|| " Matches ".to_string());
    let block = default_border(Color::DarkGray).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if matches!(page.matches, FetchState::Idle) {
        f.render_widget(muted("Waiting for standings..."), inner);
        return;
    }
    if let Some(message) = fetch_placeholder(&page.matches, "matches") {
        f.render_widget(message, inner);
        return;
    }

    let mut lines = Vec::new();
    if let Some(message) = page.matches.data().and_then(|m| m.message.as_deref()) {
        lines.push(Line::styled(message.to_string(), Style::default().fg(Color::Yellow)));
        lines.push(Line::from(""));
    }

    let matches = page.visible_matches();
    if matches.is_empty() {
        lines.push(Line::styled(
            "No matches for this round",
            Style::default().fg(Color::DarkGray),
        ));
    }
    for (idx, m) in matches.iter().enumerate() {
        lines.push(match_line(m, idx == page.selected_match));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn match_line(m: &Match, selected: bool) -> Line<'static> {
    let (tag, color) = status_tag(m);
    let marker = if selected { "> " } else { "  " };
    let style = if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{marker}{}", fixture_line(m, NAME_WIDTH)), style),
        Span::raw("  "),
        Span::styled(tag, Style::default().fg(color)),
    ])
}

// ---------------------------------------------------------------------------
// Match detail
// ---------------------------------------------------------------------------

fn draw_match(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Match ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let page = &app.state.match_page;
    if matches!(page.detail, FetchState::Idle) {
        f.render_widget(
            muted("Select a match on Live, League or Cup and press Enter"),
            inner,
        );
        return;
    }
    if let Some(message) = fetch_placeholder(&page.detail, "match") {
        f.render_widget(message, inner);
        return;
    }
    let Some(detail) = page.detail.data() else {
        return;
    };

    let [header_area, period_area, body] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    draw_match_header(f, header_area, detail);
    draw_period_tabs(f, period_area, detail, page.period);

    let [stats_area, side_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(body);
    let [timeline_area, prediction_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(10)]).areas(side_area);

    draw_stats(f, stats_area, detail, page.period, page.scroll_offset);
    draw_timeline(f, timeline_area, detail);
    draw_prediction(f, prediction_area, &page.prediction);
}

fn draw_match_header(f: &mut Frame, area: Rect, detail: &MatchDetail) {
    let m = &detail.summary;
    let (tag, color) = status_tag(m);

    let mut context = vec![kickoff_label(m)];
    context.extend(m.tournament.clone());
    context.extend(m.round.map(|r| format!("Round {r}")));

    let mut venue = Vec::new();
    venue.extend(detail.stadium.clone());
    venue.extend(detail.referee.as_ref().map(|r| format!("Referee: {r}")));
    venue.extend(detail.attendance.map(|a| format!("Attendance: {a}")));

    let lines = vec![
        Line::styled(
            format!("{}  {}  {}", m.home_team, m.score_line(), m.away_team),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(tag, Style::default().fg(color)),
        Line::styled(context.join(" · "), Style::default().fg(Color::Gray)),
        Line::styled(venue.join(" · "), Style::default().fg(Color::DarkGray)),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_period_tabs(f: &mut Frame, area: Rect, detail: &MatchDetail, current: StatPeriod) {
    let titles: Vec<Line> = StatPeriod::ORDER
        .iter()
        .map(|p| {
            let available = match p {
                StatPeriod::SecondHalf => detail.second_half_available(),
                _ => true,
            };
            let style = if available { Style::default() } else { Style::default().fg(Color::DarkGray) };
            Line::styled(p.label(), style)
        })
        .collect();
    let index = StatPeriod::ORDER.iter().position(|p| *p == current).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .select(index);
    f.render_widget(tabs, area);
}

fn draw_stats(f: &mut Frame, area: Rect, detail: &MatchDetail, period: StatPeriod, scroll: u16) {
    let block = default_border(Color::DarkGray).title(format!(" Statistics · {} ", period.label()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let stats: Vec<_> = detail.stats_for(period).collect();
    if stats.is_empty() {
        f.render_widget(muted("No statistics for this period"), inner);
        return;
    }

    let slot = STAT_BAR_HEIGHT + 1;
    let mut y = inner.y;
    for stat in stats.iter().copied().skip(scroll as usize) {
        if y + STAT_BAR_HEIGHT > inner.bottom() {
            break;
        }
        let bar_area = Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), STAT_BAR_HEIGHT);
        f.render_widget(StatBar { stat }, bar_area);
        y += slot;
    }
}

fn draw_timeline(f: &mut Frame, area: Rect, detail: &MatchDetail) {
    let block = default_border(Color::DarkGray).title(" Timeline ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let events = detail.timeline();
    if events.is_empty() {
        f.render_widget(muted("No goals or cards yet"), inner);
        return;
    }

    let lines: Vec<Line> = events
        .iter()
        .map(|incident| {
            let (glyph, color) = match incident.kind() {
                IncidentKind::Goal => ("●", Color::Green),
                _ => match incident.incident_class.as_deref() {
                    Some("red") | Some("yellowRed") => ("▮", Color::Red),
                    _ => ("▮", Color::Yellow),
                },
            };
            let mut who = incident.player_name.clone().unwrap_or_default();
            if let Some(assist) = &incident.assist_name {
                who.push_str(&format!(" ({assist})"));
            }
            let line = Line::from(vec![
                Span::styled(format!("{:>6} ", incident.minute()), Style::default().fg(Color::Gray)),
                Span::styled(glyph, Style::default().fg(color)),
                Span::raw(format!(" {who}")),
            ]);
            if incident.is_home {
                line
            } else {
                line.alignment(Alignment::Right)
            }
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_prediction(f: &mut Frame, area: Rect, prediction: &FetchState<u64, MatchPrediction>) {
    let block = default_border(Color::DarkGray).title(" Prediction ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let p = match prediction {
        FetchState::Loaded { data, .. } | FetchState::Refreshing { data, .. } => data,
        FetchState::Failed { .. } => {
            f.render_widget(muted("No prediction available"), inner);
            return;
        }
        _ => {
            f.render_widget(muted("Loading prediction..."), inner);
            return;
        }
    };

    let r = &p.predictions;
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<11}"), Style::default().fg(Color::Gray)),
            Span::raw(value),
        ])
    };
    let mut lines = vec![
        row(
            "Result",
            format!(
                "H {}  D {}  A {}",
                percent(r.result.home_win),
                percent(r.result.draw),
                percent(r.result.away_win)
            ),
        ),
        row(
            "Goals",
            format!(
                "O2.5 {}  U2.5 {}  BTTS {}",
                percent(r.goals.over_2_5),
                percent(r.goals.under_2_5),
                percent(r.goals.btts)
            ),
        ),
        row(
            "Half-time",
            format!(
                "H {}  D {}  A {}",
                percent(r.half_time.home_leading),
                percent(r.half_time.draw),
                percent(r.half_time.away_leading)
            ),
        ),
        row(
            "First goal",
            format!("H {}  A {}", percent(r.first_goal.home_team), percent(r.first_goal.away_team)),
        ),
        row(
            "Cards",
            format!(
                "~{:.1}  O3.5 {}  U3.5 {}",
                r.cards.expected_total_cards,
                percent(r.cards.over_3_5_cards),
                percent(r.cards.under_3_5_cards)
            ),
        ),
        row("Confidence", p.confidence.clone()),
    ];
    if let Some(warning) = p.warnings.first() {
        lines.push(Line::styled(warning.clone(), Style::default().fg(Color::Yellow)));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

// ---------------------------------------------------------------------------
// Help, logs and shared helpers
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        "1 Live   2 League   3 Cup   4 Match   ? Help   Esc back   q quit",
        "",
        "Live      h/l page    j/k select    Enter open match",
        "League    h/l round   g/G first/last   j/k select   Enter open   c next league",
        "Cup       h/l phase   g/G first/last   j/k select   Enter open",
        "Match     Tab/p or h/l period   j/k scroll stats   r reload",
        "",
        "f full screen    \" toggle logs",
    ];
    f.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan));
    f.render_widget(logger, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn muted(msg: &str) -> Paragraph<'_> {
    Paragraph::new(msg).style(Style::default().fg(Color::DarkGray))
}

/// Loading and failure text for a fetch, or None once there is data.
fn fetch_placeholder<K: PartialEq, T>(state: &FetchState<K, T>, what: &str) -> Option<Paragraph<'static>> {
    if state.is_loading() {
        return Some(
            Paragraph::new(format!("Loading {what}...")).style(Style::default().fg(Color::DarkGray)),
        );
    }
    state.error().map(|message| {
        Paragraph::new(format!("Could not load {what}:\n{message}"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
    })
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
