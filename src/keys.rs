use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut requests: Vec<NetworkRequest> = Vec::new();

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Live),
        (_, Char('2'), _) => guard.update_tab(MenuItem::League),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Cup),
        (_, Char('4'), _) => guard.update_tab(MenuItem::Match),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Live list
        (MenuItem::Live, Char('l') | KeyCode::Right, _) => guard.live_next_page(),
        (MenuItem::Live, Char('h') | KeyCode::Left, _) => guard.live_prev_page(),
        (MenuItem::Live, Char('j') | KeyCode::Down, _) => guard.live_down(),
        (MenuItem::Live, Char('k') | KeyCode::Up, _) => guard.live_up(),

        // Round / phase navigation
        (MenuItem::League | MenuItem::Cup, Char('l') | KeyCode::Right, _) => {
            requests.extend(guard.round_next());
        }
        (MenuItem::League | MenuItem::Cup, Char('h') | KeyCode::Left, _) => {
            requests.extend(guard.round_prev());
        }
        (MenuItem::League | MenuItem::Cup, Char('g') | KeyCode::Home, _) => {
            requests.extend(guard.round_first());
        }
        (MenuItem::League | MenuItem::Cup, Char('G') | KeyCode::End, _) => {
            requests.extend(guard.round_last());
        }
        (MenuItem::League | MenuItem::Cup, Char('j') | KeyCode::Down, _) => guard.round_match_down(),
        (MenuItem::League | MenuItem::Cup, Char('k') | KeyCode::Up, _) => guard.round_match_up(),
        (MenuItem::League, Char('c'), _) => requests.push(guard.cycle_league()),

        (MenuItem::Live | MenuItem::League | MenuItem::Cup, KeyCode::Enter, _) => {
            requests = guard.open_selected_match();
        }

        // Match detail
        (MenuItem::Match, KeyCode::Tab | Char('p'), _) => guard.cycle_period(),
        (MenuItem::Match, Char('l') | KeyCode::Right, _) => guard.step_period(true),
        (MenuItem::Match, Char('h') | KeyCode::Left, _) => guard.step_period(false),
        (MenuItem::Match, Char('j') | KeyCode::Down, _) => guard.match_scroll_down(),
        (MenuItem::Match, Char('k') | KeyCode::Up, _) => guard.match_scroll_up(),
        (MenuItem::Match, Char('r'), _) => requests = guard.reload_open_match(),
        (MenuItem::Match, KeyCode::Esc, _) => guard.close_match(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    drop(guard);
    crate::send_all(network_requests, requests).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;

    fn league_tab_app() -> Arc<Mutex<App>> {
        let mut app = App::with_settings(AppSettings::default());
        app.state.active_tab = MenuItem::League;
        Arc::new(Mutex::new(app))
    }

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(Char(c), KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_key_requests_are_queued_after_state_change() {
        let app = league_tab_app();
        let (tx, mut rx) = mpsc::channel(4);

        handle_key_bindings(press('c'), &app, &tx).await;

        assert_eq!(app.lock().await.state.league.competition.slug, "laliga");
        match rx.try_recv() {
            Ok(NetworkRequest::LoadStandings { competition }) => assert_eq!(competition.slug, "laliga"),
            other => panic!("expected a standings request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_closed_request_channel_does_not_abort_key_handling() {
        let app = league_tab_app();
        let (tx, rx) = mpsc::channel(4);
        drop(rx);

        handle_key_bindings(press('c'), &app, &tx).await;
        handle_key_bindings(press('c'), &app, &tx).await;

        assert_eq!(app.lock().await.state.league.competition.slug, "seriea");
    }
}
