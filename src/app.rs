use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, CompetitionPage, RoundKey};
use crate::state::messages::{NetworkRequest, RefreshKind};
use kickoff_api::competition::{Catalog, Competition};
use kickoff_api::{Match, MatchDetail, MatchPrediction, NormalizedMatches, StatPeriod, Standings};
use log::{error, info, warn};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Live,
    League,
    Cup,
    Match,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self::with_settings(AppSettings::load())
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        let mut catalog = Catalog::default();
        if let Some(overrides) = settings.segment_overrides.as_deref() {
            for entry in catalog.apply_overrides(overrides) {
                warn!("ignoring segment override {entry:?}: no such competition");
            }
        }
        if let Some(rounds) = settings.knockout_rounds.as_deref() {
            for entry in catalog.apply_knockout_rounds(rounds) {
                warn!("ignoring knockout round {entry:?}: expected cup:phase=round");
            }
        }

        let league = pick_league(&catalog, &settings.league);
        let app = Self {
            state: AppState::new(catalog, league),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Startup and periodic refresh
    // -----------------------------------------------------------------------

    /// Initial loads: live list, league standings, cup standings.
    pub fn on_app_started(&mut self) -> Vec<NetworkRequest> {
        info!("using API at {}", self.settings.api_url);
        let mut requests = vec![self.poll_live()];
        requests.push(begin_standings(&mut self.state.league));
        if let Some(cup) = self.state.cup.as_mut() {
            requests.push(begin_standings(cup));
        }
        requests
    }

    pub fn on_refresh(&mut self, kind: RefreshKind) -> Vec<NetworkRequest> {
        match kind {
            RefreshKind::Live => {
                let mut requests = vec![self.poll_live()];
                if let Some(match_id) = self.state.match_page.refresh_live() {
                    requests.push(NetworkRequest::LoadMatchDetail { match_id });
                }
                requests
            }
            RefreshKind::Rounds => self
                .state
                .competition_pages_mut()
                .filter_map(|page| {
                    let key = page.refresh_key()?;
                    Some(round_request(page, key))
                })
                .collect(),
        }
    }

    fn poll_live(&mut self) -> NetworkRequest {
        NetworkRequest::LoadLive { seq: self.state.live.next_poll() }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_live_loaded(&mut self, seq: u64, result: Result<Vec<Match>, String>) {
        let failure = result.as_ref().err().cloned();
        if self.state.live.on_matches(seq, result) {
            self.record_outcome("live matches", failure);
        }
    }

    /// Returns the round request that follows a resolved standings load.
    pub fn on_standings_loaded(&mut self, slug: &str, result: Result<Standings, String>) -> Option<NetworkRequest> {
        let failure = result.as_ref().err().cloned();
        let page = self
            .state
            .competition_pages_mut()
            .find(|page| page.slug() == slug)?;
        let key = page.on_standings(slug, result)?;
        let request = round_request(page, key);
        self.record_outcome("standings", failure);
        Some(request)
    }

    pub fn on_round_loaded(&mut self, key: RoundKey, result: Result<NormalizedMatches, String>) {
        let failure = result.as_ref().err().cloned();
        let accepted = self
            .state
            .competition_pages_mut()
            .any(|page| page.slug() == key.competition && page.on_matches(&key, result.clone()));
        if accepted {
            self.record_outcome("matches", failure);
        }
    }

    pub fn on_match_detail_loaded(&mut self, match_id: u64, result: Result<MatchDetail, String>) {
        let failure = result.as_ref().err().cloned();
        if self.state.match_page.detail.resolve(&match_id, result) {
            self.record_outcome("match detail", failure);
        }
    }

    pub fn on_prediction_loaded(&mut self, match_id: u64, result: Result<MatchPrediction, String>) {
        // Predictions are optional; a failure only blanks the panel.
        if let Err(message) = &result {
            warn!("no prediction for match {match_id}: {message}");
        }
        self.state.match_page.prediction.resolve(&match_id, result);
    }

    fn record_outcome(&mut self, what: &str, failure: Option<String>) {
        match failure {
            Some(message) => {
                error!("could not load {what}: {message}");
                self.state.last_error = Some(message);
            }
            None => self.state.last_error = None,
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    /// Leave the match page for whichever list it was opened from.
    pub fn close_match(&mut self) {
        if self.state.active_tab == MenuItem::Match {
            let back = match self.state.previous_tab {
                MenuItem::Match | MenuItem::Help => MenuItem::Live,
                tab => tab,
            };
            self.update_tab(back);
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Live list
    // -----------------------------------------------------------------------

    pub fn live_next_page(&mut self) {
        self.state.live.next_page();
    }

    pub fn live_prev_page(&mut self) {
        self.state.live.prev_page();
    }

    pub fn live_down(&mut self) {
        self.state.live.select_down();
    }

    pub fn live_up(&mut self) {
        self.state.live.select_up();
    }

    // -----------------------------------------------------------------------
    // Round / phase navigation, delegated to CompetitionPage
    // -----------------------------------------------------------------------

    pub fn round_next(&mut self) -> Option<NetworkRequest> {
        self.navigate(CompetitionPage::step_next)
    }

    pub fn round_prev(&mut self) -> Option<NetworkRequest> {
        self.navigate(CompetitionPage::step_previous)
    }

    pub fn round_first(&mut self) -> Option<NetworkRequest> {
        self.navigate(CompetitionPage::jump_first)
    }

    pub fn round_last(&mut self) -> Option<NetworkRequest> {
        self.navigate(CompetitionPage::jump_last)
    }

    fn navigate(&mut self, step: fn(&mut CompetitionPage) -> Option<RoundKey>) -> Option<NetworkRequest> {
        let page = self.state.competition_page_mut(self.state.active_tab)?;
        let key = step(page)?;
        Some(round_request(page, key))
    }

    pub fn round_match_down(&mut self) {
        if let Some(page) = self.state.competition_page_mut(self.state.active_tab) {
            page.select_down();
        }
    }

    pub fn round_match_up(&mut self) {
        if let Some(page) = self.state.competition_page_mut(self.state.active_tab) {
            page.select_up();
        }
    }

    /// Switch the League tab to the next league in the catalog.
    pub fn cycle_league(&mut self) -> NetworkRequest {
        let leagues: Vec<&Competition> = self.state.catalog.leagues().collect();
        let position = leagues
            .iter()
            .position(|c| c.slug == self.state.league.competition.slug)
            .unwrap_or(0);
        let next = leagues
            .get((position + 1) % leagues.len().max(1))
            .map(|c| (*c).clone())
            .unwrap_or_else(|| self.state.league.competition.clone());

        info!("switching league to {}", next.name);
        self.state.league = CompetitionPage::new(next);
        begin_standings(&mut self.state.league)
    }

    // -----------------------------------------------------------------------
    // Match detail
    // -----------------------------------------------------------------------

    /// Open the match selected on the active list. Switches to the Match tab
    /// as a side-effect.
    pub fn open_selected_match(&mut self) -> Vec<NetworkRequest> {
        let selected = match self.state.active_tab {
            MenuItem::Live => self.state.live.selected_match_id(),
            MenuItem::League => self.state.league.selected_match_id(),
            MenuItem::Cup => self.state.cup.as_ref().and_then(CompetitionPage::selected_match_id),
            MenuItem::Match | MenuItem::Help => None,
        };
        let Some(match_id) = selected else {
            return Vec::new();
        };
        self.update_tab(MenuItem::Match);
        self.reload_match(match_id)
    }

    pub fn reload_open_match(&mut self) -> Vec<NetworkRequest> {
        match self.state.match_page.match_id() {
            Some(id) => self.reload_match(id),
            None => Vec::new(),
        }
    }

    fn reload_match(&mut self, match_id: u64) -> Vec<NetworkRequest> {
        self.state.match_page.open(match_id);
        vec![
            NetworkRequest::LoadMatchDetail { match_id },
            NetworkRequest::LoadPrediction { match_id },
        ]
    }

    pub fn cycle_period(&mut self) {
        self.state.match_page.cycle_period();
    }

    /// Move one period tab left or right, skipping tabs with nothing to show.
    pub fn step_period(&mut self, forward: bool) {
        let order = StatPeriod::ORDER;
        let Some(current) = order.iter().position(|p| *p == self.state.match_page.period) else {
            return;
        };
        let candidates: Vec<StatPeriod> = if forward {
            order[current + 1..].to_vec()
        } else {
            order[..current].iter().rev().copied().collect()
        };
        for period in candidates {
            if self.state.match_page.select_period(period) {
                return;
            }
        }
    }

    pub fn match_scroll_down(&mut self) {
        self.state.match_page.scroll_offset = self.state.match_page.scroll_offset.saturating_add(1);
    }

    pub fn match_scroll_up(&mut self) {
        self.state.match_page.scroll_offset = self.state.match_page.scroll_offset.saturating_sub(1);
    }
}

fn pick_league(catalog: &Catalog, slug: &str) -> Competition {
    let chosen = catalog
        .by_slug(slug)
        .filter(|c| !c.is_cup())
        .or_else(|| catalog.leagues().next());
    match chosen {
        Some(league) => league.clone(),
        None => {
            warn!("no league available for {slug:?}");
            catalog.all()[0].clone()
        }
    }
}

fn begin_standings(page: &mut CompetitionPage) -> NetworkRequest {
    page.begin_standings();
    NetworkRequest::LoadStandings { competition: page.competition.clone() }
}

fn round_request(page: &CompetitionPage, key: RoundKey) -> NetworkRequest {
    NetworkRequest::LoadRound { competition: page.competition.clone(), key }
}
