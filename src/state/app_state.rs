use crate::app::MenuItem;
use kickoff_api::competition::{Catalog, Competition};
use kickoff_api::phase::{Phase, PhaseCatalog};
use kickoff_api::{Match, MatchDetail, MatchPrediction, NormalizedMatches, Standings, StatPeriod};

// ---------------------------------------------------------------------------
// Fetch state, one per data dependency
// ---------------------------------------------------------------------------

/// Lifecycle of one remote value. Every pending state remembers the key its
/// request was issued for; a response is applied only while that key is
/// still pending, so a slow answer for an old selection can never land
/// under a newer one.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<K, T> {
    Idle,
    /// First load for `key`; nothing to show yet.
    Loading { key: K },
    /// Re-fetching `key` while still showing the previous data.
    Refreshing { key: K, data: T },
    Loaded { key: K, data: T },
    Failed { key: K, message: String },
}

impl<K, T> Default for FetchState<K, T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<K: PartialEq, T> FetchState<K, T> {
    /// Start loading `key`, dropping whatever was shown before.
    pub fn begin(&mut self, key: K) {
        *self = FetchState::Loading { key };
    }

    /// Start loading `key` but keep showing current data until it resolves.
    pub fn refresh(&mut self, key: K) {
        *self = match std::mem::take(self) {
            FetchState::Loaded { data, .. } | FetchState::Refreshing { data, .. } => {
                FetchState::Refreshing { key, data }
            }
            _ => FetchState::Loading { key },
        };
    }

    /// Apply a response. Returns false (and changes nothing) when `key` is
    /// not the pending request.
    pub fn resolve(&mut self, key: &K, result: Result<T, String>) -> bool {
        if self.pending_key() != Some(key) {
            return false;
        }
        let key = match std::mem::take(self) {
            FetchState::Loading { key } | FetchState::Refreshing { key, .. } => key,
            _ => return false,
        };
        *self = match result {
            Ok(data) => FetchState::Loaded { key, data },
            Err(message) => FetchState::Failed { key, message },
        };
        true
    }

    pub fn key(&self) -> Option<&K> {
        match self {
            FetchState::Idle => None,
            FetchState::Loading { key }
            | FetchState::Refreshing { key, .. }
            | FetchState::Loaded { key, .. }
            | FetchState::Failed { key, .. } => Some(key),
        }
    }

    fn pending_key(&self) -> Option<&K> {
        match self {
            FetchState::Loading { key } | FetchState::Refreshing { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Loaded { data, .. } | FetchState::Refreshing { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchState::Loaded { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Round / phase navigation
// ---------------------------------------------------------------------------

/// Which round to open first once the standings are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialRoundPolicy {
    /// The round just completed: the highest "matches played" in the table.
    Completed,
    /// The round about to be played: one past the highest "matches played".
    Upcoming,
}

pub const INITIAL_ROUND_POLICY: InitialRoundPolicy = InitialRoundPolicy::Completed;

/// Initial round for a table, always within `1..=max`. An empty table, or
/// one where nobody has played yet, starts at round 1.
pub fn initial_round(standings: &Standings, policy: InitialRoundPolicy, max: u32) -> u32 {
    let max_played = standings.max_played();
    let round = match policy {
        InitialRoundPolicy::Completed if max_played > 0 => max_played,
        InitialRoundPolicy::Completed => 1,
        InitialRoundPolicy::Upcoming => max_played.saturating_add(1),
    };
    round.clamp(1, max.max(1))
}

/// Current round/phase selection with inclusive bounds `1..=max`.
/// Nothing is selected until the standings have been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundNavigator {
    current: Option<u32>,
    max: u32,
}

impl RoundNavigator {
    pub fn new(max: u32) -> Self {
        Self { current: None, max: max.max(1) }
    }

    pub fn current(&self) -> Option<u32> {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Pick the opening round. A failed standings load (`None`) still
    /// selects round 1 so the page never stays without a selection.
    pub fn select_initial(&mut self, standings: Option<&Standings>, policy: InitialRoundPolicy) -> u32 {
        let round = standings
            .map(|s| initial_round(s, policy, self.max))
            .unwrap_or(1);
        self.current = Some(round);
        round
    }

    pub fn can_previous(&self) -> bool {
        self.current.is_some_and(|c| c > 1)
    }

    pub fn can_next(&self) -> bool {
        self.current.is_some_and(|c| c < self.max)
    }

    /// Step back one round. No-op at round 1.
    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.current = self.current.map(|c| c - 1);
        true
    }

    /// Step forward one round. No-op at the last round.
    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.current = self.current.map(|c| c + 1);
        true
    }

    /// Jump straight to `round`. Out-of-range or unchanged targets are no-ops.
    pub fn jump_to(&mut self, round: u32) -> bool {
        if !(1..=self.max).contains(&round) || self.current == Some(round) {
            return false;
        }
        self.current = Some(round);
        true
    }
}

// ---------------------------------------------------------------------------
// Competition pages (League tab and Cup tab)
// ---------------------------------------------------------------------------

/// Identifies one round/phase request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoundKey {
    pub competition: String,
    pub round: u32,
}

#[derive(Debug)]
pub struct CompetitionPage {
    pub competition: Competition,
    pub phases: PhaseCatalog,
    pub navigator: RoundNavigator,
    /// Keyed by competition slug.
    pub standings: FetchState<String, Standings>,
    pub matches: FetchState<RoundKey, NormalizedMatches>,
    pub selected_match: usize,
}

impl CompetitionPage {
    pub fn new(competition: Competition) -> Self {
        let phases = competition.phases();
        Self {
            navigator: RoundNavigator::new(phases.max_phase()),
            phases,
            competition,
            standings: FetchState::default(),
            matches: FetchState::default(),
            selected_match: 0,
        }
    }

    pub fn slug(&self) -> &str {
        &self.competition.slug
    }

    /// Reset the page and mark the standings as loading. Round selection
    /// waits for the standings response.
    pub fn begin_standings(&mut self) {
        self.navigator = RoundNavigator::new(self.phases.max_phase());
        self.matches = FetchState::default();
        self.selected_match = 0;
        self.standings.begin(self.competition.slug.clone());
    }

    /// Apply a standings response. When accepted, selects the opening round
    /// (round 1 on failure) and returns the round to fetch.
    pub fn on_standings(&mut self, slug: &str, result: Result<Standings, String>) -> Option<RoundKey> {
        if !self.standings.resolve(&slug.to_string(), result) {
            return None;
        }
        let round = self
            .navigator
            .select_initial(self.standings.data(), INITIAL_ROUND_POLICY);
        Some(self.begin_round(round))
    }

    pub fn step_previous(&mut self) -> Option<RoundKey> {
        self.navigator
            .previous()
            .then(|| self.begin_current())
            .flatten()
    }

    pub fn step_next(&mut self) -> Option<RoundKey> {
        self.navigator.next().then(|| self.begin_current()).flatten()
    }

    pub fn jump_to(&mut self, round: u32) -> Option<RoundKey> {
        self.navigator.jump_to(round).then(|| self.begin_current()).flatten()
    }

    pub fn jump_first(&mut self) -> Option<RoundKey> {
        self.jump_to(1)
    }

    pub fn jump_last(&mut self) -> Option<RoundKey> {
        self.jump_to(self.navigator.max())
    }

    /// Apply a round response; stale keys are ignored.
    pub fn on_matches(&mut self, key: &RoundKey, result: Result<NormalizedMatches, String>) -> bool {
        let accepted = self.matches.resolve(key, result);
        if accepted {
            let len = self.matches.data().map(|m| m.matches.len()).unwrap_or(0);
            self.selected_match = self.selected_match.min(len.saturating_sub(1));
        }
        accepted
    }

    /// Key to poll for the current round, keeping the shown list.
    pub fn refresh_key(&mut self) -> Option<RoundKey> {
        if !self.matches.is_loaded() {
            return None;
        }
        let key = self.current_key()?;
        self.matches.refresh(key.clone());
        Some(key)
    }

    pub fn current_key(&self) -> Option<RoundKey> {
        self.navigator.current().map(|round| RoundKey {
            competition: self.competition.slug.clone(),
            round,
        })
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        self.navigator.current().and_then(|id| self.phases.get(id))
    }

    /// Standings are shown for leagues and for a cup's league stage only.
    pub fn shows_standings(&self) -> bool {
        !self.competition.is_cup() || self.current_phase().is_none_or(Phase::is_league_stage)
    }

    pub fn visible_matches(&self) -> &[Match] {
        self.matches
            .data()
            .map(|m| m.matches.as_slice())
            .unwrap_or_default()
    }

    pub fn select_down(&mut self) {
        let max = self.visible_matches().len().saturating_sub(1);
        if self.selected_match < max {
            self.selected_match += 1;
        }
    }

    pub fn select_up(&mut self) {
        self.selected_match = self.selected_match.saturating_sub(1);
    }

    pub fn selected_match_id(&self) -> Option<u64> {
        self.visible_matches().get(self.selected_match).map(|m| m.id)
    }

    fn begin_round(&mut self, round: u32) -> RoundKey {
        let key = RoundKey {
            competition: self.competition.slug.clone(),
            round,
        };
        self.selected_match = 0;
        self.matches.begin(key.clone());
        key
    }

    fn begin_current(&mut self) -> Option<RoundKey> {
        let round = self.navigator.current()?;
        Some(self.begin_round(round))
    }
}

// ---------------------------------------------------------------------------
// Live page
// ---------------------------------------------------------------------------

pub const MATCHES_PER_PAGE: usize = 6;

#[derive(Debug, Default)]
pub struct LivePage {
    /// Keyed by poll sequence number; only the newest poll is applied.
    pub matches: FetchState<u64, Vec<Match>>,
    pub page: usize,
    pub selected: usize,
    next_seq: u64,
}

impl LivePage {
    /// Issue the next poll, keeping the current list on screen.
    pub fn next_poll(&mut self) -> u64 {
        self.next_seq += 1;
        self.matches.refresh(self.next_seq);
        self.next_seq
    }

    pub fn on_matches(&mut self, seq: u64, result: Result<Vec<Match>, String>) -> bool {
        let accepted = self.matches.resolve(&seq, result);
        if accepted {
            self.page = self.page.min(self.page_count().saturating_sub(1));
            self.selected = self.selected.min(self.visible().len().saturating_sub(1));
        }
        accepted
    }

    pub fn all(&self) -> &[Match] {
        self.matches.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn page_count(&self) -> usize {
        self.all().len().div_ceil(MATCHES_PER_PAGE)
    }

    /// Matches on the current page.
    pub fn visible(&self) -> &[Match] {
        let all = self.all();
        let start = (self.page * MATCHES_PER_PAGE).min(all.len());
        let end = (start + MATCHES_PER_PAGE).min(all.len());
        &all[start..end]
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    pub fn select_down(&mut self) {
        let max = self.visible().len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_match_id(&self) -> Option<u64> {
        self.visible().get(self.selected).map(|m| m.id)
    }
}

// ---------------------------------------------------------------------------
// Match detail page
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MatchPage {
    pub detail: FetchState<u64, MatchDetail>,
    pub prediction: FetchState<u64, MatchPrediction>,
    pub period: StatPeriod,
    pub scroll_offset: u16,
}

impl MatchPage {
    pub fn open(&mut self, match_id: u64) {
        self.detail.begin(match_id);
        self.prediction.begin(match_id);
        self.period = StatPeriod::All;
        self.scroll_offset = 0;
    }

    pub fn match_id(&self) -> Option<u64> {
        self.detail.key().copied()
    }

    /// Re-poll the open match while it is in play.
    pub fn refresh_live(&mut self) -> Option<u64> {
        let live = self.detail.data().is_some_and(|d| d.summary.is_live());
        if !live || !self.detail.is_loaded() {
            return None;
        }
        let id = self.match_id()?;
        self.detail.refresh(id);
        Some(id)
    }

    /// Move to the next period tab that has something to show.
    pub fn cycle_period(&mut self) {
        let mut next = self.period.next();
        if next == StatPeriod::SecondHalf && !self.second_half_available() {
            next = next.next();
        }
        self.period = next;
    }

    pub fn select_period(&mut self, period: StatPeriod) -> bool {
        if period == StatPeriod::SecondHalf && !self.second_half_available() {
            return false;
        }
        self.period = period;
        self.scroll_offset = 0;
        true
    }

    fn second_half_available(&self) -> bool {
        self.detail
            .data()
            .is_some_and(MatchDetail::second_half_available)
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub catalog: Catalog,
    pub live: LivePage,
    pub league: CompetitionPage,
    pub cup: Option<CompetitionPage>,
    pub match_page: MatchPage,
}

impl AppState {
    pub fn new(catalog: Catalog, league: Competition) -> Self {
        let cup = catalog.cups().next().cloned().map(CompetitionPage::new);
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_logs: false,
            last_error: None,
            live: LivePage::default(),
            league: CompetitionPage::new(league),
            cup,
            match_page: MatchPage::default(),
            catalog,
        }
    }

    /// The page shown by the League or Cup tab.
    pub fn competition_page_mut(&mut self, tab: MenuItem) -> Option<&mut CompetitionPage> {
        match tab {
            MenuItem::League => Some(&mut self.league),
            MenuItem::Cup => self.cup.as_mut(),
            _ => None,
        }
    }

    /// Every competition page, for routing responses by key.
    pub fn competition_pages_mut(&mut self) -> impl Iterator<Item = &mut CompetitionPage> {
        std::iter::once(&mut self.league).chain(self.cup.as_mut())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
