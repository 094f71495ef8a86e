use crate::state::app_state::RoundKey;
use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use kickoff_api::competition::Competition;
use kickoff_api::{Match, MatchDetail, MatchPrediction, NormalizedMatches, Standings};

/// Every request carries the key its answer will be checked against.
#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadLive { seq: u64 },
    LoadStandings { competition: Competition },
    LoadRound { competition: Competition, key: RoundKey },
    LoadMatchDetail { match_id: u64 },
    LoadPrediction { match_id: u64 },
}

/// Failures travel as display strings; the worker has already logged the
/// typed error.
#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    LiveLoaded { seq: u64, result: Result<Vec<Match>, String> },
    StandingsLoaded { slug: String, result: Result<Standings, String> },
    RoundLoaded { key: RoundKey, result: Result<NormalizedMatches, String> },
    MatchDetailLoaded { match_id: u64, result: Result<MatchDetail, String> },
    PredictionLoaded { match_id: u64, result: Result<MatchPrediction, String> },
}

impl NetworkResponse {
    pub fn is_ok(&self) -> bool {
        match self {
            NetworkResponse::LoadingStateChanged { .. } => true,
            NetworkResponse::LiveLoaded { result, .. } => result.is_ok(),
            NetworkResponse::StandingsLoaded { result, .. } => result.is_ok(),
            NetworkResponse::RoundLoaded { result, .. } => result.is_ok(),
            NetworkResponse::MatchDetailLoaded { result, .. } => result.is_ok(),
            NetworkResponse::PredictionLoaded { result, .. } => result.is_ok(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// Live list and an open live match.
    Live,
    /// Currently selected league round and cup phase.
    Rounds,
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    Refresh(RefreshKind),
}
