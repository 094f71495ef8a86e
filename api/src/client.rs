use crate::competition::Competition;
use crate::phase::PhaseRoute;
use crate::wire::{DetailPayload, MatchesPayload, StandingsPayload};
use crate::{Match, MatchDetail, MatchPrediction, NormalizedMatches, Standings};
use log::{debug, error};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Football scores API client. Every call is a fresh request: no retries,
/// no caching.
#[derive(Debug, Clone)]
pub struct FootballApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for FootballApi {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("unexpected payload from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FootballApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            client: Client::builder()
                .user_agent("kickoff/0.1 (terminal football scores)")
                .default_headers(headers)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Matches currently in play, across all tournaments.
    pub async fn fetch_live_matches(&self) -> ApiResult<Vec<Match>> {
        self.get("/matches/live").await
    }

    /// Fixtures of one league round. An empty list is a valid answer.
    pub async fn fetch_round_matches(&self, segment: &str, round: u32) -> ApiResult<Vec<Match>> {
        require_positive("round", u64::from(round))?;
        self.get(&format!("/matches/tournament/{segment}/round/{round}"))
            .await
    }

    /// Full detail for one match, wrapped under `match` or not.
    pub async fn fetch_match_detail(&self, match_id: u64) -> ApiResult<MatchDetail> {
        require_positive("match id", match_id)?;
        let raw: DetailPayload = self.get(&format!("/matches/{match_id}/details")).await?;
        Ok(raw.into())
    }

    /// League-stage round of a cup competition.
    pub async fn fetch_phase_matches(&self, segment: &str, phase_id: u32) -> ApiResult<Vec<Match>> {
        require_positive("phase", u64::from(phase_id))?;
        self.get(&format!("/matches/{segment}/phase/{phase_id}"))
            .await
    }

    pub async fn fetch_qualification_round(&self, segment: &str, round: u32) -> ApiResult<Vec<Match>> {
        require_positive("round", u64::from(round))?;
        self.get(&format!("/matches/{segment}/qualification/{round}"))
            .await
    }

    /// Knockout matches. `None` hits the dedicated playoff endpoint; a round
    /// id addresses one knockout round.
    pub async fn fetch_playoff(&self, segment: &str, round_id: Option<u32>) -> ApiResult<NormalizedMatches> {
        let path = match round_id {
            Some(id) => {
                require_positive("round id", u64::from(id))?;
                format!("/matches/{segment}/playoff/{id}")
            }
            None => format!("/matches/{segment}/playoff"),
        };
        let raw: MatchesPayload = self.get(&path).await?;
        Ok(raw.into())
    }

    /// Standings, whether served as bare rows or as a table object.
    pub async fn fetch_standings(&self, segment: &str) -> ApiResult<Standings> {
        let raw: StandingsPayload = self
            .get(&format!("/matches/tournament/{segment}/standings"))
            .await?;
        Ok(raw.into())
    }

    pub async fn fetch_prediction(&self, match_id: u64) -> ApiResult<MatchPrediction> {
        require_positive("match id", match_id)?;
        self.get(&format!("/predictions/match/{match_id}")).await
    }

    /// Prediction engine settings. The backend does not fix their shape.
    pub async fn fetch_prediction_settings(&self) -> ApiResult<serde_json::Value> {
        self.get("/predictions/settings").await
    }

    /// Matches for one round/phase of `competition`, routed through its
    /// phase catalog. Phases without a route yield an empty list and send
    /// no request.
    pub async fn fetch_phase(&self, competition: &Competition, phase_id: u32) -> ApiResult<NormalizedMatches> {
        match competition.phases().route(phase_id) {
            PhaseRoute::LeagueStage(round) if competition.is_cup() => self
                .fetch_phase_matches(&competition.cup_segment, round)
                .await
                .map(NormalizedMatches::from),
            PhaseRoute::LeagueStage(round) => self
                .fetch_round_matches(&competition.tournament_segment, round)
                .await
                .map(NormalizedMatches::from),
            PhaseRoute::Playoff => self.fetch_playoff(&competition.cup_segment, None).await,
            PhaseRoute::Knockout(round_id) => {
                self.fetch_playoff(&competition.cup_segment, Some(round_id))
                    .await
            }
            PhaseRoute::Unmapped => {
                debug!("no route for phase {phase_id} of {}", competition.slug);
                Ok(NormalizedMatches::default())
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = format!("{}{path}", self.base_url);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| {
                error!("no response from {url}: {source}");
                ApiError::Network { url: url.clone(), source }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("{status} from {url}");
            return Err(ApiError::Status { url, status });
        }

        response.json::<T>().await.map_err(|source| {
            error!("could not decode payload from {url}: {source}");
            ApiError::Decode { url, source }
        })
    }
}

fn require_positive(what: &str, value: u64) -> ApiResult<()> {
    if value == 0 {
        return Err(ApiError::InvalidRequest(format!("{what} must be at least 1")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::Catalog;
    use mockito::{Matcher, Server};

    const TWO_MATCHES: &str = r#"[
        {"id": 1, "homeTeam": "Arsenal", "awayTeam": "Chelsea", "homeScore": 1, "awayScore": 0,
         "status": "Live", "startTime": "2025-03-01T15:00:00Z", "tournament": "Premier League", "round": 27},
        {"id": 2, "homeTeam": "Inter", "awayTeam": "Milan", "homeScore": null, "awayScore": null,
         "status": "Not started", "startTime": "2025-03-01T19:45:00Z"}
    ]"#;

    async fn json_mock(server: &mut Server, path: &str, body: &str) -> mockito::Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_live_matches_sends_json_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/matches/live")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TWO_MATCHES)
            .create_async()
            .await;

        let api = FootballApi::with_base_url(server.url());
        let matches = api.fetch_live_matches().await.unwrap();

        mock.assert_async().await;
        assert_eq!(matches.len(), 2);
        assert!(matches[0].is_live());
        assert_eq!(matches[1].home_score, None);
        assert_eq!(matches[1].tournament, None);
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_ignored() {
        let mut server = Server::new_async().await;
        let mock = json_mock(&mut server, "/matches/live", "[]").await;

        let api = FootballApi::with_base_url(format!("{}/", server.url()));
        assert!(api.fetch_live_matches().await.unwrap().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_round_past_schedule_is_empty_not_error() {
        let mut server = Server::new_async().await;
        let mock = json_mock(&mut server, "/matches/tournament/premier/round/39", "[]").await;

        let api = FootballApi::with_base_url(server.url());
        let matches = api.fetch_round_matches("premier", 39).await.unwrap();

        mock.assert_async().await;
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_round_zero_is_rejected_without_request() {
        let mut server = Server::new_async().await;
        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let api = FootballApi::with_base_url(server.url());
        let err = api.fetch_round_matches("premier", 0).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidRequest(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_propagates() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/matches/tournament/premier/standings")
            .with_status(503)
            .create_async()
            .await;

        let api = FootballApi::with_base_url(server.url());
        match api.fetch_standings("premier").await {
            Err(ApiError::Status { status, url }) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert!(url.ends_with("/matches/tournament/premier/standings"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_not_found_is_an_error_too() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", "/matches/5/details").with_status(404).create_async().await;

        let api = FootballApi::with_base_url(server.url());
        let err = api.fetch_match_detail(5).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_decode_error() {
        let mut server = Server::new_async().await;
        let _m = json_mock(&mut server, "/matches/live", r#"{"unexpected": true}"#).await;

        let api = FootballApi::with_base_url(server.url());
        let err = api.fetch_live_matches().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_error_object_with_success_status_is_decode_error() {
        let mut server = Server::new_async().await;
        let _playoff = json_mock(
            &mut server,
            "/matches/champions-league/playoff/5",
            r#"{"error": "tournament not found"}"#,
        )
        .await;
        let _standings = json_mock(
            &mut server,
            "/matches/tournament/premier/standings",
            r#"{"error": "upstream quota exceeded"}"#,
        )
        .await;

        let api = FootballApi::with_base_url(server.url());
        let err = api.fetch_playoff("champions-league", Some(5)).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }), "{err}");
        let err = api.fetch_standings("premier").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let api = FootballApi::with_base_url("http://127.0.0.1:1");
        let err = api.fetch_live_matches().await.unwrap_err();
        assert!(matches!(err, ApiError::Network { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_detail_is_unwrapped_from_envelope() {
        let mut server = Server::new_async().await;
        let _m = json_mock(
            &mut server,
            "/matches/42/details",
            r#"{"match": {"id": 42, "homeTeam": "Porto", "awayTeam": "Benfica", "status": "Ended",
                "startTime": "2025-02-02T20:30:00Z", "homeScore": 2, "awayScore": 2, "referee": "A. Nobre",
                "stats": [{"period": "ALL", "name": "Corner kicks", "homeValue": "6", "awayValue": "3", "compareCode": 1}]}}"#,
        )
        .await;

        let api = FootballApi::with_base_url(server.url());
        let detail = api.fetch_match_detail(42).await.unwrap();
        assert_eq!(detail.summary.id, 42);
        assert_eq!(detail.referee.as_deref(), Some("A. Nobre"));
        assert_eq!(detail.stats.len(), 1);
        assert!(detail.incidents.is_empty());
    }

    #[tokio::test]
    async fn test_standings_table_object() {
        let mut server = Server::new_async().await;
        let _m = json_mock(
            &mut server,
            "/matches/tournament/ChampionsLeague/standings",
            r#"{"tournament": {"id": 7, "name": "UEFA Champions League"}, "type": "total", "rows": [
                {"position": 1, "team": {"id": 10, "name": "Liverpool"}, "matches": 6, "wins": 6, "draws": 0, "losses": 0,
                 "scoresFor": 13, "scoresAgainst": 1, "points": 18, "promotion": {"id": 1, "text": "Playoffs"}, "updatedAt": ""}
            ]}"#,
        )
        .await;

        let api = FootballApi::with_base_url(server.url());
        let standings = api.fetch_standings("ChampionsLeague").await.unwrap();
        assert_eq!(standings.max_played(), 6);
        assert_eq!(standings.rows[0].team.name, "Liverpool");
    }

    #[tokio::test]
    async fn test_cup_phases_route_to_their_endpoints() {
        let mut server = Server::new_async().await;
        let league_stage = json_mock(&mut server, "/matches/champions-league/phase/3", TWO_MATCHES).await;
        let playoff = json_mock(
            &mut server,
            "/matches/champions-league/playoff",
            r#"{"message": "Playoff draw pending", "tournament": "UCL", "matches": []}"#,
        )
        .await;
        let round_of_16 = json_mock(&mut server, "/matches/champions-league/playoff/5", TWO_MATCHES).await;

        let api = FootballApi::with_base_url(server.url());
        let catalog = Catalog::default();
        let ucl = catalog.by_slug("champions-league").unwrap();

        let phase3 = api.fetch_phase(ucl, 3).await.unwrap();
        assert_eq!(phase3.matches.len(), 2);
        assert_eq!(phase3.message, None);

        let phase9 = api.fetch_phase(ucl, 9).await.unwrap();
        assert!(phase9.matches.is_empty());
        assert_eq!(phase9.message.as_deref(), Some("Playoff draw pending"));

        let phase10 = api.fetch_phase(ucl, 10).await.unwrap();
        assert_eq!(phase10.matches.len(), 2);

        league_stage.assert_async().await;
        playoff.assert_async().await;
        round_of_16.assert_async().await;
    }

    #[tokio::test]
    async fn test_league_rounds_use_tournament_path() {
        let mut server = Server::new_async().await;
        let mock = json_mock(&mut server, "/matches/tournament/laliga/round/12", TWO_MATCHES).await;

        let api = FootballApi::with_base_url(server.url());
        let catalog = Catalog::default();
        let result = api.fetch_phase(catalog.by_slug("laliga").unwrap(), 12).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.matches.len(), 2);
    }

    #[tokio::test]
    async fn test_unmapped_phase_sends_nothing() {
        let mut server = Server::new_async().await;
        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let api = FootballApi::with_base_url(server.url());
        let catalog = Catalog::default();
        let premier = catalog.by_slug("premier").unwrap();

        assert_eq!(api.fetch_phase(premier, 39).await.unwrap(), NormalizedMatches::default());
        let ucl = catalog.by_slug("champions-league").unwrap();
        assert_eq!(api.fetch_phase(ucl, 12).await.unwrap(), NormalizedMatches::default());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_qualification_round_path() {
        let mut server = Server::new_async().await;
        let mock = json_mock(&mut server, "/matches/ChampionsLeague/qualification/2", "[]").await;

        let api = FootballApi::with_base_url(server.url());
        assert!(api.fetch_qualification_round("ChampionsLeague", 2).await.unwrap().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_prediction_decodes() {
        let mut server = Server::new_async().await;
        let _m = json_mock(
            &mut server,
            "/predictions/match/42",
            r#"{
                "match": {"id": 42, "homeTeam": "Porto", "awayTeam": "Benfica", "tournament": "Liga Portugal", "round": 21, "dateTime": "2025-02-02T20:30:00Z"},
                "homeTeamAnalysis": {"gamesAnalyzed": 5, "context": "home", "results": {"wins": 3, "draws": 1, "losses": 1, "winPercentage": 60.0, "gamesPlayed": 5}},
                "awayTeamAnalysis": {"gamesAnalyzed": 5, "context": "away"},
                "predictions": {
                    "result": {"homeWin": 45.5, "draw": 27.0, "awayWin": 27.5},
                    "goals": {"over25": 52.0, "under25": 48.0, "btts": 55.0},
                    "firstGoal": {"homeTeam": 58.0, "awayTeam": 42.0, "reasoning": "Home side scores early"},
                    "halfTime": {"homeLeading": 35.0, "draw": 45.0, "awayLeading": 20.0},
                    "cards": {"expectedTotalCards": 4.2, "over35Cards": 61.0, "under35Cards": 39.0, "mostDisciplinedTeam": "Porto"}
                },
                "confidence": "Medium",
                "warnings": ["Small sample"]
            }"#,
        )
        .await;

        let api = FootballApi::with_base_url(server.url());
        let p = api.fetch_prediction(42).await.unwrap();
        assert_eq!(p.info.away_team, "Benfica");
        assert_eq!(p.home_team_analysis.results.wins, 3);
        assert_eq!(p.away_team_analysis.results.games_played, 0);
        assert_eq!(p.predictions.goals.over_2_5, 52.0);
        assert_eq!(p.predictions.cards.over_3_5_cards, 61.0);
        assert_eq!(p.warnings, vec!["Small sample".to_string()]);
    }

    #[tokio::test]
    async fn test_prediction_settings_pass_through() {
        let mut server = Server::new_async().await;
        let _m = json_mock(&mut server, "/predictions/settings", r#"{"gamesToAnalyze": 5, "weights": {"form": 0.6}}"#).await;

        let api = FootballApi::with_base_url(server.url());
        let settings = api.fetch_prediction_settings().await.unwrap();
        assert_eq!(settings["gamesToAnalyze"], 5);
        assert_eq!(settings["weights"]["form"], 0.6);
    }
}
