use crate::state::messages::{NetworkRequest, NetworkResponse};
use kickoff_api::client::{ApiResult, FootballApi};
use log::{debug, error, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs every request on its own task so a slow round never holds up the
/// live list. The spinner runs while at least one request is in flight.
pub struct NetworkWorker {
    client: FootballApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    in_flight: Arc<AtomicUsize>,
}

impl NetworkWorker {
    pub fn new(
        client: FootballApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
                self.start_loading_animation().await;
            }

            let client = self.client.clone();
            let responses = self.responses.clone();
            let in_flight = self.in_flight.clone();

            tokio::spawn(async move {
                let response = handle_request(&client, request).await;
                debug!("network request complete");

                if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                    stop_loading_animation(&responses, response.is_ok()).await;
                }
                if let Err(e) = responses.send(response).await {
                    error!("Failed to send network response: {e}");
                }
            });
        }
    }

    async fn start_loading_animation(&self) {
        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let in_flight = self.in_flight.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if in_flight.load(Ordering::SeqCst) == 0 {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }
}

async fn stop_loading_animation(responses: &mpsc::Sender<NetworkResponse>, is_ok: bool) {
    tokio::time::sleep(Duration::from_millis(15)).await;

    let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
    let _ = responses
        .send(NetworkResponse::LoadingStateChanged {
            loading_state: LoadingState { is_loading: false, spinner_char },
        })
        .await;
}

async fn handle_request(client: &FootballApi, request: NetworkRequest) -> NetworkResponse {
    match request {
        NetworkRequest::LoadLive { seq } => {
            debug!("loading live matches (poll {seq})");
            let result = describe(client.fetch_live_matches().await);
            NetworkResponse::LiveLoaded { seq, result }
        }
        NetworkRequest::LoadStandings { competition } => {
            debug!("loading standings for {}", competition.slug);
            let result = describe(client.fetch_standings(&competition.tournament_segment).await);
            NetworkResponse::StandingsLoaded { slug: competition.slug, result }
        }
        NetworkRequest::LoadRound { competition, key } => {
            debug!("loading {} round {}", competition.slug, key.round);
            let result = describe(client.fetch_phase(&competition, key.round).await);
            NetworkResponse::RoundLoaded { key, result }
        }
        NetworkRequest::LoadMatchDetail { match_id } => {
            debug!("loading detail for match {match_id}");
            let result = describe(client.fetch_match_detail(match_id).await);
            NetworkResponse::MatchDetailLoaded { match_id, result }
        }
        NetworkRequest::LoadPrediction { match_id } => {
            debug!("loading prediction for match {match_id}");
            let result = describe(client.fetch_prediction(match_id).await);
            NetworkResponse::PredictionLoaded { match_id, result }
        }
    }
}

fn describe<T>(result: ApiResult<T>) -> Result<T, String> {
    result.map_err(|err| {
        warn!("{err}");
        err.to_string()
    })
}
