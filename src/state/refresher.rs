use crate::state::messages::{RefreshKind, UiEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

pub const LIVE_REFRESH: Duration = Duration::from_secs(30);
pub const ROUND_REFRESH: Duration = Duration::from_secs(60);

/// Polls on two clocks: live matches every 30 seconds, the selected
/// round/phase every minute. Ticks go to the UI loop, which knows what is
/// currently selected and builds the keyed requests.
pub struct PeriodicRefresher {
    ui_events: mpsc::Sender<UiEvent>,
}

impl PeriodicRefresher {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_events }
    }

    pub async fn run(self) {
        let mut live_interval = interval(LIVE_REFRESH);
        let mut round_interval = interval(ROUND_REFRESH);
        // Skip the immediate first ticks so startup loading isn't double-triggered.
        live_interval.tick().await;
        round_interval.tick().await;

        loop {
            let kind = tokio::select! {
                _ = live_interval.tick() => RefreshKind::Live,
                _ = round_interval.tick() => RefreshKind::Rounds,
            };
            if self.ui_events.send(UiEvent::Refresh(kind)).await.is_err() {
                break;
            }
        }
    }
}
