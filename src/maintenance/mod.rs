use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::AppState;

const SWEEP_INTERVAL_MINUTES: u64 = 5;

/// Starts the background sweep that drops idle form sessions.
pub fn spawn(state: AppState) {
    tokio::spawn(async move {
        let interval = Duration::from_secs(SWEEP_INTERVAL_MINUTES * 60);
        loop {
            sleep(interval).await;
            run_sweep_cycle(&state).await;
        }
    });
}

async fn run_sweep_cycle(state: &AppState) -> usize {
    let ttl = state.config().session_ttl;
    let removed = state.sessions().purge_idle(ttl).await;

    if removed > 0 {
        let remaining = state.sessions().len().await;
        info!(removed, remaining, "idle session sweep completed");
    } else {
        debug!("idle session sweep found nothing to remove");
    }

    removed
}
