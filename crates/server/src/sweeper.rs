use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use antar_db::SessionStore;

/// Periodically drops sessions that outlived their TTL.
pub fn spawn(sessions: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sweep_once(sessions.as_ref(), Utc::now()).await;
        }
    })
}

pub async fn sweep_once(sessions: &dyn SessionStore, now: DateTime<Utc>) -> usize {
    match sessions.expire(now).await {
        Ok(removed) => {
            if removed > 0 {
                info!(event_name = "dialogue.sessions_expired", removed, "expired idle sessions");
            }
            removed
        }
        Err(error) => {
            warn!(
                event_name = "store.session_sweep_failed",
                error = %error,
                "session sweep failed"
            );
            0
        }
    }
}
