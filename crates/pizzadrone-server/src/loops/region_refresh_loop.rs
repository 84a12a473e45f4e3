//! Keep the region snapshot warm so planning requests rarely wait on the
//! data service.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use crate::backoff::Backoff;
use crate::state::AppState;

const REFRESH_CHECK_SECS: u64 = 15;
const REFRESH_BACKOFF_MAX_SECS: u64 = 300;

/// Start the region refresh loop.
pub async fn run_region_refresh_loop(state: Arc<AppState>) {
    let mut ticker = interval(Duration::from_secs(REFRESH_CHECK_SECS));
    let mut backoff = Backoff::new(
        Duration::from_secs(REFRESH_CHECK_SECS),
        Duration::from_secs(REFRESH_BACKOFF_MAX_SECS),
    );

    loop {
        ticker.tick().await;

        if !backoff.ready() || !needs_refresh(state.regions_age(), state.config().region_ttl()) {
            continue;
        }

        match state.refresh_regions().await {
            Ok(snapshot) => {
                backoff.reset();
                tracing::info!(
                    "Region data refreshed: central area '{}', {} no-fly zones",
                    snapshot.central_area.name,
                    snapshot.no_fly_zones.len()
                );
            }
            Err(err) => {
                let delay = backoff.fail();
                tracing::warn!("Region refresh failed: {} (backing off {:?})", err, delay);
            }
        }
    }
}

/// Refresh once three quarters of the TTL has elapsed.
fn needs_refresh(age: Option<Duration>, ttl: Duration) -> bool {
    match age {
        Some(age) => age >= ttl.mul_f64(0.75),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refreshes_missing_or_ageing_snapshots() {
        let ttl = Duration::from_secs(300);
        assert!(needs_refresh(None, ttl));
        assert!(!needs_refresh(Some(Duration::from_secs(60)), ttl));
        assert!(needs_refresh(Some(Duration::from_secs(240)), ttl));
    }
}
