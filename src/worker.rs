use crate::AppState;
use std::sync::Arc;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

/// Re-scans the configured targets on a fixed interval. Targets are visited
/// one after another; a failed scan is logged and the round continues.
pub async fn run_scan_worker(state: Arc<AppState>) {
    if state.config.scan_interval == 0 || state.config.scan_targets.is_empty() {
        tracing::info!("scan worker disabled");
        return;
    }

    tracing::info!(
        "starting scan worker: {} targets every {}s",
        state.config.scan_targets.len(),
        state.config.scan_interval
    );

    let mut ticker = scan_ticker(Duration::from_secs(state.config.scan_interval));

    loop {
        ticker.tick().await;
        let scanned = scan_targets(&state).await;
        tracing::info!(
            "scan round done: {}/{} targets stored",
            scanned,
            state.config.scan_targets.len()
        );
    }
}

/// First tick lands one full period after start, so a restart does not
/// re-scan every target at once.
fn scan_ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn scan_targets(state: &AppState) -> usize {
    let mut scanned = 0;

    for url in &state.config.scan_targets {
        match state.pipeline.analyze(url).await {
            Ok(outcome) => {
                tracing::info!("scanned {} -> idea {}", url, outcome.id);
                scanned += 1;
            }
            Err(e) => tracing::error!("scan of {} failed: {}", url, e),
        }
    }

    scanned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::testing::{fixture, FakeModel},
        Config,
    };
    use clap::Parser;

    #[tokio::test]
    async fn test_round_continues_after_failure() {
        let reply = "{\"competitor_name\": \"Jira\", \"weaknesses\": [\"Slow\"]}";
        let fx = fixture(
            Some("<body>Jira</body>"),
            FakeModel::replying(["garbage", reply]),
            true,
        );
        let state = AppState {
            config: Config::parse_from([
                "lpfactory",
                "--scan-targets",
                "https://a.example,https://b.example",
            ]),
            pipeline: fx.pipeline.clone(),
        };

        assert_eq!(scan_targets(&state).await, 1);

        let records = fx.store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_url, "https://b.example");
        assert_eq!(fx.pages.fetches(), 2);
    }

    #[tokio::test]
    async fn test_first_round_waits_one_period() {
        let mut ticker = scan_ticker(Duration::from_millis(300));

        let early = tokio::time::timeout(Duration::from_millis(50), ticker.tick()).await;
        assert!(early.is_err());

        let first = tokio::time::timeout(Duration::from_secs(5), ticker.tick()).await;
        assert!(first.is_ok());
    }
}
