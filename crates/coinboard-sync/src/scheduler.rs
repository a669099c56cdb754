//! Periodic sync runner
//!
//! Drives the same actions the cron endpoints trigger so the service keeps
//! itself fresh without an external scheduler. A failed run is logged and the
//! next tick tries again.

use crate::actions::SyncActions;
use coinboard_core::types::DayWindow;
use coinboard_core::SchedulerConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::broadcast;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{error, info};

pub struct SyncScheduler {
    actions: Arc<dyn SyncActions>,
    config: SchedulerConfig,
}

impl SyncScheduler {
    pub fn new(actions: Arc<dyn SyncActions>, config: SchedulerConfig) -> Self {
        Self { actions, config }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut coins_list = ticker(self.config.coins_list_secs);
        let mut market_chart = ticker(self.config.market_chart_secs);
        let mut trending = ticker(self.config.trending_secs);

        info!(
            coins_list_secs = self.config.coins_list_secs,
            market_chart_secs = self.config.market_chart_secs,
            trending_secs = self.config.trending_secs,
            "Sync scheduler started"
        );

        loop {
            select! {
                _ = shutdown.recv() => {
                    info!("Sync scheduler shutting down");
                    break;
                }

                _ = coins_list.tick() => {
                    if let Err(e) = self.actions.update_coins_list().await {
                        error!(error = %e, "Scheduled coin list sync failed");
                    }
                }

                _ = market_chart.tick() => {
                    if let Err(e) = self.actions.update_coins_market_chart(DayWindow::Day1).await {
                        error!(error = %e, "Scheduled market chart sync failed");
                    }
                }

                _ = trending.tick() => {
                    if let Err(e) = self.actions.update_trending_data().await {
                        error!(error = %e, "Scheduled trending sync failed");
                    }
                }
            }
        }
    }
}

fn ticker(secs: u64) -> Interval {
    // interval() panics on a zero period
    let mut ticker = interval(Duration::from_secs(secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coinboard_core::{Result, SyncError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingActions {
        coins_list: AtomicUsize,
        market_chart: AtomicUsize,
        trending: AtomicUsize,
    }

    #[async_trait]
    impl SyncActions for CountingActions {
        async fn update_coins_list(&self) -> Result<usize> {
            self.coins_list.fetch_add(1, Ordering::SeqCst);
            Err(SyncError::Provider("down".into()))
        }

        async fn update_coins_market_chart(&self, window: DayWindow) -> Result<usize> {
            assert_eq!(window, DayWindow::Day1);
            self.market_chart.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }

        async fn update_trending_data(&self) -> Result<usize> {
            self.trending.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }

        async fn update_user_coins_list(&self, _user_id: &str) -> Result<u64> {
            unreachable!("not scheduled")
        }

        async fn update_user_coin_data(&self, _coin_id: &str) -> Result<u64> {
            unreachable!("not scheduled")
        }
    }

    #[tokio::test]
    async fn test_runs_each_action_on_first_tick_and_stops() {
        let actions = Arc::new(CountingActions::default());
        let config = SchedulerConfig {
            enabled: true,
            coins_list_secs: 3600,
            market_chart_secs: 3600,
            trending_secs: 3600,
        };
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(SyncScheduler::new(actions.clone(), config).run(rx));
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(()).unwrap();
        handle.await.unwrap();

        // first tick fires immediately; a failing run does not stop the loop
        assert_eq!(actions.coins_list.load(Ordering::SeqCst), 1);
        assert_eq!(actions.market_chart.load(Ordering::SeqCst), 1);
        assert_eq!(actions.trending.load(Ordering::SeqCst), 1);
    }
}
