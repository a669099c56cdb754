use coinboard_core::types::{DayWindow, MarketChart};
use dashmap::DashMap;

/// Market chart series keyed by (coin id, window)
#[derive(Debug)]
pub struct ChartStore {
    charts: DashMap<(String, DayWindow), MarketChart>,
}

impl ChartStore {
    pub fn new() -> Self {
        Self {
            charts: DashMap::new(),
        }
    }

    pub fn upsert(&self, coin_id: &str, window: DayWindow, chart: MarketChart) {
        self.charts.insert((coin_id.to_string(), window), chart);
    }

    pub fn get(&self, coin_id: &str, window: DayWindow) -> Option<MarketChart> {
        self.charts
            .get(&(coin_id.to_string(), window))
            .map(|c| c.clone())
    }

    /// Windows stored for a coin
    pub fn windows_for(&self, coin_id: &str) -> Vec<DayWindow> {
        DayWindow::all()
            .iter()
            .copied()
            .filter(|w| self.charts.contains_key(&(coin_id.to_string(), *w)))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.charts.len()
    }
}

impl Default for ChartStore {
    fn default() -> Self {
        Self::new()
    }
}
