use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported market chart windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayWindow {
    Day1,
    Day7,
    Day30,
    Day365,
}

impl DayWindow {
    /// Number of days requested from the provider
    pub fn days(&self) -> u32 {
        match self {
            DayWindow::Day1 => 1,
            DayWindow::Day7 => 7,
            DayWindow::Day30 => 30,
            DayWindow::Day365 => 365,
        }
    }

    /// Column of `market_charts` holding this window
    pub fn column_name(&self) -> &'static str {
        match self {
            DayWindow::Day1 => "prices_1d",
            DayWindow::Day7 => "prices_7d",
            DayWindow::Day30 => "prices_30d",
            DayWindow::Day365 => "prices_365d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayWindow::Day1 => "1d",
            DayWindow::Day7 => "7d",
            DayWindow::Day30 => "30d",
            DayWindow::Day365 => "365d",
        }
    }

    pub fn all() -> &'static [DayWindow] {
        &[
            DayWindow::Day1,
            DayWindow::Day7,
            DayWindow::Day30,
            DayWindow::Day365,
        ]
    }

    pub fn from_days(days: u32) -> Option<Self> {
        Self::all().iter().copied().find(|w| w.days() == days)
    }
}

impl FromStr for DayWindow {
    type Err = SyncError;

    /// Accepts "7" or "7d"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('d').unwrap_or(trimmed);
        // u32 parsing alone would also take "+7"
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SyncError::InvalidParameter(format!("unsupported day window: {s}")));
        }
        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::from_days)
            .ok_or_else(|| SyncError::InvalidParameter(format!("unsupported day window: {s}")))
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `[timestamp_ms, value]` pair as served by the provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint(pub i64, pub f64);

impl ChartPoint {
    pub fn timestamp_ms(&self) -> i64 {
        self.0
    }

    pub fn value(&self) -> f64 {
        self.1
    }
}

/// Time series for one coin over one window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<ChartPoint>,
    #[serde(default)]
    pub market_caps: Vec<ChartPoint>,
    #[serde(default)]
    pub total_volumes: Vec<ChartPoint>,
}

impl MarketChart {
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn latest_price(&self) -> Option<f64> {
        self.prices.last().map(ChartPoint::value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_window_parsing() {
        assert_eq!("1".parse::<DayWindow>().unwrap(), DayWindow::Day1);
        assert_eq!("7d".parse::<DayWindow>().unwrap(), DayWindow::Day7);
        assert_eq!(" 30d ".parse::<DayWindow>().unwrap(), DayWindow::Day30);
        assert_eq!("365".parse::<DayWindow>().unwrap(), DayWindow::Day365);

        for bad in ["0", "2", "14d", "d", "", "1w", "-1", "+7", "+365d", "7dd"] {
            assert!(
                matches!(bad.parse::<DayWindow>(), Err(SyncError::InvalidParameter(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_day_window_columns_are_distinct() {
        let mut columns: Vec<_> = DayWindow::all().iter().map(|w| w.column_name()).collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), DayWindow::all().len());
        assert_eq!(DayWindow::from_days(7), Some(DayWindow::Day7));
        assert_eq!(DayWindow::from_days(8), None);
    }

    #[test]
    fn test_market_chart_decodes_provider_shape() {
        let raw = r#"{
            "prices": [[1711843200000, 69702.31], [1711846800000, 70010.5]],
            "market_caps": [[1711843200000, 1370681994040.0]],
            "total_volumes": [[1711843200000, 16418512521.4]]
        }"#;
        let chart: MarketChart = serde_json::from_str(raw).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.prices[0].timestamp_ms(), 1711843200000);
        assert_eq!(chart.latest_price(), Some(70010.5));
        assert!(!chart.is_empty());
    }
}
