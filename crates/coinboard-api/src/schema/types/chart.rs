use async_graphql::{Enum, SimpleObject};
use coinboard_core::types::{ChartPoint, DayWindow, MarketChart};

/// GraphQL chart window enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum WindowInput {
    #[graphql(name = "DAY_1")]
    Day1,
    #[graphql(name = "DAY_7")]
    Day7,
    #[graphql(name = "DAY_30")]
    Day30,
    #[graphql(name = "DAY_365")]
    Day365,
}

impl From<WindowInput> for DayWindow {
    fn from(window: WindowInput) -> Self {
        match window {
            WindowInput::Day1 => DayWindow::Day1,
            WindowInput::Day7 => DayWindow::Day7,
            WindowInput::Day30 => DayWindow::Day30,
            WindowInput::Day365 => DayWindow::Day365,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct GqlChartPoint {
    /// Unix milliseconds
    pub timestamp: i64,
    pub value: f64,
}

impl From<&ChartPoint> for GqlChartPoint {
    fn from(point: &ChartPoint) -> Self {
        Self {
            timestamp: point.timestamp_ms(),
            value: point.value(),
        }
    }
}

/// GraphQL market chart of one coin over one window
#[derive(Debug, Clone, SimpleObject)]
pub struct GqlMarketChart {
    pub coin_id: String,
    pub window: String,
    pub prices: Vec<GqlChartPoint>,
    pub market_caps: Vec<GqlChartPoint>,
    pub total_volumes: Vec<GqlChartPoint>,
}

impl GqlMarketChart {
    pub fn new(coin_id: String, window: DayWindow, chart: &MarketChart) -> Self {
        Self {
            coin_id,
            window: window.label().to_string(),
            prices: points(&chart.prices),
            market_caps: points(&chart.market_caps),
            total_volumes: points(&chart.total_volumes),
        }
    }
}

fn points(series: &[ChartPoint]) -> Vec<GqlChartPoint> {
    series.iter().map(GqlChartPoint::from).collect()
}
