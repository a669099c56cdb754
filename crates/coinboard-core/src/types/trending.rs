use serde::{Deserialize, Serialize};

/// Entry of the provider's trending search list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<i32>,
    pub thumb: Option<String>,
    /// Position in the trending list, 0 is hottest
    pub score: i32,
}
