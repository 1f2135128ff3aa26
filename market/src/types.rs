use serde::Deserialize;

/// One current reading for a token, in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSnapshot {
    pub price_usd: f64,
    pub market_cap_usd: f64,
    pub ts_ms: i64,
}

/// Response envelope of `GET /latest/dex/tokens/{address}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPairsResponse {
    pub pairs: Option<Vec<PairInfo>>,
}

/// One DEX pair listing for the token. Only the fields this system reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    pub chain_id: String,
    /// Decimal string, e.g. `"0.0012"`.
    pub price_usd: Option<String>,
    pub market_cap: Option<f64>,
    /// Fully diluted valuation; fallback when `market_cap` is absent.
    pub fdv: Option<f64>,
    pub liquidity: Option<LiquidityInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiquidityInfo {
    pub usd: Option<f64>,
}
