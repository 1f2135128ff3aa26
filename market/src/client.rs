use std::time::Duration;

use async_trait::async_trait;
use corelib::models::Token;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::MarketSource;
use crate::errors::ScreenerError;
use crate::types::{MarketSnapshot, PairInfo, TokenPairsResponse};

pub const DEXSCREENER_BASE_URL: &str = "https://api.dexscreener.com";

/// DexScreener REST client.
///
/// A token can be listed on many pairs; the reading comes from the
/// highest-liquidity pair on the token's own chain.
#[derive(Clone)]
pub struct DexScreenerClient {
    http: Client,
    base_url: String,
}

impl DexScreenerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScreenerError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    #[instrument(
        skip(self, token),
        fields(token = %token.id()),
        level = "debug"
    )]
    pub async fn fetch_snapshot(&self, token: &Token) -> Result<MarketSnapshot, ScreenerError> {
        let url = format!("{}/latest/dex/tokens/{}", self.base_url, token.address);

        let resp = self.http.get(&url).send().await?.error_for_status()?;
        let body: TokenPairsResponse = resp.json().await?;

        let pairs = body.pairs.unwrap_or_default();
        let pair = select_pair(&pairs, &token.chain).ok_or_else(|| ScreenerError::NoPairs {
            token: token.id(),
        })?;

        let snapshot = snapshot_from_pair(pair, token, chrono::Utc::now().timestamp_millis())?;

        debug!(
            price_usd = snapshot.price_usd,
            market_cap_usd = snapshot.market_cap_usd,
            "market snapshot fetched"
        );

        Ok(snapshot)
    }
}

#[async_trait]
impl MarketSource for DexScreenerClient {
    async fn snapshot(&self, token: &Token) -> anyhow::Result<MarketSnapshot> {
        Ok(self.fetch_snapshot(token).await?)
    }
}

/// Pick the pair to read from: same chain as the token, most liquidity.
fn select_pair<'a>(pairs: &'a [PairInfo], chain: &str) -> Option<&'a PairInfo> {
    pairs
        .iter()
        .filter(|p| p.chain_id == chain)
        .max_by(|a, b| pair_liquidity(a).total_cmp(&pair_liquidity(b)))
}

fn pair_liquidity(pair: &PairInfo) -> f64 {
    pair.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0)
}

fn snapshot_from_pair(
    pair: &PairInfo,
    token: &Token,
    ts_ms: i64,
) -> Result<MarketSnapshot, ScreenerError> {
    let price_usd: f64 = pair
        .price_usd
        .as_deref()
        .ok_or_else(|| ScreenerError::MissingPrice {
            token: token.id(),
        })?
        .parse()?;

    // Smaller listings often report only fdv.
    let market_cap_usd = pair.market_cap.or(pair.fdv).unwrap_or(0.0);

    Ok(MarketSnapshot {
        price_usd,
        market_cap_usd,
        ts_ms,
    })
}
