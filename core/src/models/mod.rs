use std::fmt;

use serde::{Deserialize, Serialize};

/// A tracked token, keyed by on-chain address + chain id.
///
/// The decision engine treats this as opaque; it only flows through for
/// logging and storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub address: String,
    pub chain: String,
    pub symbol: Option<String>,
}

impl Token {
    pub fn new(address: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            chain: chain.into(),
            symbol: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Stable identifier used in logs and storage keys.
    pub fn id(&self) -> String {
        format!("{}:{}", self.chain, self.address)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(sym) => write!(f, "{} ({})", sym, self.id()),
            None => f.write_str(&self.id()),
        }
    }
}

/// The original alert that started tracking a token.
///
/// Immutable once created; owned by the storage layer. The engine only
/// reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub created_at_ms: i64,
    /// Price in USD at signal time.
    pub price: f64,
    /// Market capitalization in USD at signal time.
    pub market_cap: f64,
}

/// A previously-sent price update for a tracked token.
///
/// Zero or more exist per token; the engine consumes only the most recent
/// one plus a count of how many exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdateRecord {
    pub created_at_ms: i64,
    pub price: f64,
    pub market_cap: f64,
}
