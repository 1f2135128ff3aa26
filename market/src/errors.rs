use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no pairs listed for token {token}")]
    NoPairs { token: String },

    #[error("pair for token {token} carries no usd price")]
    MissingPrice { token: String },

    #[error("numeric parse error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}
