use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed answer key, missing corpus or index location.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The normalized query could not be turned into a term query.
    #[error("query parse error: {0}")]
    QueryParse(String),
    /// Neither a persisted index nor a raw corpus could be used.
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Encode(#[from] bincode::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
