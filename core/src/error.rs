use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("component store '{0}' is not registered")]
    UnregisteredStore(String),

    #[error("component store '{store}' holds a different type than requested")]
    ComponentTypeMismatch { store: String },

    #[error("event id {id} is not greater than last appended id {last}")]
    NonMonotonicEvent { id: u64, last: u64 },

    #[error("significance {0} is outside 0..=100")]
    SignificanceOutOfRange(u8),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
