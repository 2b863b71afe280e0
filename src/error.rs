use crate::body::BodyId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Every bit of the 32 bit filter mask is already taken.
    #[error("filter registry is full ({capacity} tags), cannot register {tag:?}")]
    FilterCapacity { tag: String, capacity: usize },
    #[error("no body with id {0} in the scene")]
    UnknownBody(BodyId),
    #[error("body {0} is static and cannot be dragged")]
    StaticBody(BodyId),
    #[error("invalid physics config: {0}")]
    Config(#[from] ron::error::SpannedError),
}
