use crate::creator::DelegateFailure;
use crate::request::InputError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkForgeError {
    #[error("{0}")]
    Input(#[from] InputError),

    #[error("Link creation failed: {0}")]
    Delegate(DelegateFailure),

    #[error("Administrator rights are required to create links")]
    NotElevated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("History file is corrupt: {0}")]
    Corrupt(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, LinkForgeError>;
