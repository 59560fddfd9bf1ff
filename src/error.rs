//! Error types for storycast

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The story input is missing, unreadable, or empty. Raised before any
    /// network activity.
    #[error("input error: {0}")]
    Input(String),

    /// The remote call could not be completed: connection failure, TLS,
    /// timeout, or a non-success HTTP status (auth and rate-limit included).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote response could not be coerced into the requested shape.
    #[error("schema violation: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, Error>;
