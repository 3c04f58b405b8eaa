//! Error types for event conversion

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("malformed input event: {0}")]
    MalformedEvent(String),

    #[error("relation chain exceeded maximum depth {depth}")]
    RelationDepthExceeded { depth: usize },
}
