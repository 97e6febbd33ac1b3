//! Core type definitions for the hateoas HAL client.
//!
//! This crate defines the plain, transport-agnostic types every other crate
//! in the workspace depends on:
//! - [`Link`] and [`LinkSet`], the `_links` section of a HAL document
//! - [`RequestOptions`] with its query, paging, sort and observe settings
//! - [`ClientConfig`], the recognized configuration surface
//! - [`assert_present`], the batched required-parameter validator
//! - [`HateoasError`], the single error type shared by the workspace
//!
//! Nothing here performs I/O or touches the cache.

mod config;
mod link;
mod options;
mod validate;

pub use config::{CacheConfig, ClientConfig, HttpConfig};
pub use link::{Link, LinkSet, SELF_RELATION};
pub use options::{
    ObserveMode, PageParams, ParamValue, RequestOptions, Sort, SortOrder, ValuesOption,
};
pub use validate::{assert_present, Presence};

/// Result type alias using the workspace error type.
pub type HateoasResult<T> = std::result::Result<T, HateoasError>;

/// Errors that can occur anywhere in the client.
#[derive(Debug, thiserror::Error)]
pub enum HateoasError {
    /// A required input was missing, empty or contradictory.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// A GET returned a payload that does not classify as the expected variant.
    #[error("unexpected response shape: expected {expected}, got {actual}")]
    UnexpectedShape { expected: String, actual: String },

    /// The requested relation is not present in the owner's links.
    #[error("relation not found: {0}")]
    MissingRelation(String),

    /// The transport reported a failure.
    #[error("transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be parsed or failed validation.
    #[error("configuration error: {0}")]
    Config(String),
}

impl HateoasError {
    /// Shorthand for [`HateoasError::InvalidParam`].
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidParam(message.into())
    }

    /// Returns the HTTP status carried by a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
