//! Error types for the generator

use thiserror::Error;

/// Errors surfaced by level generation
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed generation inputs. Reported synchronously before any
    /// entropy is consumed, so seeded runs stay reproducible.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
