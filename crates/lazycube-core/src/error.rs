use thiserror::Error;

/// Result alias used across the engine.
pub type CubeResult<T> = Result<T, CubeError>;

/// Errors raised while building cubes or assembling scanned faces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CubeError {
    /// Input had the wrong number of cells
    #[error("expected {expected} cells, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// A colour letter or index could not be parsed
    #[error("invalid colour {0:?}")]
    InvalidColour(String),

    /// The completed cube fails parity under every ordering of the buffered faces
    #[error("cube is unsolvable under every ordering of the scanned faces")]
    Unrecoverable,
}
