//! Error types for hexdex

use thiserror::Error;

/// Result type alias using [`HexdexError`]
pub type Result<T> = std::result::Result<T, HexdexError>;

#[derive(Error, Debug)]
pub enum HexdexError {
    /// Startup configuration rejected; no dataset is built.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed or unusable H3 cell identifier
    #[error("Invalid cell index: {0}")]
    InvalidCell(String),

    /// Polygon rejected by the grid library
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl HexdexError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        HexdexError::InvalidConfig(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        HexdexError::InvalidInput(msg.into())
    }

    pub fn invalid_cell(msg: impl Into<String>) -> Self {
        HexdexError::InvalidCell(msg.into())
    }

    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        HexdexError::InvalidGeometry(msg.into())
    }

    /// Reclassifies an input error raised while checking startup settings.
    pub fn into_config(self) -> Self {
        match self {
            HexdexError::InvalidInput(msg) => HexdexError::InvalidConfig(msg),
            other => other,
        }
    }

    /// Whether the caller supplied the bad value (as opposed to a startup or
    /// internal failure).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HexdexError::InvalidInput(_)
                | HexdexError::InvalidCell(_)
                | HexdexError::InvalidGeometry(_)
        )
    }
}
