use thiserror::Error;

/// Why a renderer could not produce a populated scene.
///
/// These are expected, recoverable outcomes: the presentation layer maps
/// them to placeholder figures instead of failing the call chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// One or more coordinate columns the renderer requires are missing.
    #[error("missing coordinate columns ({0})")]
    MissingCoordinates(&'static str),
    /// The caller asked for a named field the table does not carry.
    #[error("column '{0}' not found")]
    ColumnNotFound(String),
    /// Neither an altitude column nor the x, y, z trio to derive one from.
    #[error("no altitude column and no x, y, z columns to derive it from")]
    NoAltitudeSource,
}
