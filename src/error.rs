use thiserror::Error;

/// Errors raised by the composition engine.
///
/// Every variant is raised at the point of detection; generators never catch
/// them, so callers see exactly where composition stopped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("unknown wallpaper type {0:?} (expected year, life or goal)")]
    UnknownKind(String),
    #[error("rasterization failed: {0}")]
    Rasterize(String),
}

pub type Result<T> = std::result::Result<T, Error>;
