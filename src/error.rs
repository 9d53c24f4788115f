//! Error type for world generation.

use thiserror::Error;

/// Errors that stop world generation or export.
///
/// Recoverable problems (malformed rule lines, unknown direction tokens,
/// missing autotile rules) never surface here; they are logged and replaced
/// with a substitute value so that generation always completes.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not allocate {cells} tile cells for a {width}x{height}x{depth} world")]
    Allocation {
        width: usize,
        height: usize,
        depth: usize,
        cells: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image export error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, WorldError>;
