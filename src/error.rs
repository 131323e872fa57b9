//! Error handling types and utilities.

use crate::hit::HitKind;
use thiserror::Error;

/// A specialized Result type for application-level operations (config, input, CLI).
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods at each I/O boundary.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a single hit cannot be shaped.
///
/// These are fatal for the hit they describe only. Missing project metadata and missing
/// highlight fields are not errors: they degrade to absent or empty output instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The hit declares a kind none of the result variants handles.
    #[error("unknown hit kind '{0}'")]
    UnknownHitKind(String),
    /// A top-level hit carries no kind at all.
    #[error("hit does not declare a kind")]
    MissingKind,
    /// A required source field is absent.
    #[error("{kind} hit is missing required field '{field}'")]
    MissingAttribute { kind: HitKind, field: &'static str },
}
