//! Error types reported by the persistence boundary.

use crate::types::{ConnectorId, ElementId, GraphScope};
use thiserror::Error;

/// Failure reported by a [`LayoutStore`](crate::store::LayoutStore) call.
///
/// Commit failures never abort the editor: the session logs them, turns them
/// into a notification and leaves the in-memory graph untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The graph scope is unknown to the store.
    #[error("unknown graph scope {0:?}")]
    UnknownScope(GraphScope),

    /// No element with this id exists.
    #[error("element {0} does not exist")]
    ElementNotFound(ElementId),

    /// No connector with this id exists.
    #[error("connector {0} does not exist")]
    ConnectorNotFound(ConnectorId),

    /// The element or connector variant does not belong in this scope
    /// (for example a step on a production line).
    #[error("{kind} cannot be placed in {scope:?}")]
    ScopeMismatch {
        /// Variant name of the rejected element or connector
        kind: &'static str,
        /// Scope it was submitted to
        scope: GraphScope,
    },

    /// A connector would start and end at the same element.
    #[error("connector cannot start and end at element {0}")]
    SelfConnection(ElementId),

    /// Committed coordinates must be non-negative.
    #[error("position ({x}, {y}) is outside the canvas")]
    NegativePosition {
        /// Rejected x coordinate
        x: f32,
        /// Rejected y coordinate
        y: f32,
    },

    /// Any other failure reported by the backing service.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Failure while writing a canvas snapshot.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The generated SVG could not be parsed back for rasterization.
    #[error("invalid SVG document: {0}")]
    Svg(String),

    /// The raster target could not be allocated.
    #[error("cannot allocate a {width}x{height} image")]
    Pixmap {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Png(String),

    /// Writing the file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
