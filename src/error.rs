//! Simulation error types

use thiserror::Error;

use crate::sim::BlockId;

/// Errors raised by the simulation core and its loaders
#[derive(Debug, Error)]
pub enum SimError {
    /// Quadtree built with neither items nor an explicit bounding rectangle
    #[error("quadtree needs at least one item or an explicit bounding rectangle")]
    EmptyIndex,

    /// Item missing from the node list(s) its bounds select
    #[error("item {key} not found in the quadtree nodes selected by its bounds")]
    ItemNotFound { key: String },

    /// Polygon with too few vertices to enclose an area
    #[error("polygon needs at least 3 vertices, got {got}")]
    TooFewVertices { got: usize },

    /// Level edit referring to a block that does not exist
    #[error("unknown block {0:?}")]
    UnknownBlock(BlockId),

    /// Settings or layout JSON could not be parsed
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error while reading settings or layouts
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
