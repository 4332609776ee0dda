//! Error taxonomy shared by the garden core.

use thiserror::Error;

use crate::board::FlowerId;
use crate::hex::Cell;

/// Errors raised by grid, genome and board operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GardenError {
    /// Genome seed string is not a valid nibble encoding.
    #[error("invalid genome encoding {encoding:?}: {reason}")]
    InvalidEncoding {
        /// The rejected input.
        encoding: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Cell lies outside the board.
    #[error("cell {cell} is outside a board of radius {radius}")]
    OutOfBounds {
        /// The offending cell.
        cell: Cell,
        /// Radius of the board that rejected it.
        radius: u32,
    },

    /// Crossover was asked to mix zero parents.
    #[error("cannot mix an empty set of parent genomes")]
    EmptyParentSet,

    /// Cube coordinates that do not sum to zero.
    #[error("({x}, {y}, {z}) is not a cube coordinate: components must sum to 0")]
    InvalidCell {
        /// Cube x.
        x: i32,
        /// Cube y.
        y: i32,
        /// Cube z.
        z: i32,
    },

    /// Boards need at least one ring.
    #[error("board radius must be at least 1, got {0}")]
    InvalidRadius(u32),

    /// Flower id not known to this board.
    #[error("no flower with id {0} on this board")]
    UnknownFlower(FlowerId),
}

/// Result alias for garden operations.
pub type Result<T> = std::result::Result<T, GardenError>;

impl GardenError {
    /// Builds an [`GardenError::InvalidEncoding`] for `encoding`.
    pub fn encoding(encoding: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidEncoding {
            encoding: encoding.into(),
            reason,
        }
    }
}
