#![warn(missing_docs)]
//! Simulation core of the hex garden.
//!
//! Flowers sit on a bounded flat-top hex board. Dragging a flower next to
//! others breeds new flowers into the empty cells they share, each with a
//! genome crossed over from its neighbouring parents.
//!
//! Nothing here touches the ECS or any presentation state; the Bevy app in
//! `main.rs` owns a [`board::Board`] and draws what it reports.

pub mod board;
pub mod error;
pub mod genome;
pub mod hex;
pub mod math;
pub mod palette;

pub use board::{Board, Flower, FlowerId, MoveOutcome, SeedLayout};
pub use error::{GardenError, Result};
pub use genome::Genome;
pub use hex::{Cell, DIRECTIONS, HexLayout};
