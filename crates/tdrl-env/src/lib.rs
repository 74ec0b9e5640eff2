//! Worlds for temporal-difference learning
//!
//! This crate provides:
//! - A one-dimensional corridor and a grid world with walls and obstacle
//! - A partially observable T-maze
//! - A wrapper applying a state encoding to any world
//! - A bridge to worlds simulated on another task or thread

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bridge;
pub mod corridor;
pub mod grid;
pub mod tmaze;
pub mod wrappers;

// Re-export worlds
pub use bridge::{BridgeCommand, BridgeConnector, BridgePeer, BridgeWorld};
pub use corridor::Corridor;
pub use grid::{Cell, GridWorld};
pub use tmaze::TMaze;
pub use wrappers::Encoded;

// Re-export core types
pub use tdrl_core::{Encoding, Step, World};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{BridgeWorld, Corridor, Encoded, GridWorld, TMaze};
    pub use tdrl_core::prelude::*;
}
