//! Grid access traits
//!
//! The engine never owns a world. Hosts hand it a borrowed grid for the
//! duration of one call through these traits.

use crate::{PortalAxis, Result};
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Namespaced block identifier, e.g. `minecraft:obsidian`
pub type BlockId = String;

/// State of a single grid cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockState {
    /// Nothing here
    #[default]
    Air,

    /// A solid block with its identifier
    Solid(BlockId),

    /// Active portal interior, oriented along the frame's axis
    Marker(PortalAxis),
}

impl BlockState {
    /// Create a solid block state
    pub fn solid(id: impl Into<BlockId>) -> Self {
        BlockState::Solid(id.into())
    }

    /// Identifier of a solid block, if this is one
    pub fn id(&self) -> Option<&str> {
        match self {
            BlockState::Solid(id) => Some(id),
            _ => None,
        }
    }

    /// Only solid blocks occupy space; markers can be walked through
    pub fn is_solid(&self) -> bool {
        matches!(self, BlockState::Solid(_))
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, BlockState::Marker(_))
    }
}

impl std::fmt::Display for BlockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockState::Air => f.write_str("air"),
            BlockState::Solid(id) => f.write_str(id),
            BlockState::Marker(axis) => write!(f, "portal[axis={}]", axis),
        }
    }
}

/// Read access to a block grid
pub trait BlockGrid {
    /// Get the block state at a world position
    fn block(&self, pos: IVec3) -> Result<BlockState>;

    /// Lowest addressable Y; downward searches stop here
    fn min_y(&self) -> i32;

    /// Whether nothing solid occupies `pos`
    fn is_empty(&self, pos: IVec3) -> Result<bool> {
        Ok(!self.block(pos)?.is_solid())
    }
}

/// Write access to a block grid
pub trait BlockGridMut: BlockGrid {
    /// Set the block state at a position, returning the old state
    fn set_block(&mut self, pos: IVec3, state: BlockState) -> Result<BlockState>;
}
