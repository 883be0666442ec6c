//! In-memory block grid
//!
//! `VoxelWorld` stores placed blocks in a hash map and treats everything
//! else as air. It backs the command-line tool and the test suite, and
//! serves as a reference implementation of the grid traits.

use crate::{BlockGrid, BlockGridMut, BlockState, GridError, Result};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse block grid with vertical bounds and an optional loaded region
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelWorld {
    /// Non-air blocks keyed by position
    blocks: HashMap<IVec3, BlockState>,

    /// Lowest valid Y (inclusive)
    min_y: i32,

    /// Highest valid Y (exclusive)
    max_y: i32,

    /// Inclusive bounds of the loaded area, everything loaded if `None`
    loaded: Option<(IVec3, IVec3)>,
}

impl VoxelWorld {
    /// Create an empty world spanning `min_y..max_y`
    pub fn new(min_y: i32, max_y: i32) -> Self {
        VoxelWorld {
            blocks: HashMap::new(),
            min_y,
            max_y,
            loaded: None,
        }
    }

    /// Restrict access to an inclusive box; queries outside it fail with
    /// `GridError::Unloaded`
    pub fn with_loaded_region(mut self, min: IVec3, max: IVec3) -> Self {
        self.loaded = Some((min.min(max), min.max(max)));
        self
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Number of non-air blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Read a block without bounds checks
    pub fn get(&self, pos: IVec3) -> BlockState {
        self.blocks.get(&pos).cloned().unwrap_or_default()
    }

    /// Place a block without bounds checks, returning the old state
    pub fn set(&mut self, pos: IVec3, state: BlockState) -> BlockState {
        let old = match state {
            BlockState::Air => self.blocks.remove(&pos),
            state => self.blocks.insert(pos, state),
        };
        old.unwrap_or_default()
    }

    /// Fill an inclusive box with one state
    pub fn fill(&mut self, min: IVec3, max: IVec3, state: BlockState) {
        let (lo, hi) = (min.min(max), min.max(max));
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    self.set(IVec3::new(x, y, z), state.clone());
                }
            }
        }
    }

    /// Iterate over all non-air blocks
    pub fn blocks(&self) -> impl Iterator<Item = (IVec3, &BlockState)> {
        self.blocks.iter().map(|(pos, state)| (*pos, state))
    }

    /// Count marker blocks anywhere in the world
    pub fn marker_count(&self) -> usize {
        self.blocks.values().filter(|s| s.is_marker()).count()
    }

    fn check(&self, pos: IVec3) -> Result<()> {
        if pos.y < self.min_y || pos.y >= self.max_y {
            return Err(GridError::OutOfBounds(pos));
        }
        if let Some((min, max)) = self.loaded {
            if pos.cmplt(min).any() || pos.cmpgt(max).any() {
                return Err(GridError::Unloaded(pos));
            }
        }
        Ok(())
    }

    /// Capture the world as a serializable snapshot
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut blocks: Vec<PlacedBlock> = self
            .blocks()
            .map(|(pos, state)| PlacedBlock {
                pos,
                state: state.clone(),
            })
            .collect();
        blocks.sort_by_key(|b| (b.pos.y, b.pos.z, b.pos.x));

        WorldSnapshot {
            min_y: self.min_y,
            max_y: self.max_y,
            blocks,
        }
    }

    /// Rebuild a world from a snapshot
    pub fn from_snapshot(snapshot: WorldSnapshot) -> Self {
        let mut world = VoxelWorld::new(snapshot.min_y, snapshot.max_y);
        for block in snapshot.blocks {
            world.set(block.pos, block.state);
        }
        world
    }

    /// Parse a JSON snapshot
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::from_snapshot(serde_json::from_str(json)?))
    }

    /// Serialize as a pretty JSON snapshot
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}

impl BlockGrid for VoxelWorld {
    fn block(&self, pos: IVec3) -> Result<BlockState> {
        self.check(pos)?;
        Ok(self.get(pos))
    }

    fn min_y(&self) -> i32 {
        self.min_y
    }
}

impl BlockGridMut for VoxelWorld {
    fn set_block(&mut self, pos: IVec3, state: BlockState) -> Result<BlockState> {
        self.check(pos)?;
        Ok(self.set(pos, state))
    }
}

/// Serializable form of a `VoxelWorld`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub min_y: i32,
    pub max_y: i32,
    #[serde(default)]
    pub blocks: Vec<PlacedBlock>,
}

/// One non-air block in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub pos: IVec3,
    pub state: BlockState,
}
