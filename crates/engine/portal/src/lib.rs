//! Portal crate - Frame detection and activation for block grids
//!
//! This crate recognizes rectangular frames of configured blocks standing in
//! a vertical plane, fills their interior with portal markers and tears the
//! markers down again when the frame breaks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Portal Engine                         │
//! ├─────────────────────────────────────────────────────────┤
//! │  Ignition                                                │
//! │  ├── Enabled / block / item / cooldown checks           │
//! │  ├── Item consumption                                   │
//! │  └── Block removal handling                             │
//! ├─────────────────────────────────────────────────────────┤
//! │  FrameValidator (read-only)                              │
//! │  ├── Anchor walk to the bottom corner                   │
//! │  ├── Width / height measurement                         │
//! │  └── Border and interior checks, X axis first           │
//! ├─────────────────────────────────────────────────────────┤
//! │  PortalActivator (writes)                                │
//! │  ├── Fill interior with markers                         │
//! │  └── Clear markers around a broken frame                │
//! ├─────────────────────────────────────────────────────────┤
//! │  Grid traits                                             │
//! │  ├── BlockGrid / BlockGridMut - host world access       │
//! │  └── VoxelWorld - in-memory implementation              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use portal::{AgentId, BlockState, CooldownStore, IgnitionRequest, ItemStack};
//! use portal::{PortalConfig, PortalEngine, VoxelWorld};
//! use glam::IVec3;
//!
//! // Build a 4x5 frame of crying obsidian
//! let mut world = VoxelWorld::new(0, 64);
//! let frame = BlockState::solid("minecraft:crying_obsidian");
//! world.fill(IVec3::new(0, 1, 0), IVec3::new(3, 1, 0), frame.clone());
//! world.fill(IVec3::new(0, 5, 0), IVec3::new(3, 5, 0), frame.clone());
//! world.fill(IVec3::new(0, 2, 0), IVec3::new(0, 4, 0), frame.clone());
//! world.fill(IVec3::new(3, 2, 0), IVec3::new(3, 4, 0), frame);
//!
//! // Light it with flint and steel
//! let engine = PortalEngine::new(PortalConfig::default());
//! let mut cooldowns = CooldownStore::new();
//! let mut item = ItemStack::damageable("minecraft:flint_and_steel", 0, 64);
//! let request = IgnitionRequest::new(IVec3::new(1, 1, 0), AgentId(1), &mut item);
//!
//! let ignition = engine.ignite(&mut world, &mut cooldowns, request).unwrap();
//! assert_eq!(ignition.placed, 6);
//! ```

mod activator;
mod classify;
pub mod config;
mod diagnostics;
mod direction;
mod engine;
mod error;
mod geometry;
mod grid;
mod ignition;
mod validator;
mod world;

#[cfg(test)]
mod testing;

pub use activator::PortalActivator;
pub use classify::{FrameClassifier, FrameMaterials};
pub use config::{FrameLimits, PortalConfig, PortalMessages};
pub use diagnostics::{inspect, ConfigSummary, DirectionReport, FrameReport};
pub use direction::{Direction, PortalAxis};
pub use engine::PortalEngine;
pub use error::{ConfigError, ExhaustReason, FrameRejection, GridError, IgnitionError, Result};
pub use geometry::FrameGeometry;
pub use grid::{BlockGrid, BlockGridMut, BlockId, BlockState};
pub use ignition::{
    is_valid_ignition_item, AgentId, CooldownStore, Durability, Hand, Ignition, IgnitionRequest,
    ItemStack,
};
pub use validator::{AnchorSearch, FrameValidator};
pub use world::{PlacedBlock, VoxelWorld, WorldSnapshot};

// Re-export glam for convenience
pub use glam;
