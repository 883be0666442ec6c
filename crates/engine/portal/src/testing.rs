//! Shared fixtures for unit tests

use crate::{BlockState, FrameClassifier, PortalAxis, VoxelWorld};
use glam::IVec3;

pub(crate) const FRAME: &str = "minecraft:crying_obsidian";

pub(crate) fn classifier() -> FrameClassifier {
    FrameClassifier::new([FRAME], false)
}

/// Place a `width` x `height` ring of frame blocks with its bottom corner at
/// `anchor`, growing along the axis' lateral direction
pub(crate) fn build_frame(
    world: &mut VoxelWorld,
    anchor: IVec3,
    axis: PortalAxis,
    width: i32,
    height: i32,
) {
    let lateral = axis.lateral();
    for across in 0..width {
        for up in 0..height {
            if across == 0 || up == 0 || across == width - 1 || up == height - 1 {
                let pos = lateral.step(anchor, across) + IVec3::Y * up;
                world.set(pos, BlockState::solid(FRAME));
            }
        }
    }
}
