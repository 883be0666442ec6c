//! Validated frame geometry

use crate::{Direction, PortalAxis};
use glam::IVec3;
use std::collections::HashSet;

/// A measured, validated portal frame
///
/// Only `FrameValidator` creates these. Width and height are outer
/// dimensions, border included. The anchor is the bottom corner the width
/// grows away from (west end for `X` frames, north end for `Z` frames).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameGeometry {
    width: i32,
    height: i32,
    axis: PortalAxis,
    anchor: IVec3,
    border: HashSet<IVec3>,
}

impl FrameGeometry {
    pub(crate) fn new(
        width: i32,
        height: i32,
        axis: PortalAxis,
        anchor: IVec3,
        border: HashSet<IVec3>,
    ) -> Self {
        FrameGeometry {
            width,
            height,
            axis,
            anchor,
            border,
        }
    }

    /// Outer width
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Outer height
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn axis(&self) -> PortalAxis {
        self.axis
    }

    /// Bottom corner the frame was measured from
    pub fn anchor(&self) -> IVec3 {
        self.anchor
    }

    /// Every border position, corners included
    pub fn border(&self) -> &HashSet<IVec3> {
        &self.border
    }

    pub fn inner_width(&self) -> i32 {
        self.width - 2
    }

    pub fn inner_height(&self) -> i32 {
        self.height - 2
    }

    /// Direction the width grows in
    pub fn lateral(&self) -> Direction {
        self.axis.lateral()
    }

    /// Position `across` blocks along the width and `up` blocks above the anchor
    pub fn at(&self, across: i32, up: i32) -> IVec3 {
        Direction::Up.step(self.lateral().step(self.anchor, across), up)
    }

    /// Bottom-near, bottom-far, top-near, top-far
    pub fn corners(&self) -> [IVec3; 4] {
        [
            self.at(0, 0),
            self.at(self.width - 1, 0),
            self.at(0, self.height - 1),
            self.at(self.width - 1, self.height - 1),
        ]
    }

    pub fn contains_border(&self, pos: IVec3) -> bool {
        self.border.contains(&pos)
    }

    /// Interior positions, bottom row first
    pub fn interior(&self) -> impl Iterator<Item = IVec3> + '_ {
        (1..self.height - 1)
            .flat_map(move |up| (1..self.width - 1).map(move |across| self.at(across, up)))
    }

    /// Number of border positions a `width` x `height` rectangle has
    pub fn perimeter_len(width: i32, height: i32) -> usize {
        (2 * width + 2 * height - 4).max(0) as usize
    }
}

impl std::fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} frame (inner {}x{}) on axis {} anchored at ({}, {}, {})",
            self.width,
            self.height,
            self.inner_width(),
            self.inner_height(),
            self.axis,
            self.anchor.x,
            self.anchor.y,
            self.anchor.z
        )
    }
}
