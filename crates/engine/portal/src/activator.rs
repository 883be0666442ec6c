//! Portal activation and demolition
//!
//! The activator is the only component that writes to the grid. It fills a
//! validated frame's interior with markers and clears markers around a
//! broken frame.

use crate::{BlockGridMut, BlockState, FrameGeometry, GridError};
use glam::IVec3;

/// Writes and removes portal markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortalActivator {
    radius: i32,
}

impl Default for PortalActivator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

impl PortalActivator {
    /// Half-extent of the demolition cube unless configured otherwise
    pub const DEFAULT_RADIUS: i32 = 5;

    pub fn new(radius: i32) -> Self {
        PortalActivator {
            radius: radius.max(0),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Fill the interior of `geometry` with markers oriented on its axis
    ///
    /// Returns the number of markers placed. A write failure stops the fill
    /// and leaves already placed markers in the grid.
    pub fn activate<G: BlockGridMut + ?Sized>(
        &self,
        grid: &mut G,
        geometry: &FrameGeometry,
    ) -> Result<usize, GridError> {
        let marker = BlockState::Marker(geometry.axis());
        let mut placed = 0;

        for pos in geometry.interior() {
            if geometry.contains_border(pos) {
                tracing::warn!("Skipping border position {} during activation", pos);
                continue;
            }
            grid.set_block(pos, marker.clone())?;
            placed += 1;
        }

        tracing::info!("Activated {} with {} markers", geometry, placed);
        Ok(placed)
    }

    /// Clear markers in the configured cube around `origin`
    pub fn demolish<G: BlockGridMut + ?Sized>(
        &self,
        grid: &mut G,
        origin: IVec3,
    ) -> Result<usize, GridError> {
        Self::demolish_around(grid, origin, self.radius)
    }

    /// Replace every marker within `radius` of `origin` (a cube) with air
    ///
    /// Positions the grid cannot read are skipped. Running it twice removes
    /// nothing the second time.
    pub fn demolish_around<G: BlockGridMut + ?Sized>(
        grid: &mut G,
        origin: IVec3,
        radius: i32,
    ) -> Result<usize, GridError> {
        let radius = radius.max(0);
        let mut removed = 0;

        for dx in -radius..=radius {
            for dy in -radius..=radius {
                for dz in -radius..=radius {
                    let pos = origin + IVec3::new(dx, dy, dz);
                    match grid.block(pos) {
                        Ok(state) if state.is_marker() => {
                            grid.set_block(pos, BlockState::Air)?;
                            removed += 1;
                        }
                        Ok(_) => {}
                        Err(e) => tracing::debug!("Demolition skipped {}: {}", pos, e),
                    }
                }
            }
        }

        if removed > 0 {
            tracing::info!("Removed {} portal markers around {}", removed, origin);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build_frame, classifier, FRAME};
    use crate::{FrameLimits, FrameValidator, PortalAxis, VoxelWorld};

    fn frame_at(
        world: &mut VoxelWorld,
        anchor: IVec3,
        axis: PortalAxis,
        w: i32,
        h: i32,
    ) -> FrameGeometry {
        build_frame(world, anchor, axis, w, h);
        FrameValidator::new(classifier(), FrameLimits::default())
            .validate_frame(world, anchor)
            .unwrap()
    }

    #[test]
    fn test_activate_fills_interior() {
        let mut world = VoxelWorld::new(0, 64);
        let geometry = frame_at(&mut world, IVec3::new(0, 1, 0), PortalAxis::X, 4, 5);

        let placed = PortalActivator::default()
            .activate(&mut world, &geometry)
            .unwrap();
        assert_eq!(placed, 6);
        assert_eq!(world.marker_count(), 6);
        for pos in geometry.interior() {
            assert_eq!(world.get(pos), BlockState::Marker(PortalAxis::X));
        }
        for &pos in geometry.border() {
            assert_eq!(world.get(pos), BlockState::solid(FRAME));
        }
    }

    #[test]
    fn test_activate_write_failure() {
        let mut world = VoxelWorld::new(0, 64);
        let geometry = frame_at(&mut world, IVec3::new(0, 1, 0), PortalAxis::Z, 4, 5);
        let mut world = world.with_loaded_region(IVec3::new(-1, 0, -1), IVec3::new(1, 3, 5));

        let result = PortalActivator::default().activate(&mut world, &geometry);
        assert_eq!(result, Err(GridError::Unloaded(IVec3::new(0, 4, 1))));
        // Rows below the unloaded one were already written
        assert_eq!(world.marker_count(), 4);
    }

    #[test]
    fn test_demolish_is_idempotent() {
        let mut world = VoxelWorld::new(0, 64);
        let geometry = frame_at(&mut world, IVec3::new(0, 1, 0), PortalAxis::X, 4, 5);
        let activator = PortalActivator::default();
        activator.activate(&mut world, &geometry).unwrap();

        assert_eq!(activator.demolish(&mut world, IVec3::new(0, 1, 0)).unwrap(), 6);
        assert_eq!(activator.demolish(&mut world, IVec3::new(0, 1, 0)).unwrap(), 0);
        // The frame itself is left alone
        assert_eq!(world.len(), 14);
    }

    #[test]
    fn test_demolish_respects_radius() {
        let mut world = VoxelWorld::new(0, 64);
        world.set(IVec3::new(2, 10, 0), BlockState::Marker(PortalAxis::Z));
        world.set(IVec3::new(3, 10, 0), BlockState::Marker(PortalAxis::Z));

        let removed =
            PortalActivator::demolish_around(&mut world, IVec3::new(0, 10, 0), 2).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(world.get(IVec3::new(3, 10, 0)), BlockState::Marker(PortalAxis::Z));
    }

    #[test]
    fn test_demolish_skips_unreadable_positions() {
        let mut world = VoxelWorld::new(0, 64);
        world.set(IVec3::new(0, 1, 0), BlockState::Marker(PortalAxis::X));
        let mut world = world.with_loaded_region(IVec3::new(0, 0, 0), IVec3::new(4, 8, 4));

        // Cube reaches below the world and outside the loaded area
        let removed = PortalActivator::new(3)
            .demolish(&mut world, IVec3::new(0, 0, 0))
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(world.marker_count(), 0);
    }
}
