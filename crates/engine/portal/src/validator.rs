//! Frame search and validation
//!
//! Validation runs in two steps per axis. A greedy walk finds the frame's
//! bottom corner (the anchor), then `measure` expands width and height from
//! it and checks every border and interior position. The `X` axis is always
//! tried before `Z`.

use crate::{
    BlockGrid, Direction, ExhaustReason, FrameClassifier, FrameGeometry, FrameLimits,
    FrameMaterials, FrameRejection, GridError, PortalAxis,
};
use glam::IVec3;
use std::collections::HashSet;

/// Outcome of an anchor walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSearch {
    /// The walk stopped at an ineligible neighbor
    Found(IVec3),

    /// The walk ran into the world floor or its step budget
    Exhausted {
        /// Last position reached
        last: IVec3,
        /// What stopped it
        reason: ExhaustReason,
    },
}

impl AnchorSearch {
    /// Position the walk ended on, whatever stopped it
    pub fn position(&self) -> IVec3 {
        match *self {
            AnchorSearch::Found(pos) => pos,
            AnchorSearch::Exhausted { last, .. } => last,
        }
    }

    pub fn anchor(&self) -> Option<IVec3> {
        match *self {
            AnchorSearch::Found(pos) => Some(pos),
            AnchorSearch::Exhausted { .. } => None,
        }
    }
}

/// Read-only frame analysis over a block grid
#[derive(Debug, Clone)]
pub struct FrameValidator<M = FrameClassifier> {
    materials: M,
    limits: FrameLimits,
}

impl<M: FrameMaterials> FrameValidator<M> {
    pub fn new(materials: M, limits: FrameLimits) -> Self {
        FrameValidator { materials, limits }
    }

    pub fn materials(&self) -> &M {
        &self.materials
    }

    pub fn limits(&self) -> &FrameLimits {
        &self.limits
    }

    /// Whether the block at `pos` is a frame block
    ///
    /// Never fails: positions the grid cannot answer for read as `false`.
    pub fn is_frame_block<G: BlockGrid + ?Sized>(&self, grid: &G, pos: IVec3) -> bool {
        self.materials.is_frame_block(grid, pos)
    }

    /// Eligibility check used inside searches
    ///
    /// Positions outside the world are simply not frame blocks. Unloaded
    /// positions abort the search.
    pub(crate) fn eligible<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        pos: IVec3,
    ) -> Result<bool, GridError> {
        match grid.block(pos) {
            Ok(state) => Ok(state
                .id()
                .is_some_and(|id| self.materials.is_frame_material(id))),
            Err(GridError::OutOfBounds(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Walk from `start` to the bottom-near corner of a frame on `axis`
    ///
    /// One pass: down as far as possible, then along the axis' negative
    /// lateral direction.
    pub fn find_anchor<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        start: IVec3,
        axis: PortalAxis,
    ) -> Result<AnchorSearch, GridError> {
        self.walk_to_anchor(grid, start, axis.negative_lateral())
    }

    /// Single down-then-`back` pass
    pub fn walk_to_anchor<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        start: IVec3,
        back: Direction,
    ) -> Result<AnchorSearch, GridError> {
        self.walk(grid, start, back, false)
    }

    /// Walk down, then towards `back`, repeating until neither moves
    ///
    /// Reaches the bottom corner from a top edge click, where a single pass
    /// stops at the top corner.
    pub fn settle_anchor<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        start: IVec3,
        back: Direction,
    ) -> Result<AnchorSearch, GridError> {
        self.walk(grid, start, back, true)
    }

    // Downward steps are capped at `max_height - 1` and sideways steps at
    // `max_width - 1`; no valid frame needs more.
    fn walk<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        start: IVec3,
        back: Direction,
        repeat: bool,
    ) -> Result<AnchorSearch, GridError> {
        let min_y = grid.min_y();
        let max_down = self.limits.max_height - 1;
        let max_back = self.limits.max_width - 1;

        let mut pos = start;
        let mut descended = 0;
        let mut shifted = 0;

        loop {
            let mut moved = false;

            loop {
                if pos.y <= min_y {
                    tracing::debug!("Anchor walk reached world floor at {}", pos);
                    return Ok(AnchorSearch::Exhausted {
                        last: pos,
                        reason: ExhaustReason::WorldFloor,
                    });
                }
                let below = Direction::Down.step(pos, 1);
                if !self.eligible(grid, below)? {
                    break;
                }
                if descended >= max_down {
                    return Ok(AnchorSearch::Exhausted {
                        last: pos,
                        reason: ExhaustReason::StepBudget,
                    });
                }
                pos = below;
                descended += 1;
                moved = true;
            }

            loop {
                let next = back.step(pos, 1);
                if !self.eligible(grid, next)? {
                    break;
                }
                if shifted >= max_back {
                    return Ok(AnchorSearch::Exhausted {
                        last: pos,
                        reason: ExhaustReason::StepBudget,
                    });
                }
                pos = next;
                shifted += 1;
                moved = true;
            }

            if !repeat || !moved {
                return Ok(AnchorSearch::Found(pos));
            }
        }
    }

    /// Outer length of the run of frame blocks starting at `from` along `dir`
    ///
    /// Counts at most `max` blocks past `from`, so a result of `max + 1`
    /// means "longer than allowed".
    pub fn span<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        from: IVec3,
        dir: Direction,
        max: i32,
    ) -> Result<i32, GridError> {
        let mut count = 0;
        while count < max && self.eligible(grid, dir.step(from, count + 1))? {
            count += 1;
        }
        Ok(count + 1)
    }

    /// Measure and check a frame whose bottom-near corner is `anchor`
    ///
    /// Any failing border or interior position aborts immediately.
    pub fn measure<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        anchor: IVec3,
        axis: PortalAxis,
    ) -> Result<FrameGeometry, FrameRejection> {
        let lateral = axis.lateral();
        let limits = &self.limits;

        let width = self.span(grid, anchor, lateral, limits.max_width)?;
        let height = self.span(grid, anchor, Direction::Up, limits.max_height)?;
        if !limits.contains(width, height) {
            return Err(FrameRejection::SizeOutOfBounds { width, height });
        }

        let at = |across: i32, up: i32| Direction::Up.step(lateral.step(anchor, across), up);
        let mut border = HashSet::with_capacity(FrameGeometry::perimeter_len(width, height));

        let corners = [
            at(0, 0),
            at(width - 1, 0),
            at(0, height - 1),
            at(width - 1, height - 1),
        ];
        for pos in corners {
            if !self.eligible(grid, pos)? {
                return Err(FrameRejection::MissingBorder { pos, corner: true });
            }
            border.insert(pos);
        }

        let edges = (1..width - 1)
            .flat_map(|i| [at(i, 0), at(i, height - 1)])
            .chain((1..height - 1).flat_map(|j| [at(0, j), at(width - 1, j)]));
        for pos in edges {
            if !self.eligible(grid, pos)? {
                return Err(FrameRejection::MissingBorder { pos, corner: false });
            }
            border.insert(pos);
        }

        if width - 2 < FrameLimits::MIN_INNER_WIDTH || height - 2 < FrameLimits::MIN_INNER_HEIGHT {
            return Err(FrameRejection::SizeOutOfBounds { width, height });
        }
        for up in 1..height - 1 {
            for across in 1..width - 1 {
                let pos = at(across, up);
                if !grid.is_empty(pos)? {
                    return Err(FrameRejection::InteriorOccupied { pos });
                }
            }
        }

        Ok(FrameGeometry::new(width, height, axis, anchor, border))
    }

    /// Find and measure a frame on one axis
    ///
    /// Measures from the single-pass anchor first. If that fails, the
    /// repeated walk gets one more try; the first failure is reported when
    /// both fail.
    pub fn try_axis<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        pos: IVec3,
        axis: PortalAxis,
    ) -> Result<FrameGeometry, FrameRejection> {
        let first = self.find_anchor(grid, pos, axis)?;
        let rejection = match self.measure_search(grid, first, axis) {
            Ok(geometry) => return Ok(geometry),
            Err(FrameRejection::Grid(e)) => return Err(FrameRejection::Grid(e)),
            Err(reason) => reason,
        };

        let settled = self.settle_anchor(grid, pos, axis.negative_lateral())?;
        if settled == first {
            return Err(rejection);
        }
        match self.measure_search(grid, settled, axis) {
            Ok(geometry) => {
                tracing::debug!("Settled anchor {} after: {}", settled.position(), rejection);
                Ok(geometry)
            }
            Err(FrameRejection::Grid(e)) => Err(FrameRejection::Grid(e)),
            Err(_) => Err(rejection),
        }
    }

    fn measure_search<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        search: AnchorSearch,
        axis: PortalAxis,
    ) -> Result<FrameGeometry, FrameRejection> {
        match search {
            AnchorSearch::Found(anchor) => self.measure(grid, anchor, axis),
            AnchorSearch::Exhausted { last, reason } => {
                Err(FrameRejection::SearchExhausted { last, reason })
            }
        }
    }

    /// Validate the frame containing `pos`, keeping the failure reason
    ///
    /// When both axes fail the `Z` axis reason is returned. Grid failures
    /// abort without trying the other axis.
    pub fn try_validate<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        pos: IVec3,
    ) -> Result<FrameGeometry, FrameRejection> {
        if !self.eligible(grid, pos)? {
            return Err(FrameRejection::NotFrameEligible(pos));
        }

        let mut rejection = FrameRejection::NotFrameEligible(pos);
        for axis in PortalAxis::ALL {
            match self.try_axis(grid, pos, axis) {
                Ok(geometry) => return Ok(geometry),
                Err(FrameRejection::Grid(e)) => return Err(FrameRejection::Grid(e)),
                Err(reason) => {
                    tracing::debug!("Axis {} rejected at {}: {}", axis, pos, reason);
                    rejection = reason;
                }
            }
        }
        Err(rejection)
    }

    /// Validate the frame containing `pos`
    pub fn validate_frame<G: BlockGrid + ?Sized>(
        &self,
        grid: &G,
        pos: IVec3,
    ) -> Option<FrameGeometry> {
        match self.try_validate(grid, pos) {
            Ok(geometry) => {
                tracing::debug!("Validated {}", geometry);
                Some(geometry)
            }
            Err(FrameRejection::Grid(e)) => {
                tracing::warn!("Frame validation at {} aborted: {}", pos, e);
                None
            }
            Err(reason) => {
                tracing::debug!("No frame at {}: {}", pos, reason);
                None
            }
        }
    }
}
