//! Troubleshooting reports
//!
//! Unlike validation, probing never stops at the first problem. Each
//! horizontal direction is tried as the width direction, and everything that
//! is wrong with the candidate frame is collected for display.

use crate::config::DEFAULT_FRAME_MATERIAL;
use crate::{
    AnchorSearch, BlockGrid, BlockState, Direction, FrameClassifier, FrameGeometry, FrameLimits,
    FrameMaterials, FrameRejection, FrameValidator, GridError, PortalConfig,
};
use glam::IVec3;
use std::fmt;

/// Everything known about a clicked block and the frame around it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub pos: IVec3,
    pub state: Result<BlockState, GridError>,
    pub eligible: bool,
    /// Geometry found by regular validation
    pub geometry: Option<FrameGeometry>,
    /// Why regular validation failed
    pub rejection: Option<FrameRejection>,
    /// Per-direction measurements, empty when the block is not a frame block
    pub directions: Vec<DirectionReport>,
}

impl FrameReport {
    pub fn is_valid(&self) -> bool {
        self.geometry.is_some()
    }
}

/// Measurement of one candidate width direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionReport {
    /// Direction the width was measured in
    pub direction: Direction,
    pub anchor: AnchorSearch,
    pub width: i32,
    pub height: i32,
    /// Corners that are not frame blocks
    pub missing_corners: Vec<IVec3>,
    /// Solid blocks inside the measured rectangle
    pub occupied_interior: Vec<IVec3>,
    pub size_ok: bool,
    /// Grid failure that cut the measurement short
    pub error: Option<GridError>,
}

impl DirectionReport {
    fn failed(direction: Direction, start: IVec3, error: GridError) -> Self {
        DirectionReport {
            direction,
            anchor: AnchorSearch::Found(start),
            width: 0,
            height: 0,
            missing_corners: Vec::new(),
            occupied_interior: Vec::new(),
            size_ok: false,
            error: Some(error),
        }
    }

    /// Whether this direction describes a complete frame
    pub fn looks_valid(&self) -> bool {
        self.error.is_none()
            && self.anchor.anchor().is_some()
            && self.size_ok
            && self.missing_corners.is_empty()
            && self.occupied_interior.is_empty()
    }
}

/// Build a full report for `pos`
pub fn inspect<M, G>(validator: &FrameValidator<M>, grid: &G, pos: IVec3) -> FrameReport
where
    M: FrameMaterials,
    G: BlockGrid + ?Sized,
{
    let state = grid.block(pos);
    let eligible = validator.is_frame_block(grid, pos);

    let (geometry, rejection) = match validator.try_validate(grid, pos) {
        Ok(geometry) => (Some(geometry), None),
        Err(rejection) => (None, Some(rejection)),
    };

    let directions = if eligible {
        Direction::HORIZONTAL
            .iter()
            .map(|&direction| {
                measure_direction(validator, grid, pos, direction)
                    .unwrap_or_else(|e| DirectionReport::failed(direction, pos, e))
            })
            .collect()
    } else {
        Vec::new()
    };

    FrameReport {
        pos,
        state,
        eligible,
        geometry,
        rejection,
        directions,
    }
}

fn measure_direction<M, G>(
    validator: &FrameValidator<M>,
    grid: &G,
    start: IVec3,
    direction: Direction,
) -> Result<DirectionReport, GridError>
where
    M: FrameMaterials,
    G: BlockGrid + ?Sized,
{
    let limits = validator.limits();
    let anchor = validator.walk_to_anchor(grid, start, direction.opposite())?;
    let origin = anchor.position();

    let width = validator.span(grid, origin, direction, limits.max_width)?;
    let height = validator.span(grid, origin, Direction::Up, limits.max_height)?;
    let at = |across: i32, up: i32| Direction::Up.step(direction.step(origin, across), up);

    let missing_corners = [
        at(0, 0),
        at(width - 1, 0),
        at(0, height - 1),
        at(width - 1, height - 1),
    ]
    .into_iter()
    .filter(|&corner| !validator.is_frame_block(grid, corner))
    .collect();

    let mut occupied_interior = Vec::new();
    for up in 1..height - 1 {
        for across in 1..width - 1 {
            let pos = at(across, up);
            if !grid.is_empty(pos)? {
                occupied_interior.push(pos);
            }
        }
    }

    Ok(DirectionReport {
        direction,
        anchor,
        width,
        height,
        missing_corners,
        occupied_interior,
        size_ok: limits.contains(width, height),
        error: None,
    })
}

fn write_positions(f: &mut fmt::Formatter<'_>, label: &str, positions: &[IVec3]) -> fmt::Result {
    if positions.is_empty() {
        return Ok(());
    }
    write!(f, "    {}:", label)?;
    for pos in positions {
        write!(f, " {}", pos)?;
    }
    writeln!(f)
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Ok(state) => writeln!(
                f,
                "Block at {}: {} ({})",
                self.pos,
                state,
                if self.eligible {
                    "frame block"
                } else {
                    "not a frame block"
                }
            )?,
            Err(e) => writeln!(f, "Block at {}: unreadable ({})", self.pos, e)?,
        }

        match (&self.geometry, &self.rejection) {
            (Some(geometry), _) => writeln!(f, "Valid portal: {}", geometry)?,
            (None, Some(rejection)) => writeln!(f, "No valid portal: {}", rejection)?,
            (None, None) => writeln!(f, "No valid portal")?,
        }

        for report in &self.directions {
            write!(f, "{}", report)?;
        }
        Ok(())
    }
}

impl fmt::Display for DirectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction.axis() {
            Some(axis) => write!(f, "  Width {} (axis {}): ", self.direction, axis)?,
            None => write!(f, "  Width {}: ", self.direction)?,
        }
        if let Some(e) = &self.error {
            return writeln!(f, "measurement failed: {}", e);
        }

        match self.anchor {
            AnchorSearch::Found(anchor) => write!(f, "anchor {}", anchor)?,
            AnchorSearch::Exhausted { last, reason } => {
                write!(f, "anchor search stopped at {} ({})", last, reason)?
            }
        }
        writeln!(
            f,
            ", size {}x{} {}",
            self.width,
            self.height,
            if self.size_ok { "ok" } else { "out of bounds" }
        )?;
        write_positions(f, "missing corners", &self.missing_corners)?;
        write_positions(f, "occupied interior", &self.occupied_interior)
    }
}

/// Short description of the active configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSummary {
    pub enabled: bool,
    pub limits: FrameLimits,
    /// Materials that count as frame blocks, sorted
    pub frame_blocks: Vec<String>,
    pub ignition_item: String,
    pub support_legacy_items: bool,
    pub cooldown_ticks: u64,
}

impl From<&PortalConfig> for ConfigSummary {
    fn from(config: &PortalConfig) -> Self {
        let classifier = FrameClassifier::from_config(config);
        let mut frame_blocks: Vec<String> = classifier.allowed().map(String::from).collect();
        frame_blocks.sort();
        if classifier.is_legacy() && !frame_blocks.iter().any(|id| id == DEFAULT_FRAME_MATERIAL) {
            frame_blocks.push(format!("{} (legacy)", DEFAULT_FRAME_MATERIAL));
        }

        ConfigSummary {
            enabled: config.enabled,
            limits: config.limits,
            frame_blocks,
            ignition_item: config.effective_ignition_item().to_string(),
            support_legacy_items: config.support_legacy_items,
            cooldown_ticks: config.cooldown_ticks,
        }
    }
}

impl fmt::Display for ConfigSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Custom portals: {}",
            if self.enabled { "enabled" } else { "disabled" }
        )?;
        writeln!(
            f,
            "Frame size: {}x{} to {}x{}",
            self.limits.min_width, self.limits.min_height, self.limits.max_width, self.limits.max_height
        )?;
        writeln!(f, "Frame blocks: {}", self.frame_blocks.join(", "))?;
        writeln!(f, "Ignition item: {}", self.ignition_item)?;
        writeln!(
            f,
            "Legacy items: {}",
            if self.support_legacy_items { "on" } else { "off" }
        )?;
        writeln!(f, "Cooldown: {} ticks", self.cooldown_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build_frame, classifier};
    use crate::{PortalAxis, VoxelWorld};

    fn validator() -> FrameValidator {
        FrameValidator::new(classifier(), FrameLimits::default())
    }

    #[test]
    fn test_inspect_valid_frame() {
        let mut world = VoxelWorld::new(0, 64);
        let anchor = IVec3::new(0, 1, 0);
        build_frame(&mut world, anchor, PortalAxis::X, 4, 5);

        let report = inspect(&validator(), &world, IVec3::new(1, 1, 0));
        assert!(report.is_valid());
        assert!(report.eligible);
        assert_eq!(report.directions.len(), 4);

        let east = report
            .directions
            .iter()
            .find(|d| d.direction == Direction::East)
            .unwrap();
        assert!(east.looks_valid());
        assert_eq!(east.anchor, AnchorSearch::Found(anchor));
        assert_eq!((east.width, east.height), (4, 5));

        let north = report
            .directions
            .iter()
            .find(|d| d.direction == Direction::North)
            .unwrap();
        assert!(!north.looks_valid());
        assert_eq!(north.width, 1);
    }

    #[test]
    fn test_inspect_reports_all_problems() {
        let mut world = VoxelWorld::new(0, 64);
        let anchor = IVec3::new(0, 1, 0);
        build_frame(&mut world, anchor, PortalAxis::X, 5, 6);
        world.set(IVec3::new(4, 6, 0), BlockState::Air);
        world.set(IVec3::new(2, 3, 0), BlockState::solid("minecraft:dirt"));
        world.set(IVec3::new(3, 4, 0), BlockState::solid("minecraft:dirt"));

        let report = inspect(&validator(), &world, anchor);
        assert!(!report.is_valid());
        assert!(matches!(
            report.rejection,
            Some(FrameRejection::SizeOutOfBounds { .. })
        ));

        let east = &report.directions[3];
        assert_eq!(east.direction, Direction::East);
        assert_eq!(east.missing_corners, vec![IVec3::new(4, 6, 0)]);
        assert_eq!(
            east.occupied_interior,
            vec![IVec3::new(2, 3, 0), IVec3::new(3, 4, 0)]
        );
        assert!(east.size_ok);

        let text = report.to_string();
        assert!(text.contains("missing corners"));
        assert!(text.contains("occupied interior"));
    }

    #[test]
    fn test_inspect_non_frame_block() {
        let world = VoxelWorld::new(0, 64);
        let report = inspect(&validator(), &world, IVec3::new(0, 4, 0));
        assert!(!report.eligible);
        assert!(report.directions.is_empty());
        assert_eq!(report.state, Ok(BlockState::Air));
        assert!(report.to_string().contains("not a frame block"));
    }

    #[test]
    fn test_inspect_unloaded_neighbor() {
        let mut world = VoxelWorld::new(0, 64);
        let anchor = IVec3::new(0, 1, 0);
        build_frame(&mut world, anchor, PortalAxis::X, 4, 5);
        let world = world.with_loaded_region(IVec3::new(0, 0, 0), IVec3::new(8, 8, 8));

        let report = inspect(&validator(), &world, anchor);
        assert!(!report.is_valid());
        assert!(matches!(report.rejection, Some(FrameRejection::Grid(_))));
        let west = &report.directions[2];
        assert_eq!(west.direction, Direction::West);
        assert!(west.error.is_some());
    }

    #[test]
    fn test_config_summary() {
        let summary = ConfigSummary::from(&PortalConfig::default());
        let text = summary.to_string();
        assert!(text.contains("enabled"));
        assert!(text.contains("4x5 to 23x23"));
        assert!(text.contains("minecraft:crying_obsidian"));
        assert!(text.contains("minecraft:flint_and_steel"));
        assert!(!text.contains("(legacy)"));
    }

    #[test]
    fn test_config_summary_lists_legacy_material() {
        let config = PortalConfig {
            frame_blocks: vec!["minecraft:crying_obsidian".into()],
            support_legacy_items: true,
            ..Default::default()
        };
        let summary = ConfigSummary::from(&config);
        assert_eq!(
            summary.frame_blocks,
            vec![
                "minecraft:crying_obsidian".to_string(),
                "minecraft:obsidian (legacy)".to_string(),
            ]
        );
    }

    #[test]
    fn test_direction_report_names_axis() {
        let mut world = VoxelWorld::new(0, 64);
        build_frame(&mut world, IVec3::new(0, 1, 0), PortalAxis::Z, 4, 5);

        let report = inspect(&validator(), &world, IVec3::new(0, 1, 0));
        let text = report.to_string();
        assert!(text.contains("Width south (axis z)"));
        assert!(text.contains("Width east (axis x)"));
    }
}
