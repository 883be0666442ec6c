use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Unit direction in block space
///
/// Horizontal names follow the usual block-game convention:
/// north is -Z, south is +Z, east is +X, west is -X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// The four horizontal directions, in north, south, west, east order
    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Unit vector
    #[inline]
    pub fn offset(self) -> IVec3 {
        const TABLE: [IVec3; 6] = [
            IVec3::NEG_Y,
            IVec3::Y,
            IVec3::NEG_Z,
            IVec3::Z,
            IVec3::NEG_X,
            IVec3::X,
        ];
        TABLE[self as usize]
    }

    /// Get the opposite direction
    #[inline]
    pub fn opposite(self) -> Self {
        const TABLE: [Direction; 6] = [
            Direction::Up,
            Direction::Down,
            Direction::South,
            Direction::North,
            Direction::East,
            Direction::West,
        ];
        TABLE[self as usize]
    }

    /// Move `pos` by `distance` blocks in this direction
    #[inline]
    pub fn step(self, pos: IVec3, distance: i32) -> IVec3 {
        pos + self.offset() * distance
    }

    /// Horizontal plane axis this direction runs along, if any
    pub fn axis(self) -> Option<PortalAxis> {
        match self {
            Direction::West | Direction::East => Some(PortalAxis::X),
            Direction::North | Direction::South => Some(PortalAxis::Z),
            Direction::Up | Direction::Down => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Orientation of a portal frame
///
/// A frame stands in a vertical plane. `X` frames span the X axis (their
/// width runs east), `Z` frames span the Z axis (their width runs south).
/// Validation always tries `X` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortalAxis {
    X,
    Z,
}

impl PortalAxis {
    /// Both axes in validation order
    pub const ALL: [PortalAxis; 2] = [PortalAxis::X, PortalAxis::Z];

    /// Direction the frame's width grows in
    #[inline]
    pub fn lateral(self) -> Direction {
        match self {
            PortalAxis::X => Direction::East,
            PortalAxis::Z => Direction::South,
        }
    }

    /// Direction the anchor walk moves in after descending
    #[inline]
    pub fn negative_lateral(self) -> Direction {
        self.lateral().opposite()
    }
}

impl std::fmt::Display for PortalAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortalAxis::X => f.write_str("x"),
            PortalAxis::Z => f.write_str("z"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_offsets() {
        assert_eq!(Direction::Up.offset(), IVec3::new(0, 1, 0));
        assert_eq!(Direction::Down.offset(), IVec3::new(0, -1, 0));
        assert_eq!(Direction::North.offset(), IVec3::new(0, 0, -1));
        assert_eq!(Direction::South.offset(), IVec3::new(0, 0, 1));
        assert_eq!(Direction::West.offset(), IVec3::new(-1, 0, 0));
        assert_eq!(Direction::East.offset(), IVec3::new(1, 0, 0));
    }

    #[test]
    fn test_opposite() {
        for dir in [
            Direction::Down,
            Direction::Up,
            Direction::North,
            Direction::South,
            Direction::West,
            Direction::East,
        ] {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.offset() + dir.opposite().offset(), IVec3::ZERO);
        }
    }

    #[test]
    fn test_step() {
        let pos = IVec3::new(3, 64, -2);
        assert_eq!(Direction::East.step(pos, 4), IVec3::new(7, 64, -2));
        assert_eq!(Direction::Down.step(pos, 2), IVec3::new(3, 62, -2));
        assert_eq!(Direction::North.step(pos, 0), pos);
    }

    #[test]
    fn test_portal_axis_lateral() {
        assert_eq!(PortalAxis::X.lateral(), Direction::East);
        assert_eq!(PortalAxis::X.negative_lateral(), Direction::West);
        assert_eq!(PortalAxis::Z.lateral(), Direction::South);
        assert_eq!(PortalAxis::Z.negative_lateral(), Direction::North);
    }

    #[test]
    fn test_horizontal_axis() {
        assert_eq!(Direction::East.axis(), Some(PortalAxis::X));
        assert_eq!(Direction::North.axis(), Some(PortalAxis::Z));
        assert_eq!(Direction::Up.axis(), None);
        assert!(Direction::HORIZONTAL.iter().all(|d| d.axis().is_some()));
    }
}
