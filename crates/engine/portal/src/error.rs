//! Error types for the portal crate

use glam::IVec3;
use thiserror::Error;

/// Result type alias for grid access
pub type Result<T> = std::result::Result<T, GridError>;

/// Failures reported by a grid collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// Position lies outside the addressable world
    #[error("Position out of bounds: {0}")]
    OutOfBounds(IVec3),

    /// Position is addressable but not currently loaded
    #[error("Position not loaded: {0}")]
    Unloaded(IVec3),
}

/// Why a frame search ended without a geometry
///
/// Only diagnostics look at the individual variants. Callers of
/// `FrameValidator::validate_frame` see a plain `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameRejection {
    /// The starting block is not a frame material
    #[error("Block at {0} is not a frame block")]
    NotFrameEligible(IVec3),

    /// The anchor walk hit the world floor or its step budget
    #[error("Anchor search exhausted at {last}: {reason}")]
    SearchExhausted {
        /// Last position reached by the walk
        last: IVec3,
        /// What stopped the walk
        reason: ExhaustReason,
    },

    /// Measured outer size is outside the configured limits
    #[error("Frame size {width}x{height} out of bounds")]
    SizeOutOfBounds {
        /// Measured outer width
        width: i32,
        /// Measured outer height
        height: i32,
    },

    /// A border position is not a frame block
    #[error("Missing frame block at {pos}")]
    MissingBorder {
        /// The failing border position
        pos: IVec3,
        /// Whether the position is one of the four corners
        corner: bool,
    },

    /// A solid block sits inside the frame
    #[error("Interior occupied at {pos}")]
    InteriorOccupied {
        /// The first occupied interior position
        pos: IVec3,
    },

    /// The grid could not answer a query
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}

/// What stopped an anchor walk before it found a corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustReason {
    /// The block below would be under the world's lower bound
    WorldFloor,
    /// The walk took more steps than any valid frame allows
    StepBudget,
}

impl std::fmt::Display for ExhaustReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExhaustReason::WorldFloor => write!(f, "reached world floor"),
            ExhaustReason::StepBudget => write!(f, "exceeded step budget"),
        }
    }
}

/// Rejections from the ignition gatekeeper
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IgnitionError {
    /// The portal system is turned off
    #[error("Portal system disabled")]
    SystemDisabled,

    /// Clicked block is not a configured frame material
    #[error("Block at {0} is not a frame block")]
    NotFrameEligible(IVec3),

    /// Item does not match the configured or legacy ignition items
    #[error("Item {0} cannot ignite portals")]
    InvalidIgnitionItem(String),

    /// The agent ignited a portal too recently
    #[error("Ignition on cooldown for {remaining_ticks} more ticks")]
    CoolingDown {
        /// Ticks until the agent may ignite again
        remaining_ticks: u64,
    },

    /// Neither axis produced a valid frame
    #[error("No valid portal frame found at {0}")]
    NoFrameFound(IVec3),

    /// The grid failed while writing the portal
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}

/// Errors loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Values parsed but violate a constraint
    #[error("Invalid config: {0}")]
    Invalid(String),
}
