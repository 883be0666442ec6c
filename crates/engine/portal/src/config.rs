//! Portal configuration
//!
//! Handles loading and saving the portal settings including:
//! - Allowed frame materials
//! - Ignition item and legacy item support
//! - Frame size limits
//! - Message keys shown to players

use crate::{BlockId, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Material that vanilla portals are built from
///
/// It is only a frame material when listed explicitly or when legacy
/// support is on.
pub const DEFAULT_FRAME_MATERIAL: &str = "minecraft:obsidian";

/// Vanilla ignition tool, also the fallback when no item is configured
pub const FLINT_AND_STEEL: &str = "minecraft:flint_and_steel";

/// Second vanilla ignition item
pub const FIRE_CHARGE: &str = "minecraft:fire_charge";

/// Items accepted when legacy ignition support is on
pub const LEGACY_IGNITION_ITEMS: [&str; 2] = [FLINT_AND_STEEL, FIRE_CHARGE];

/// Portal configuration stored in a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Master switch for custom portals
    pub enabled: bool,
    /// Block identifiers that may form a frame
    pub frame_blocks: Vec<BlockId>,
    /// Item that lights a portal (empty = flint and steel)
    pub ignition_item: String,
    /// Accept vanilla ignition items and the default frame material
    pub support_legacy_items: bool,
    /// Minimum ticks between two ignitions by the same agent (0 = off)
    pub cooldown_ticks: u64,
    /// Half-extent of the cube cleared when a portal breaks
    pub demolish_radius: i32,
    /// Outer frame size limits
    pub limits: FrameLimits,
    /// Message keys shown to players
    pub messages: PortalMessages,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frame_blocks: vec![
                DEFAULT_FRAME_MATERIAL.to_string(),
                "minecraft:crying_obsidian".to_string(),
            ],
            ignition_item: FLINT_AND_STEEL.to_string(),
            support_legacy_items: false,
            cooldown_ticks: 0,
            demolish_radius: 5,
            limits: FrameLimits::default(),
            messages: PortalMessages::default(),
        }
    }
}

impl PortalConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PortalConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the config as pretty TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load config from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load config from file, or return default if missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No portal config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "Failed to load portal config {}: {}, using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, self.to_toml_string()?)?;
        tracing::info!("Saved portal config to {}", path.display());
        Ok(())
    }

    /// Check value constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        if self.demolish_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "demolish_radius must not be negative, got {}",
                self.demolish_radius
            )));
        }
        if self.frame_blocks.iter().any(|id| id.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "frame_blocks contains an empty identifier".into(),
            ));
        }
        Ok(())
    }

    /// The ignition item with the empty-string fallback applied
    pub fn effective_ignition_item(&self) -> &str {
        if self.ignition_item.is_empty() {
            FLINT_AND_STEEL
        } else {
            &self.ignition_item
        }
    }
}

/// Outer frame size limits, border included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLimits {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            min_width: 4,
            min_height: 5,
            max_width: 23,
            max_height: 23,
        }
    }
}

impl FrameLimits {
    /// Smallest interior a frame may enclose
    pub const MIN_INNER_WIDTH: i32 = 2;
    pub const MIN_INNER_HEIGHT: i32 = 3;

    /// Whether an outer size is accepted
    pub fn contains(&self, width: i32, height: i32) -> bool {
        (self.min_width..=self.max_width).contains(&width)
            && (self.min_height..=self.max_height).contains(&height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_width < Self::MIN_INNER_WIDTH + 2 || self.min_height < Self::MIN_INNER_HEIGHT + 2
        {
            return Err(ConfigError::Invalid(format!(
                "minimum frame size {}x{} is below {}x{}",
                self.min_width,
                self.min_height,
                Self::MIN_INNER_WIDTH + 2,
                Self::MIN_INNER_HEIGHT + 2
            )));
        }
        if self.min_width > self.max_width || self.min_height > self.max_height {
            return Err(ConfigError::Invalid(format!(
                "minimum frame size {}x{} exceeds maximum {}x{}",
                self.min_width, self.min_height, self.max_width, self.max_height
            )));
        }
        Ok(())
    }
}

/// Translation keys for player-facing messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalMessages {
    pub invalid_block: String,
    pub invalid_item: String,
    pub no_frame: String,
    pub disabled: String,
    pub cooldown: String,
    pub portal_created: String,
}

impl Default for PortalMessages {
    fn default() -> Self {
        Self {
            invalid_block: "message.portal.invalid_block".into(),
            invalid_item: "message.portal.invalid_item".into(),
            no_frame: "message.portal.no_frame".into(),
            disabled: "message.portal.disabled".into(),
            cooldown: "message.portal.cooldown".into(),
            portal_created: "message.portal.created".into(),
        }
    }
}
