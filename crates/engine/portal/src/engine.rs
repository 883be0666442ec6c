//! Portal engine tying validation, activation and gatekeeping together

use crate::diagnostics::{self, ConfigSummary, FrameReport};
use crate::ignition::is_valid_ignition_item;
use crate::{
    BlockGrid, BlockGridMut, BlockState, ConfigError, CooldownStore, FrameClassifier,
    FrameMaterials, FrameValidator, GridError, Ignition, IgnitionError, IgnitionRequest,
    PortalActivator, PortalConfig,
};
use glam::IVec3;

/// Entry point for hosts
///
/// Holds an immutable configuration snapshot. Reloading configuration means
/// building a new engine.
#[derive(Debug, Clone)]
pub struct PortalEngine {
    config: PortalConfig,
    validator: FrameValidator<FrameClassifier>,
    activator: PortalActivator,
}

impl Default for PortalEngine {
    fn default() -> Self {
        Self::new(PortalConfig::default())
    }
}

impl PortalEngine {
    /// Create an engine from an already validated configuration
    pub fn new(config: PortalConfig) -> Self {
        let validator = FrameValidator::new(FrameClassifier::from_config(&config), config.limits);
        let activator = PortalActivator::new(config.demolish_radius);
        PortalEngine {
            config,
            validator,
            activator,
        }
    }

    /// Validate a configuration and build an engine from it
    pub fn from_config(config: PortalConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn validator(&self) -> &FrameValidator<FrameClassifier> {
        &self.validator
    }

    pub fn activator(&self) -> &PortalActivator {
        &self.activator
    }

    /// Try to light a portal from an interaction
    ///
    /// The checks run in a fixed order and the first failing one decides
    /// the error. The grid is only written once every check has passed, and
    /// the item is only charged after the portal was written.
    ///
    /// If a marker write fails partway, the markers already placed stay in
    /// the grid and the error is `IgnitionError::Grid`; the item is not
    /// charged and no cooldown is recorded.
    pub fn ignite<G: BlockGridMut + ?Sized>(
        &self,
        grid: &mut G,
        cooldowns: &mut CooldownStore,
        request: IgnitionRequest<'_>,
    ) -> Result<Ignition, IgnitionError> {
        let IgnitionRequest {
            pos,
            agent,
            item,
            hand,
            now,
            creative,
        } = request;

        if !self.config.enabled {
            return Err(IgnitionError::SystemDisabled);
        }

        if !self.validator.is_frame_block(&*grid, pos) {
            return Err(IgnitionError::NotFrameEligible(pos));
        }

        if !is_valid_ignition_item(&self.config, item) {
            tracing::debug!("{} used {} on {}, not an ignition item", agent, item.id, pos);
            return Err(IgnitionError::InvalidIgnitionItem(item.id.clone()));
        }

        if let Some(remaining_ticks) = cooldowns.remaining(agent, now, self.config.cooldown_ticks)
        {
            return Err(IgnitionError::CoolingDown { remaining_ticks });
        }

        let geometry = self
            .validator
            .validate_frame(&*grid, pos)
            .ok_or(IgnitionError::NoFrameFound(pos))?;

        let placed = self.activator.activate(grid, &geometry)?;

        let consumed = !creative;
        if consumed {
            item.consume_one();
        }
        cooldowns.record(agent, now);

        tracing::info!(
            "{} lit a {}x{} portal at {} with {} ({:?} hand)",
            agent,
            geometry.width(),
            geometry.height(),
            geometry.anchor(),
            item.id,
            hand
        );

        Ok(Ignition {
            geometry,
            placed,
            consumed,
        })
    }

    /// React to a block being removed from the grid
    ///
    /// `removed` is the state the position held before removal. Breaking a
    /// frame block or a marker clears markers in the configured radius.
    pub fn on_block_removed<G: BlockGridMut + ?Sized>(
        &self,
        grid: &mut G,
        pos: IVec3,
        removed: &BlockState,
    ) -> Result<usize, GridError> {
        let relevant = match removed {
            BlockState::Marker(_) => true,
            BlockState::Solid(id) => self.validator.materials().is_frame_material(id),
            BlockState::Air => false,
        };
        if !relevant {
            return Ok(0);
        }

        tracing::debug!("Portal block {} removed at {}", removed, pos);
        self.activator.demolish(grid, pos)
    }

    /// Troubleshooting report for the block at `pos`
    pub fn inspect<G: BlockGrid + ?Sized>(&self, grid: &G, pos: IVec3) -> FrameReport {
        diagnostics::inspect(&self.validator, grid, pos)
    }

    pub fn config_summary(&self) -> ConfigSummary {
        ConfigSummary::from(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build_frame, FRAME};
    use crate::{AgentId, FrameLimits, ItemStack, PortalAxis, VoxelWorld};

    fn engine() -> PortalEngine {
        PortalEngine::new(PortalConfig {
            frame_blocks: vec![FRAME.into()],
            ..Default::default()
        })
    }

    fn world_with_frame() -> VoxelWorld {
        let mut world = VoxelWorld::new(0, 64);
        build_frame(&mut world, IVec3::new(0, 1, 0), PortalAxis::X, 4, 5);
        world
    }

    #[test]
    fn test_ignite_lights_portal() {
        let engine = engine();
        let mut world = world_with_frame();
        let mut cooldowns = CooldownStore::new();
        let mut item = ItemStack::damageable("minecraft:flint_and_steel", 0, 64);

        let request = IgnitionRequest::new(IVec3::new(0, 3, 0), AgentId(1), &mut item);
        let ignition = engine.ignite(&mut world, &mut cooldowns, request).unwrap();

        assert_eq!(ignition.placed, 6);
        assert!(ignition.consumed);
        assert_eq!(world.marker_count(), 6);
        assert_eq!(item.durability.unwrap().damage, 1);
        assert_eq!(
            ignition.message_key(&engine.config().messages),
            "message.portal.created"
        );
    }

    #[test]
    fn test_ignite_check_order() {
        let mut world = world_with_frame();
        let mut cooldowns = CooldownStore::new();
        let mut stick = ItemStack::new("minecraft:stick", 1);

        // Disabled wins over everything else
        let disabled = PortalEngine::new(PortalConfig {
            enabled: false,
            ..Default::default()
        });
        let request = IgnitionRequest::new(IVec3::new(9, 9, 9), AgentId(1), &mut stick);
        assert_eq!(
            disabled.ignite(&mut world, &mut cooldowns, request),
            Err(IgnitionError::SystemDisabled)
        );

        // Block is checked before the item
        let request = IgnitionRequest::new(IVec3::new(9, 9, 9), AgentId(1), &mut stick);
        assert_eq!(
            engine().ignite(&mut world, &mut cooldowns, request),
            Err(IgnitionError::NotFrameEligible(IVec3::new(9, 9, 9)))
        );

        let request = IgnitionRequest::new(IVec3::new(0, 1, 0), AgentId(1), &mut stick);
        assert_eq!(
            engine().ignite(&mut world, &mut cooldowns, request),
            Err(IgnitionError::InvalidIgnitionItem("minecraft:stick".into()))
        );
        assert_eq!(stick.count, 1);
        assert_eq!(world.marker_count(), 0);
    }

    #[test]
    fn test_ignite_broken_frame() {
        let engine = engine();
        let mut world = world_with_frame();
        world.set(IVec3::new(3, 5, 0), BlockState::Air);
        let mut cooldowns = CooldownStore::new();
        let mut item = ItemStack::damageable("minecraft:flint_and_steel", 0, 64);

        let request = IgnitionRequest::new(IVec3::new(0, 1, 0), AgentId(1), &mut item);
        assert_eq!(
            engine.ignite(&mut world, &mut cooldowns, request),
            Err(IgnitionError::NoFrameFound(IVec3::new(0, 1, 0)))
        );
        assert_eq!(item.durability.unwrap().damage, 0);
        assert!(cooldowns.is_empty());
    }

    /// Grid that refuses writes once its budget is spent
    struct WriteLimited {
        world: VoxelWorld,
        writes_left: usize,
    }

    impl BlockGrid for WriteLimited {
        fn block(&self, pos: IVec3) -> crate::Result<BlockState> {
            self.world.block(pos)
        }

        fn min_y(&self) -> i32 {
            self.world.min_y()
        }
    }

    impl BlockGridMut for WriteLimited {
        fn set_block(&mut self, pos: IVec3, state: BlockState) -> crate::Result<BlockState> {
            if self.writes_left == 0 {
                return Err(GridError::Unloaded(pos));
            }
            self.writes_left -= 1;
            self.world.set_block(pos, state)
        }
    }

    #[test]
    fn test_ignite_failed_write_keeps_item() {
        let engine = engine();
        let mut grid = WriteLimited {
            world: world_with_frame(),
            writes_left: 2,
        };
        let mut cooldowns = CooldownStore::new();
        let mut item = ItemStack::damageable("minecraft:flint_and_steel", 0, 64);

        let request = IgnitionRequest::new(IVec3::new(0, 1, 0), AgentId(1), &mut item);
        let result = engine.ignite(&mut grid, &mut cooldowns, request);
        assert!(matches!(result, Err(IgnitionError::Grid(GridError::Unloaded(_)))));

        // Markers written before the failure stay in place
        assert_eq!(grid.world.marker_count(), 2);
        assert_eq!(item.durability.unwrap().damage, 0);
        assert_eq!(item.count, 1);
        assert!(cooldowns.is_empty());
    }

    #[test]
    fn test_on_block_removed() {
        let engine = engine();
        let mut world = world_with_frame();
        let mut cooldowns = CooldownStore::new();
        let mut item = ItemStack::damageable("minecraft:flint_and_steel", 0, 64);
        let request = IgnitionRequest::new(IVec3::new(0, 1, 0), AgentId(1), &mut item);
        engine.ignite(&mut world, &mut cooldowns, request).unwrap();

        // Unrelated blocks never trigger a scan
        let stone = BlockState::solid("minecraft:stone");
        assert_eq!(
            engine
                .on_block_removed(&mut world, IVec3::new(1, 0, 0), &stone)
                .unwrap(),
            0
        );
        assert_eq!(world.marker_count(), 6);

        let pos = IVec3::new(3, 3, 0);
        let old = world.set(pos, BlockState::Air);
        assert_eq!(engine.on_block_removed(&mut world, pos, &old).unwrap(), 6);
        assert_eq!(world.marker_count(), 0);
    }

    #[test]
    fn test_from_config_validates() {
        let config = PortalConfig {
            limits: FrameLimits {
                min_width: 30,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(PortalEngine::from_config(config).is_err());
        assert!(PortalEngine::from_config(PortalConfig::default()).is_ok());
    }
}
