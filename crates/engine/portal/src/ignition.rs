//! Ignition requests and their bookkeeping
//!
//! The gatekeeping itself lives in `PortalEngine::ignite`. This module holds
//! the values flowing in and out of it: the item stack being used, the
//! per-agent cooldown store and the successful outcome.

use crate::config::LEGACY_IGNITION_ITEMS;
use crate::{FrameGeometry, IgnitionError, PortalConfig, PortalMessages};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifies the agent (usually a player) performing an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Hand holding the item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    #[default]
    Main,
    Off,
}

/// Wear of a damageable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durability {
    /// Damage taken so far
    pub damage: u32,
    /// Damage at which the item breaks
    pub max: u32,
}

impl Durability {
    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.damage)
    }
}

/// Stack of items held by an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub id: String,
    pub count: u32,
    pub durability: Option<Durability>,
}

impl ItemStack {
    pub fn new(id: impl Into<String>, count: u32) -> Self {
        ItemStack {
            id: id.into(),
            count,
            durability: None,
        }
    }

    /// A single damageable item
    pub fn damageable(id: impl Into<String>, damage: u32, max: u32) -> Self {
        ItemStack {
            id: id.into(),
            count: 1,
            durability: Some(Durability { damage, max }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.id.is_empty()
    }

    /// Use up one unit of the stack
    ///
    /// Damageable items take one point of damage and disappear when they
    /// break. Anything else loses one item.
    pub fn consume_one(&mut self) {
        match &mut self.durability {
            Some(durability) => {
                durability.damage = durability.damage.saturating_add(1);
                if durability.damage >= durability.max {
                    self.count = self.count.saturating_sub(1);
                    durability.damage = 0;
                }
            }
            None => self.count = self.count.saturating_sub(1),
        }
    }
}

/// One interaction with a block that may light a portal
#[derive(Debug)]
pub struct IgnitionRequest<'a> {
    /// The clicked block
    pub pos: IVec3,
    pub agent: AgentId,
    /// The item in hand, consumed on success
    pub item: &'a mut ItemStack,
    pub hand: Hand,
    /// Host tick the interaction happened on
    pub now: u64,
    /// Creative agents keep their items
    pub creative: bool,
}

impl<'a> IgnitionRequest<'a> {
    pub fn new(pos: IVec3, agent: AgentId, item: &'a mut ItemStack) -> Self {
        IgnitionRequest {
            pos,
            agent,
            item,
            hand: Hand::Main,
            now: 0,
            creative: false,
        }
    }

    pub fn with_hand(mut self, hand: Hand) -> Self {
        self.hand = hand;
        self
    }

    pub fn at_tick(mut self, now: u64) -> Self {
        self.now = now;
        self
    }

    pub fn creative(mut self, creative: bool) -> Self {
        self.creative = creative;
        self
    }
}

/// Tick of each agent's last successful ignition
///
/// Owned by the host and passed into every ignition call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CooldownStore {
    last: HashMap<AgentId, u64>,
}

impl CooldownStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks the agent still has to wait, if any
    pub fn remaining(&self, agent: AgentId, now: u64, cooldown_ticks: u64) -> Option<u64> {
        if cooldown_ticks == 0 {
            return None;
        }
        let last = *self.last.get(&agent)?;
        let elapsed = now.saturating_sub(last);
        (elapsed < cooldown_ticks).then(|| cooldown_ticks - elapsed)
    }

    pub fn record(&mut self, agent: AgentId, now: u64) {
        self.last.insert(agent, now);
    }

    pub fn last_ignition(&self, agent: AgentId) -> Option<u64> {
        self.last.get(&agent).copied()
    }

    /// Forget an agent, e.g. when it disconnects
    pub fn forget(&mut self, agent: AgentId) {
        self.last.remove(&agent);
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

/// A portal lit by a successful ignition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ignition {
    pub geometry: FrameGeometry,
    /// Markers written into the interior
    pub placed: usize,
    /// Whether the item stack was charged
    pub consumed: bool,
}

impl Ignition {
    pub fn message_key<'m>(&self, messages: &'m PortalMessages) -> &'m str {
        &messages.portal_created
    }
}

impl IgnitionError {
    /// Player-facing message key for this rejection
    pub fn message_key<'m>(&self, messages: &'m PortalMessages) -> &'m str {
        match self {
            IgnitionError::SystemDisabled => &messages.disabled,
            IgnitionError::NotFrameEligible(_) => &messages.invalid_block,
            IgnitionError::InvalidIgnitionItem(_) => &messages.invalid_item,
            IgnitionError::CoolingDown { .. } => &messages.cooldown,
            IgnitionError::NoFrameFound(_) | IgnitionError::Grid(_) => &messages.no_frame,
        }
    }
}

/// Whether `item` may light a portal under `config`
pub fn is_valid_ignition_item(config: &PortalConfig, item: &ItemStack) -> bool {
    if item.is_empty() {
        return false;
    }
    if item.id == config.effective_ignition_item() {
        return true;
    }
    config.support_legacy_items && LEGACY_IGNITION_ITEMS.contains(&item.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FIRE_CHARGE, FLINT_AND_STEEL};

    #[test]
    fn test_consume_count() {
        let mut stack = ItemStack::new("minecraft:blaze_powder", 3);
        stack.consume_one();
        assert_eq!(stack.count, 2);
        assert!(!stack.is_empty());
    }

    #[test]
    fn test_consume_durability() {
        let mut stack = ItemStack::damageable(FLINT_AND_STEEL, 0, 64);
        stack.consume_one();
        assert_eq!(stack.count, 1);
        assert_eq!(stack.durability.unwrap().damage, 1);
        assert_eq!(stack.durability.unwrap().remaining(), 63);
    }

    #[test]
    fn test_consume_breaks_item() {
        let mut stack = ItemStack::damageable(FLINT_AND_STEEL, 63, 64);
        stack.consume_one();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_cooldown_store() {
        let mut store = CooldownStore::new();
        let agent = AgentId(7);
        assert_eq!(store.remaining(agent, 100, 20), None);

        store.record(agent, 100);
        assert_eq!(store.remaining(agent, 105, 20), Some(15));
        assert_eq!(store.remaining(agent, 120, 20), None);
        // Zero disables the check entirely
        assert_eq!(store.remaining(agent, 100, 0), None);
        // Another agent is unaffected
        assert_eq!(store.remaining(AgentId(8), 105, 20), None);

        store.forget(agent);
        assert!(store.is_empty());
    }

    #[test]
    fn test_configured_item() {
        let config = PortalConfig {
            ignition_item: "minecraft:blaze_rod".into(),
            ..Default::default()
        };
        assert!(is_valid_ignition_item(
            &config,
            &ItemStack::new("minecraft:blaze_rod", 1)
        ));
        assert!(!is_valid_ignition_item(
            &config,
            &ItemStack::new(FLINT_AND_STEEL, 1)
        ));
        assert!(!is_valid_ignition_item(
            &config,
            &ItemStack::new("minecraft:blaze_rod", 0)
        ));
    }

    #[test]
    fn test_legacy_items() {
        let config = PortalConfig {
            ignition_item: "minecraft:blaze_rod".into(),
            support_legacy_items: true,
            ..Default::default()
        };
        assert!(is_valid_ignition_item(&config, &ItemStack::new(FIRE_CHARGE, 1)));
        assert!(is_valid_ignition_item(
            &config,
            &ItemStack::damageable(FLINT_AND_STEEL, 0, 64)
        ));
        assert!(!is_valid_ignition_item(
            &config,
            &ItemStack::new("minecraft:stick", 1)
        ));
    }

    #[test]
    fn test_empty_config_item_means_flint_and_steel() {
        let config = PortalConfig {
            ignition_item: String::new(),
            ..Default::default()
        };
        assert!(is_valid_ignition_item(
            &config,
            &ItemStack::damageable(FLINT_AND_STEEL, 0, 64)
        ));
        assert!(!is_valid_ignition_item(&config, &ItemStack::new(FIRE_CHARGE, 1)));
    }

    #[test]
    fn test_error_message_keys() {
        let messages = PortalMessages::default();
        assert_eq!(
            IgnitionError::SystemDisabled.message_key(&messages),
            "message.portal.disabled"
        );
        assert_eq!(
            IgnitionError::NoFrameFound(IVec3::ZERO).message_key(&messages),
            "message.portal.no_frame"
        );
        assert_eq!(
            IgnitionError::CoolingDown { remaining_ticks: 3 }.message_key(&messages),
            "message.portal.cooldown"
        );
    }
}
