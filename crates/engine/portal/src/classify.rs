//! Frame material classification

use crate::config::DEFAULT_FRAME_MATERIAL;
use crate::{BlockGrid, BlockId, PortalConfig};
use glam::IVec3;
use std::collections::HashSet;

/// Decides which block identifiers may form a portal frame
///
/// The validator only asks this question, so hosts can plug in any
/// identity scheme. Closures work too.
pub trait FrameMaterials {
    /// Whether a block with this identifier is frame-eligible
    fn is_frame_material(&self, id: &str) -> bool;

    /// Whether the block at `pos` is frame-eligible
    ///
    /// Grid failures count as "not a frame block".
    fn is_frame_block<G: BlockGrid + ?Sized>(&self, grid: &G, pos: IVec3) -> bool {
        match grid.block(pos) {
            Ok(state) => state.id().is_some_and(|id| self.is_frame_material(id)),
            Err(e) => {
                tracing::debug!("Treating {} as non-frame: {}", pos, e);
                false
            }
        }
    }
}

impl<F> FrameMaterials for F
where
    F: Fn(&str) -> bool,
{
    fn is_frame_material(&self, id: &str) -> bool {
        self(id)
    }
}

/// Allow-list classifier built from configuration
#[derive(Debug, Clone, Default)]
pub struct FrameClassifier {
    allowed: HashSet<BlockId>,
    legacy: bool,
}

impl FrameClassifier {
    /// Create a classifier from an allow-list
    ///
    /// With `legacy` set, the default frame material is eligible even when
    /// the list leaves it out.
    pub fn new(allowed: impl IntoIterator<Item = impl Into<BlockId>>, legacy: bool) -> Self {
        FrameClassifier {
            allowed: allowed.into_iter().map(Into::into).collect(),
            legacy,
        }
    }

    pub fn from_config(config: &PortalConfig) -> Self {
        Self::new(config.frame_blocks.iter().cloned(), config.support_legacy_items)
    }

    /// Identifiers on the allow-list
    pub fn allowed(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }

    pub fn is_legacy(&self) -> bool {
        self.legacy
    }
}

impl FrameMaterials for FrameClassifier {
    fn is_frame_material(&self, id: &str) -> bool {
        if self.allowed.contains(id) {
            return true;
        }
        id == DEFAULT_FRAME_MATERIAL && self.legacy
    }
}
