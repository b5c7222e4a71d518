use serde::{Deserialize, Serialize};

use super::block::{BlockIndex, ThreadId};
use super::sentinel;

/// Per-block decoration owned by the views, index-parallel to the global
/// block enumeration of the loaded trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuiBlock {
    /// Row of this block in the tree view, once one has been created.
    #[serde(with = "sentinel::max_u32")]
    pub tree_item: Option<u32>,
    /// Index of the graphics item (lane) the block is drawn in.
    pub graphics_item: u32,
    /// Nesting level within that graphics item.
    pub graphics_item_level: u8,
    /// Position of the block within its level.
    pub graphics_item_index: u32,
    pub expanded: bool,
}

impl GuiBlock {
    /// Zeroed record with no tree item attached.
    pub const fn new() -> Self {
        Self {
            tree_item: None,
            graphics_item: 0,
            graphics_item_level: 0,
            graphics_item_index: 0,
            expanded: false,
        }
    }
}

impl Default for GuiBlock {
    fn default() -> Self {
        Self::new()
    }
}

/// Current selection in the views. `None` means nothing is selected.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(rename = "selected_thread", with = "sentinel::zero_u32")]
    pub thread: Option<ThreadId>,
    #[serde(rename = "selected_block", with = "sentinel::max_u32")]
    pub block: Option<BlockIndex>,
}

impl Selection {
    pub const fn none() -> Self {
        Self {
            thread: None,
            block: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.thread.is_none() && self.block.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_zeroed_but_unset() {
        let block = GuiBlock::new();
        assert_eq!(block.tree_item, None);
        assert_eq!(block.graphics_item, 0);
        assert_eq!(block.graphics_item_level, 0);
        assert_eq!(block.graphics_item_index, 0);
        assert!(!block.expanded);
        assert_eq!(GuiBlock::default(), block);
    }

    #[test]
    fn unset_tree_item_persists_as_max() {
        let json = serde_json::to_value(GuiBlock::new()).unwrap_or_default();
        assert_eq!(json["tree_item"], u32::MAX);

        let set = GuiBlock {
            tree_item: Some(0),
            ..GuiBlock::new()
        };
        let json = serde_json::to_string(&set).unwrap_or_default();
        let back: GuiBlock = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(back.tree_item, Some(0));
    }

    #[test]
    fn empty_selection_uses_legacy_encoding() {
        let json = serde_json::to_string(&Selection::none()).unwrap_or_default();
        assert_eq!(
            json,
            format!(r#"{{"selected_thread":0,"selected_block":{}}}"#, u32::MAX)
        );

        let selection: Selection =
            serde_json::from_str(r#"{"selected_thread":12,"selected_block":0}"#)
                .unwrap_or_default();
        assert_eq!(selection.thread, Some(12));
        assert_eq!(selection.block, Some(BlockIndex::from(0)));
        assert!(!selection.is_empty());
    }
}
