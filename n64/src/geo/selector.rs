//! Per-entity selector values driving render-graph visibility

use hashbrown::HashMap;

/// How a selector value picks visible children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectorRule {
    /// Positive `v` shows child `v - 1`, negative `v` is a child bitmask
    #[default]
    Child,
    /// The value is always a child bitmask
    Mask,
}

/// A node's reference into [`SelectorState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector {
    pub state_index: u32,
    pub rule: SelectorRule,
}

impl Selector {
    pub fn child(state_index: u32) -> Self {
        Self {
            state_index,
            rule: SelectorRule::Child,
        }
    }

    pub fn mask(state_index: u32) -> Self {
        Self {
            state_index,
            rule: SelectorRule::Mask,
        }
    }
}

/// Selector values keyed by state index
///
/// Indices that were never set are treated as "everything visible".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorState {
    values: HashMap<u32, i32>,
}

impl SelectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, index: u32, value: i32) {
        self.values.insert(index, value);
    }

    pub fn get(&self, index: u32) -> Option<i32> {
        self.values.get(&index).copied()
    }

    pub fn clear(&mut self, index: u32) {
        self.values.remove(&index);
    }

    /// False only when the selector's value is zero
    pub fn subtree_visible(&self, selector: Selector) -> bool {
        self.get(selector.state_index) != Some(0)
    }

    /// Whether child `child` of a selector node is drawn
    pub fn child_visible(&self, selector: Selector, child: usize) -> bool {
        let Some(value) = self.get(selector.state_index) else {
            return true;
        };
        let in_mask = |mask: u32| child < 32 && mask & (1 << child) != 0;
        match (selector.rule, value) {
            (_, 0) => false,
            (SelectorRule::Child, v) if v > 0 => child == (v - 1) as usize,
            // Two's complement bits of a negative value are the mask
            (SelectorRule::Child, v) => in_mask(v as u32),
            (SelectorRule::Mask, v) => in_mask(v as u32),
        }
    }
}
