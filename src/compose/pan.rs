use std::collections::BTreeMap;

use crate::foundation::core::{FormatId, Vec2};

/// Per-format pan offsets relative to the centered cover-fit position.
///
/// Entries exist only for registered formats; writes to unknown ids are ignored.
#[derive(Clone, Debug, Default)]
pub struct PanStore {
    offsets: BTreeMap<FormatId, Vec2>,
}

impl PanStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` with a zero offset. Re-registering resets it.
    pub fn register(&mut self, id: FormatId) {
        self.offsets.insert(id, Vec2::ZERO);
    }

    /// Current offset, `None` for an unregistered format.
    pub fn get(&self, id: &FormatId) -> Option<Vec2> {
        self.offsets.get(id).copied()
    }

    /// Overwrite the offset. Returns `false` for an unregistered format.
    pub fn set(&mut self, id: &FormatId, offset: Vec2) -> bool {
        match self.offsets.get_mut(id) {
            Some(slot) => {
                *slot = offset;
                true
            }
            None => false,
        }
    }

    /// Add `delta` to the offset and return the new value.
    pub fn add(&mut self, id: &FormatId, delta: Vec2) -> Option<Vec2> {
        let slot = self.offsets.get_mut(id)?;
        *slot += delta;
        Some(*slot)
    }

    /// Zero every offset.
    pub fn reset_all(&mut self) {
        for v in self.offsets.values_mut() {
            *v = Vec2::ZERO;
        }
    }

    /// Number of registered formats.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// `true` when no format is registered.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
