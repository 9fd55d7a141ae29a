//! Curated feed ordering: pins, swap selection, removal.
//!
//! After every operation:
//! - at most [`PIN_CAPACITY`] entries are pinned;
//! - each surviving entry appears exactly once in `entries`;
//! - pinned entries form a contiguous prefix, ascending by slot.
//!
//! `pin_order` records when an entry was pinned and never changes while it
//! stays pinned, so eviction is always first-in first-out. `slot` is the
//! position key inside the pinned prefix and is what swaps exchange.

use serde::Serialize;

use crate::error::FeedError;
use crate::session::ImageId;

/// Maximum concurrent pins; pinning past this evicts the oldest pin.
pub const PIN_CAPACITY: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub image_id: ImageId,
    pub caption: String,
    pub pinned: bool,
    pub pin_order: Option<u64>,
    #[serde(skip)]
    slot: Option<u64>,
}

impl FeedEntry {
    pub fn new(image_id: ImageId, caption: String) -> Self {
        Self {
            image_id,
            caption,
            pinned: false,
            pin_order: None,
            slot: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected(ImageId),
    Deselected(ImageId),
    Swapped(ImageId, ImageId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    Pinned {
        id: ImageId,
        evicted: Option<ImageId>,
    },
    Unpinned(ImageId),
}

/// Ordered feed plus pin and selection bookkeeping.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedState {
    entries: Vec<FeedEntry>,
    #[serde(skip)]
    next_pin_order: u64,
    #[serde(skip)]
    selection: Option<ImageId>,
}

impl FeedState {
    pub fn new(entries: Vec<FeedEntry>) -> Self {
        Self {
            entries,
            next_pin_order: 0,
            selection: None,
        }
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: ImageId) -> Option<&FeedEntry> {
        self.entries.iter().find(|e| e.image_id == id)
    }

    pub fn selection(&self) -> Option<ImageId> {
        self.selection
    }

    /// Pinned ids in feed order.
    pub fn pinned(&self) -> Vec<ImageId> {
        self.entries
            .iter()
            .filter(|e| e.pinned)
            .map(|e| e.image_id)
            .collect()
    }

    fn position(&self, id: ImageId) -> Result<usize, FeedError> {
        self.entries
            .iter()
            .position(|e| e.image_id == id)
            .ok_or(FeedError::UnknownEntry(id))
    }

    /// Toggle selection. A second distinct selection swaps the two entries and
    /// clears the buffer.
    pub fn select(&mut self, id: ImageId) -> Result<SelectOutcome, FeedError> {
        let pos = self.position(id)?;

        match self.selection {
            Some(current) if current == id => {
                self.selection = None;
                Ok(SelectOutcome::Deselected(id))
            }
            Some(current) => {
                self.selection = None;
                let other = self.position(current)?;
                self.swap_positions(other, pos);
                tracing::debug!(a = %current, b = %id, "swapped feed entries");
                Ok(SelectOutcome::Swapped(current, id))
            }
            None => {
                self.selection = Some(id);
                Ok(SelectOutcome::Selected(id))
            }
        }
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        // Two pins trade slots and keep their pin order; otherwise the pinned
        // prefix is restored and the unpinned entry lands at its head.
        if self.entries[a].pinned && self.entries[b].pinned {
            let slot_a = self.entries[a].slot;
            self.entries[a].slot = self.entries[b].slot;
            self.entries[b].slot = slot_a;
        }
        self.reorder();
    }

    /// Toggle a pin. Pinning with a full set evicts the oldest pin first.
    pub fn pin(&mut self, id: ImageId) -> Result<PinOutcome, FeedError> {
        let pos = self.position(id)?;

        if self.entries[pos].pinned {
            unpin(&mut self.entries[pos]);
            self.reorder();
            return Ok(PinOutcome::Unpinned(id));
        }

        let mut evicted = None;
        if self.pinned_count() >= PIN_CAPACITY {
            if let Some(oldest) = self
                .entries
                .iter_mut()
                .filter(|e| e.pinned)
                .min_by_key(|e| e.pin_order)
            {
                unpin(oldest);
                evicted = Some(oldest.image_id);
                tracing::debug!(evicted = %oldest.image_id, "pin capacity reached");
            }
        }

        self.next_pin_order += 1;
        let entry = &mut self.entries[pos];
        entry.pinned = true;
        entry.pin_order = Some(self.next_pin_order);
        entry.slot = Some(self.next_pin_order);
        self.reorder();

        Ok(PinOutcome::Pinned { id, evicted })
    }

    fn pinned_count(&self) -> usize {
        self.entries.iter().filter(|e| e.pinned).count()
    }

    /// Pinned entries first by slot; unpinned keep their relative order.
    fn reorder(&mut self) {
        let (mut pinned, unpinned): (Vec<FeedEntry>, Vec<FeedEntry>) =
            self.entries.drain(..).partition(|e| e.pinned);
        pinned.sort_by_key(|e| e.slot);
        pinned.extend(unpinned);
        self.entries = pinned;
    }

    /// Drop an entry. A removed pin frees its slot without promoting anything.
    pub fn remove(&mut self, id: ImageId) -> Result<FeedEntry, FeedError> {
        let pos = self.position(id)?;
        if self.selection == Some(id) {
            self.selection = None;
        }
        Ok(self.entries.remove(pos))
    }

    /// Replace caption text; order and pins are untouched.
    pub fn regenerate_caption(&mut self, id: ImageId, caption: String) -> Result<(), FeedError> {
        let pos = self.position(id)?;
        self.entries[pos].caption = caption;
        Ok(())
    }
}

fn unpin(entry: &mut FeedEntry) {
    entry.pinned = false;
    entry.pin_order = None;
    entry.slot = None;
}
