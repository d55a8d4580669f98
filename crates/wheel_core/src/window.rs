//! Sliding window of wheel slots
//!
//! The window holds the visible rows plus one guard row above and below, so
//! partially scrolled rows at either edge always have an index to draw. It is
//! rebuilt from scratch on jumps and shifted one slot at a time while
//! scrolling.

use std::collections::VecDeque;

use crate::index_space::{saturate, Index, IndexSpace};

/// Guard rows kept outside the visible area (one above, one below)
pub const GUARD_ITEMS: usize = 2;

/// Visible rows when nothing else is configured
pub const DEFAULT_VISIBLE_COUNT: usize = 3;

/// One row of the window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub index: Index,
    /// Selectable under the current valid range
    pub valid: bool,
}

impl Slot {
    fn new(index: Index, space: &IndexSpace) -> Self {
        Self {
            index,
            valid: space.is_valid(index),
        }
    }
}

/// Fixed-size ring of slots centred on the selection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionWindow {
    slots: VecDeque<Slot>,
    item_count: usize,
}

impl SelectionWindow {
    /// Build a window of `visible_count` rows (plus guards) around `center`
    pub fn new(visible_count: usize, center: Index, space: &IndexSpace) -> Self {
        let item_count = sanitize_visible_count(visible_count) + GUARD_ITEMS;
        let mut window = Self {
            slots: VecDeque::with_capacity(item_count),
            item_count,
        };
        window.build(center, space);
        window
    }

    /// Total slots including guards
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn visible_count(&self) -> usize {
        self.item_count - GUARD_ITEMS
    }

    /// Slot position of the selection
    pub fn middle_offset(&self) -> usize {
        (self.item_count - 1) / 2
    }

    /// Row of the selection counted within the visible rows
    pub fn visible_middle(&self) -> usize {
        (self.visible_count() - 1) / 2
    }

    /// Index in the middle slot
    pub fn middle(&self) -> Index {
        self.slots
            .get(self.middle_offset())
            .map(|slot| slot.index)
            .unwrap_or_default()
    }

    pub fn slot(&self, position: usize) -> Option<Slot> {
        self.slots.get(position).copied()
    }

    pub fn slots(&self) -> impl ExactSizeIterator<Item = &Slot> + '_ {
        self.slots.iter()
    }

    pub fn indices(&self) -> Vec<Index> {
        self.slots.iter().map(|slot| slot.index).collect()
    }

    /// Refill every slot around `center`
    pub fn build(&mut self, center: Index, space: &IndexSpace) {
        let middle = self.middle_offset() as i64;
        self.slots.clear();
        for k in 0..self.item_count as i64 {
            let raw = center as i64 + (k - middle);
            let index = if space.wraps() {
                space.wrap_wide(raw)
            } else {
                saturate(raw)
            };
            self.slots.push_back(Slot::new(index, space));
        }
    }

    /// Scroll one row towards larger indices
    pub fn shift_forward(&mut self, space: &IndexSpace) {
        let last = self.slots.back().map(|slot| slot.index).unwrap_or_default();
        let next = space.step_forward(last);
        self.slots.pop_front();
        self.slots.push_back(Slot::new(next, space));
    }

    /// Scroll one row towards smaller indices
    pub fn shift_backward(&mut self, space: &IndexSpace) {
        let first = self.slots.front().map(|slot| slot.index).unwrap_or_default();
        let prev = space.step_backward(first);
        self.slots.pop_back();
        self.slots.push_front(Slot::new(prev, space));
    }

    pub fn refresh_validity(&mut self, space: &IndexSpace) {
        for slot in self.slots.iter_mut() {
            slot.valid = space.is_valid(slot.index);
        }
    }

    /// Change the number of visible rows, keeping the current centre
    pub fn resize(&mut self, visible_count: usize, space: &IndexSpace) {
        let center = self.middle();
        self.item_count = sanitize_visible_count(visible_count) + GUARD_ITEMS;
        self.build(center, space);
    }
}

fn sanitize_visible_count(visible_count: usize) -> usize {
    if visible_count == 0 {
        tracing::warn!("visible count of 0 requested, showing a single row");
        1
    } else {
        visible_count
    }
}
