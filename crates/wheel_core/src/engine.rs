//! Scroll engine
//!
//! Converts raw pixel displacement into whole-row window shifts. The engine
//! stores the sub-row remainder as `drift`, the distance of the first slot
//! from its resting offset, so "settled" is the exact comparison
//! `drift == 0.0` regardless of how the layout was computed.
//!
//! Positive displacement moves content down (towards smaller indices),
//! negative displacement moves it up.

use smallvec::SmallVec;

use crate::index_space::{Index, IndexSpace, ValidRange};
use crate::window::SelectionWindow;

/// Most rows a single `advance_by` may move; the rest of the delta is dropped
pub const MAX_ITEMS_PER_ADVANCE: u32 = 4096;

/// Committed selection moved from `previous` to `current`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Index,
    pub current: Index,
}

/// Result of one `advance_by`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    /// The delta ran into a boundary and was (partly) dropped
    pub absorbed: bool,
    pub change: Option<SelectionChange>,
}

/// Selection state plus the sub-row scroll offset
#[derive(Clone, Debug)]
pub struct ScrollEngine {
    space: IndexSpace,
    window: SelectionWindow,
    /// Last selection reported (or silently set)
    committed: Index,
    drift: f32,
    viewport_height: f32,
    item_height: f32,
    text_height: f32,
    gap: f32,
    rest_offset: f32,
    pending: SmallVec<[SelectionChange; 2]>,
}

impl ScrollEngine {
    /// Create an engine positioned at the space's initial index
    ///
    /// No displacement is accepted until [`ScrollEngine::set_layout`] has
    /// been given a usable viewport.
    pub fn new(space: IndexSpace, visible_count: usize) -> Self {
        let committed = space.initial_index();
        let window = SelectionWindow::new(visible_count, committed, &space);
        Self {
            space,
            window,
            committed,
            drift: 0.0,
            viewport_height: 0.0,
            item_height: 0.0,
            text_height: 0.0,
            gap: 0.0,
            rest_offset: 0.0,
            pending: SmallVec::new(),
        }
    }

    pub fn space(&self) -> &IndexSpace {
        &self.space
    }

    pub fn window(&self) -> &SelectionWindow {
        &self.window
    }

    /// Index in the middle slot
    pub fn selected(&self) -> Index {
        self.window.middle()
    }

    pub fn committed(&self) -> Index {
        self.committed
    }

    /// Distance of the first slot from its resting offset
    pub fn sub_pixel_offset(&self) -> f32 {
        self.drift
    }

    pub fn first_item_offset(&self) -> f32 {
        self.rest_offset + self.drift
    }

    pub fn rest_offset(&self) -> f32 {
        self.rest_offset
    }

    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    pub fn text_height(&self) -> f32 {
        self.text_height
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn is_at_rest(&self) -> bool {
        self.drift == 0.0
    }

    pub fn has_layout(&self) -> bool {
        self.item_height.is_finite() && self.item_height > 0.0
    }

    /// Derive row metrics from the viewport and text height
    ///
    /// Resets drift. A non-positive or non-finite viewport leaves the engine
    /// without a layout.
    pub fn set_layout(&mut self, viewport_height: f32, text_height: f32) {
        self.drift = 0.0;
        if !viewport_height.is_finite() || viewport_height <= 0.0 {
            tracing::warn!("unusable viewport height {viewport_height}, scrolling disabled");
            self.viewport_height = 0.0;
            self.item_height = 0.0;
            self.text_height = 0.0;
            self.gap = 0.0;
            self.rest_offset = 0.0;
            return;
        }

        let visible = self.window.visible_count() as f32;
        let item_height = viewport_height / visible;
        let text_height = if text_height.is_finite() {
            text_height.clamp(0.0, item_height)
        } else {
            tracing::warn!("text height {text_height} is not finite, using 0");
            0.0
        };

        self.viewport_height = viewport_height;
        self.item_height = item_height;
        self.text_height = text_height;
        self.gap = item_height - text_height;

        let visible_middle = self.window.visible_middle() as f32;
        let middle_offset = self.window.middle_offset() as f32;
        self.rest_offset = item_height * visible_middle + (item_height + text_height) / 2.0
            - item_height * middle_offset;

        tracing::debug!(
            "layout viewport={:.1} item={:.2} text={:.2} gap={:.2} rest={:.2}",
            viewport_height,
            item_height,
            text_height,
            self.gap,
            self.rest_offset
        );
    }

    /// Apply a pixel displacement
    pub fn advance_by(&mut self, delta: f32) -> Advance {
        if delta == 0.0 {
            return Advance::default();
        }
        if !delta.is_finite() {
            tracing::warn!("ignoring non-finite scroll delta {delta}");
            return Advance::default();
        }
        if !self.has_layout() {
            tracing::trace!("ignoring scroll delta {delta:.1} before layout");
            return Advance::default();
        }

        let middle = self.window.middle();
        if !self.space.wraps() {
            let pushing_min = delta > 0.0 && self.space.at_lower_bound(middle);
            let pushing_max = delta < 0.0 && self.space.at_upper_bound(middle);
            if pushing_min || pushing_max {
                return self.rubber_band(delta);
            }
        }

        let old_drift = self.drift;
        self.drift += delta;

        let limit = MAX_ITEMS_PER_ADVANCE as f32 * self.item_height + self.gap;
        if self.drift.abs() > limit {
            tracing::warn!(
                "scroll delta {delta:.1} exceeds {MAX_ITEMS_PER_ADVANCE} rows, dropping the excess"
            );
            self.drift = self.drift.clamp(-limit, limit);
        }

        while self.drift < -self.gap {
            self.drift += self.item_height;
            self.window.shift_forward(&self.space);
            if !self.space.wraps() && self.space.at_upper_bound(self.window.middle()) {
                self.drift = 0.0;
            }
        }

        while self.drift > self.gap {
            self.drift -= self.item_height;
            self.window.shift_backward(&self.space);
            if !self.space.wraps() && self.space.at_lower_bound(self.window.middle()) {
                self.drift = 0.0;
            }
        }

        tracing::trace!(
            "advance delta={:.1} drift: {:.1} -> {:.1}, middle: {} -> {}",
            delta,
            old_drift,
            self.drift,
            middle,
            self.window.middle()
        );

        Advance {
            absorbed: false,
            change: self.commit(),
        }
    }

    /// Boundary stretch: follow the finger up to half a gap, then pin
    fn rubber_band(&mut self, delta: f32) -> Advance {
        let half_gap = self.gap / 2.0;
        let stretched = self.drift + delta;
        let absorbed = if delta > 0.0 && stretched >= half_gap {
            self.drift = half_gap;
            true
        } else if delta < 0.0 && stretched <= -half_gap {
            self.drift = -half_gap;
            true
        } else {
            self.drift = stretched;
            false
        };

        tracing::trace!(
            "rubber band delta={:.1} drift={:.1} absorbed={}",
            delta,
            self.drift,
            absorbed
        );

        Advance {
            absorbed,
            change: None,
        }
    }

    /// Displacement that settles the wheel on the nearest row
    pub fn snap_displacement(&self) -> f32 {
        let mut displacement = -self.drift;
        if displacement.abs() > self.item_height / 2.0 {
            displacement += if displacement > 0.0 {
                -self.item_height
            } else {
                self.item_height
            };
        }
        displacement
    }

    /// Row the wheel lands on after applying `snap_displacement`
    pub fn snap_target(&self) -> Index {
        let middle = self.window.middle();
        if self.drift.abs() > self.item_height / 2.0 {
            if self.drift < 0.0 {
                self.space.step_forward(middle)
            } else {
                self.space.step_backward(middle)
            }
        } else {
            middle
        }
    }

    /// Move straight to `index` without reporting a change
    pub fn jump_to(&mut self, index: Index) -> Index {
        let target = self.space.resolve_position(index);
        self.window.build(target, &self.space);
        self.drift = 0.0;
        self.committed = self.window.middle();
        self.committed
    }

    /// Finish a programmatic move: zero drift, make sure `target` is in the
    /// middle slot and report the change if there is one
    pub(crate) fn land_on(&mut self, target: Index) -> Option<SelectionChange> {
        self.drift = 0.0;
        if self.window.middle() != target {
            self.window.build(target, &self.space);
        }
        self.commit()
    }

    pub fn set_range(&mut self, min: Index, max: Index) {
        self.space.set_range(min, max);
        self.rebuild_silently();
    }

    pub fn set_valid_range(&mut self, valid: ValidRange) {
        self.space.set_valid_range(valid);
        self.rebuild_silently();
    }

    pub fn set_wrap_enabled(&mut self, wrap_enabled: bool) {
        self.space.set_wrap_enabled(wrap_enabled);
        self.rebuild_silently();
    }

    /// Change the number of visible rows, keeping the selection
    pub fn set_visible_count(&mut self, visible_count: usize) {
        self.window.resize(visible_count, &self.space);
        if self.viewport_height > 0.0 {
            self.set_layout(self.viewport_height, self.text_height);
        } else {
            self.drift = 0.0;
        }
    }

    /// Back to the initial index, at rest
    pub fn reset(&mut self) {
        let start = self.space.initial_index();
        self.jump_to(start);
    }

    /// Drain the changes recorded since the last call
    pub fn take_changes(&mut self) -> SmallVec<[SelectionChange; 2]> {
        std::mem::take(&mut self.pending)
    }

    fn rebuild_silently(&mut self) {
        let current = self.space.resolve_position(self.committed);
        self.jump_to(current);
    }

    fn commit(&mut self) -> Option<SelectionChange> {
        let current = self.window.middle();
        if current == self.committed {
            return None;
        }
        let change = SelectionChange {
            previous: self.committed,
            current,
        };
        self.committed = current;
        self.pending.push(change);
        tracing::debug!("selection {} -> {}", change.previous, change.current);
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3 rows of 60px, 40px text: gap 20, rest offset -10
    fn engine(space: IndexSpace) -> ScrollEngine {
        let mut engine = ScrollEngine::new(space, 3);
        engine.set_layout(180.0, 40.0);
        engine
    }

    #[test]
    fn test_layout_metrics() {
        let engine = engine(IndexSpace::new(0, 23));
        assert_eq!(engine.item_height(), 60.0);
        assert_eq!(engine.gap(), 20.0);
        assert_eq!(engine.rest_offset(), -10.0);
        assert_eq!(engine.first_item_offset(), engine.rest_offset());
    }

    #[test]
    fn test_one_row_up_selects_next() {
        let mut engine = engine(IndexSpace::new(0, 23));
        let advance = engine.advance_by(-60.0);
        assert_eq!(engine.selected(), 1);
        assert!(engine.is_at_rest());
        assert_eq!(
            advance.change,
            Some(SelectionChange {
                previous: 0,
                current: 1
            })
        );
        assert_eq!(engine.take_changes().len(), 1);
        assert!(engine.take_changes().is_empty());
    }

    #[test]
    fn test_small_delta_only_drifts() {
        let mut engine = engine(IndexSpace::new(0, 23));
        engine.jump_to(5);
        let advance = engine.advance_by(-10.0);
        assert_eq!(engine.sub_pixel_offset(), -10.0);
        assert_eq!(engine.selected(), 5);
        assert_eq!(advance.change, None);
    }

    #[test]
    fn test_multi_row_delta_reports_once() {
        let mut engine = engine(IndexSpace::new(0, 23));
        let advance = engine.advance_by(-305.0);
        assert_eq!(engine.selected(), 5);
        assert_eq!(engine.sub_pixel_offset(), -5.0);
        assert_eq!(
            advance.change,
            Some(SelectionChange {
                previous: 0,
                current: 5
            })
        );
        assert_eq!(engine.take_changes().len(), 1);
    }

    #[test]
    fn test_rubber_band_at_min() {
        let mut engine = engine(IndexSpace::new(0, 23));
        let first = engine.advance_by(5.0);
        assert!(!first.absorbed);
        assert_eq!(engine.sub_pixel_offset(), 5.0);

        let second = engine.advance_by(20.0);
        assert!(second.absorbed);
        assert_eq!(engine.sub_pixel_offset(), 10.0);
        assert_eq!(engine.selected(), 0);
    }

    #[test]
    fn test_rubber_band_at_max() {
        let mut engine = engine(IndexSpace::new(0, 23));
        engine.jump_to(23);
        let advance = engine.advance_by(-30.0);
        assert!(advance.absorbed);
        assert_eq!(engine.sub_pixel_offset(), -10.0);
        assert_eq!(engine.selected(), 23);
    }

    #[test]
    fn test_long_delta_stops_at_max() {
        let mut engine = engine(IndexSpace::new(0, 23));
        engine.jump_to(20);
        engine.advance_by(-600.0);
        assert_eq!(engine.selected(), 23);
        assert!(engine.is_at_rest());
    }

    #[test]
    fn test_valid_bound_acts_as_boundary() {
        let mut engine = engine(
            IndexSpace::new(0, 23).with_valid_range(ValidRange::new(None, Some(12))),
        );
        engine.jump_to(10);
        engine.advance_by(-600.0);
        assert_eq!(engine.selected(), 12);
    }

    #[test]
    fn test_wrap_crosses_the_seam() {
        let mut engine = engine(IndexSpace::new(0, 23).with_wrap(true));
        engine.advance_by(60.0);
        assert_eq!(engine.selected(), 23);
        engine.advance_by(-120.0);
        assert_eq!(engine.selected(), 1);
    }

    #[test]
    fn test_round_trip_restores_state() {
        let mut engine = engine(IndexSpace::new(0, 23));
        engine.jump_to(12);
        let before = engine.window().clone();
        engine.advance_by(60.0);
        engine.advance_by(-60.0);
        assert_eq!(engine.window(), &before);
        assert!(engine.is_at_rest());
    }

    #[test]
    fn test_bad_input_is_ignored() {
        let mut engine = engine(IndexSpace::new(0, 23));
        engine.advance_by(f32::NAN);
        engine.advance_by(f32::NEG_INFINITY);
        assert!(engine.is_at_rest());

        let mut unlaid = ScrollEngine::new(IndexSpace::new(0, 23), 3);
        unlaid.advance_by(-120.0);
        assert_eq!(unlaid.selected(), 0);
        assert!(unlaid.is_at_rest());
    }

    #[test]
    fn test_advance_is_capped() {
        let mut engine = engine(IndexSpace::new(0, 999_999).with_wrap(true));
        engine.advance_by(-1.0e9);
        assert_eq!(engine.selected(), MAX_ITEMS_PER_ADVANCE as Index);
    }

    #[test]
    fn test_snap_displacement_picks_nearest_row() {
        let mut engine = engine(IndexSpace::new(0, 23));
        engine.jump_to(5);
        engine.advance_by(-10.0);
        assert_eq!(engine.snap_displacement(), 10.0);
        assert_eq!(engine.snap_target(), 5);

        engine.advance_by(-8.0);
        engine.advance_by(-17.0);
        // -35 is past half a row: finish the move instead
        assert_eq!(engine.sub_pixel_offset(), -35.0);
        assert_eq!(engine.snap_displacement(), -25.0);
        assert_eq!(engine.snap_target(), 6);
    }

    #[test]
    fn test_jump_is_silent_and_validated() {
        let mut engine = engine(IndexSpace::new(0, 23));
        assert_eq!(engine.jump_to(99), 23);
        assert_eq!(engine.committed(), 23);
        assert!(engine.take_changes().is_empty());
    }

    #[test]
    fn test_land_on_rebuilds_and_reports() {
        let mut engine = engine(IndexSpace::new(0, 23));
        let change = engine.land_on(7);
        assert_eq!(
            change,
            Some(SelectionChange {
                previous: 0,
                current: 7
            })
        );
        assert_eq!(engine.selected(), 7);
        assert_eq!(engine.land_on(7), None);
    }

    #[test]
    fn test_range_changes_keep_selection_in_bounds() {
        let mut engine = engine(IndexSpace::new(0, 23));
        engine.jump_to(20);
        engine.set_valid_range(ValidRange::new(Some(2), Some(15)));
        assert_eq!(engine.selected(), 15);
        assert!(!engine.window().slot(4).is_some_and(|slot| slot.valid));

        engine.set_range(0, 9);
        assert_eq!(engine.selected(), 9);
        assert!(engine.take_changes().is_empty());
    }

    #[test]
    fn test_visible_count_change_relayouts() {
        let mut engine = engine(IndexSpace::new(0, 23));
        engine.jump_to(4);
        engine.set_visible_count(5);
        assert_eq!(engine.item_height(), 36.0);
        assert_eq!(engine.selected(), 4);
        assert_eq!(engine.window().item_count(), 7);
    }

    #[test]
    fn test_reset_returns_to_initial_index() {
        let mut engine = engine(IndexSpace::new(3, 23));
        engine.jump_to(11);
        engine.advance_by(-7.0);
        engine.reset();
        assert_eq!(engine.selected(), 3);
        assert!(engine.is_at_rest());
    }
}
