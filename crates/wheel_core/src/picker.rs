//! Wheel picker facade
//!
//! [`WheelPicker`] is what a render layer talks to. It owns the motion
//! driver, resolves indices to display strings through an optional
//! [`ValueAdapter`], and fans committed selection changes out to listeners.

use serde::Serialize;
use slotmap::{new_key_type, SlotMap};
use wheel_animation::FlingSimulator;

use crate::adapter::{parse_index, ValueAdapter};
use crate::config::{MotionConfig, PickerConfig};
use crate::engine::ScrollEngine;
use crate::error::Result;
use crate::index_space::{Index, IndexSpace, ValidRange};
use crate::motion::{MotionDriver, MotionState};
use crate::window::Slot;

new_key_type! {
    /// Handle returned by [`WheelPicker::on_selection_changed`] and
    /// [`WheelPicker::on_touch`]
    pub struct ListenerId;
}

/// Pointer contact reported to touch listeners
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Down,
    Up,
}

enum Listener {
    Selection(Box<dyn FnMut(&ValueChange)>),
    Touch(Box<dyn FnMut(TouchPhase)>),
}

/// A committed selection change, resolved to display strings
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValueChange {
    pub previous: Index,
    pub current: Index,
    pub old_value: String,
    pub new_value: String,
}

/// One rendered row
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameRow {
    pub index: Index,
    pub label: String,
    pub valid: bool,
    pub selected: bool,
    /// Text baseline offset of the row
    pub y: f32,
}

/// Owned per-frame snapshot for rendering
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub rows: Vec<FrameRow>,
    pub item_height: f32,
    pub sub_pixel_offset: f32,
    pub first_item_offset: f32,
}

pub struct WheelPicker {
    driver: MotionDriver,
    adapter: Option<Box<dyn ValueAdapter>>,
    range_from_adapter: bool,
    listeners: SlotMap<ListenerId, Listener>,
}

impl WheelPicker {
    pub fn new(space: IndexSpace, visible_count: usize, motion: MotionConfig) -> Self {
        let engine = ScrollEngine::new(space, visible_count);
        Self {
            driver: MotionDriver::new(engine, motion),
            adapter: None,
            range_from_adapter: true,
            listeners: SlotMap::with_key(),
        }
    }

    /// Build a laid-out picker from a validated configuration
    pub fn from_config(config: &PickerConfig) -> Result<Self> {
        config.validate()?;
        let mut picker = Self::new(
            config.index_space(),
            config.visible_count,
            config.motion.clone(),
        );
        picker.set_layout(config.layout.viewport_height, config.layout.text_height);
        let valid = ValidRange::new(config.min_valid, config.max_valid);
        if let Some(adapter) = config.adapter.build(valid) {
            picker.set_adapter_with(adapter, config.range_from_adapter);
        }
        Ok(picker)
    }

    pub fn driver(&self) -> &MotionDriver {
        &self.driver
    }

    /// Replace the fling integrator
    pub fn set_fling_simulator(&mut self, fling: Box<dyn FlingSimulator>) {
        self.driver.set_fling_simulator(fling);
    }

    pub fn engine(&self) -> &ScrollEngine {
        self.driver.engine()
    }

    pub fn space(&self) -> &IndexSpace {
        self.driver.engine().space()
    }

    pub fn state(&self) -> &MotionState {
        self.driver.state()
    }

    pub fn set_layout(&mut self, viewport_height: f32, text_height: f32) {
        self.driver.stop();
        self.driver
            .engine_mut()
            .set_layout(viewport_height, text_height);
    }

    // ---------------------------------------------------------------------
    // Gestures
    // ---------------------------------------------------------------------

    pub fn start_drag(&mut self, y: f32) {
        self.notify_touch(TouchPhase::Down);
        self.driver.start_drag(y);
        self.dispatch();
    }

    pub fn drag_to(&mut self, y: f32) {
        self.driver.drag_to(y);
        self.dispatch();
    }

    pub fn drag_by(&mut self, dy: f32) {
        self.driver.drag_by(dy);
        self.dispatch();
    }

    pub fn end_drag(&mut self, velocity: f32) {
        if matches!(self.state(), MotionState::Dragging { .. }) {
            self.notify_touch(TouchPhase::Up);
        }
        self.driver.end_drag(velocity);
        self.dispatch();
    }

    pub fn tap_at(&mut self, y: f32) {
        self.driver.tap_at(y);
        self.dispatch();
    }

    pub fn cancel(&mut self) {
        self.driver.cancel();
        self.dispatch();
    }

    /// Advance animations by `dt` seconds; returns whether to keep ticking
    pub fn tick(&mut self, dt: f32) -> bool {
        let animating = self.driver.tick(dt);
        self.dispatch();
        animating
    }

    // ---------------------------------------------------------------------
    // Programmatic moves
    // ---------------------------------------------------------------------

    /// Move to `index` instantly; listeners are not notified
    pub fn jump_to(&mut self, index: Index) -> Index {
        self.driver.jump_to(index)
    }

    pub fn smooth_scroll_to(&mut self, index: Index) {
        self.driver.smooth_scroll_to(index);
        self.dispatch();
    }

    pub fn scroll_by_steps(&mut self, steps: i64) {
        self.driver.scroll_by_steps(steps);
        self.dispatch();
    }

    pub fn scroll_to_value(&mut self, value: &str) -> Index {
        let index = self.position_of(value);
        self.jump_to(index)
    }

    pub fn smooth_scroll_to_value(&mut self, value: &str) {
        let index = self.position_of(value);
        self.smooth_scroll_to(index);
    }

    pub fn set_range(&mut self, min: Index, max: Index) {
        self.driver.stop();
        self.driver.engine_mut().set_range(min, max);
    }

    pub fn set_valid_range(&mut self, valid: ValidRange) {
        self.driver.stop();
        self.driver.engine_mut().set_valid_range(valid);
    }

    pub fn set_wrap_enabled(&mut self, wrap_enabled: bool) {
        self.driver.stop();
        self.driver.engine_mut().set_wrap_enabled(wrap_enabled);
    }

    pub fn set_visible_count(&mut self, visible_count: usize) {
        self.driver.stop();
        self.driver.engine_mut().set_visible_count(visible_count);
    }

    pub fn reset(&mut self) {
        self.driver.stop();
        self.driver.engine_mut().reset();
    }

    // ---------------------------------------------------------------------
    // Adapter
    // ---------------------------------------------------------------------

    /// Attach an adapter, taking its size as the index range if it has one
    pub fn set_adapter(&mut self, adapter: Box<dyn ValueAdapter>) {
        self.set_adapter_with(adapter, true);
    }

    /// Attach an adapter; `range_from_size` controls whether a reported size
    /// replaces the index range
    pub fn set_adapter_with(&mut self, adapter: Box<dyn ValueAdapter>, range_from_size: bool) {
        self.range_from_adapter = range_from_size;
        self.driver.stop();

        let engine = self.driver.engine_mut();
        if range_from_size {
            match adapter.size() {
                Some(0) => tracing::warn!("adapter reports no values, keeping the index range"),
                Some(size) => {
                    let max = Index::try_from(size - 1).unwrap_or(Index::MAX);
                    engine.set_range(0, max);
                }
                None => {}
            }
        }
        engine.set_valid_range(ValidRange::new(
            adapter.min_valid_index(),
            adapter.max_valid_index(),
        ));
        engine.reset();

        self.adapter = Some(adapter);
    }

    /// Detach the adapter and show raw indices again
    pub fn clear_adapter(&mut self) -> Option<Box<dyn ValueAdapter>> {
        self.driver.stop();
        self.driver.engine_mut().reset();
        self.adapter.take()
    }

    /// Re-read the adapter's size and valid bounds after its data changed
    pub fn refresh_adapter(&mut self) {
        if let Some(adapter) = self.adapter.take() {
            self.set_adapter_with(adapter, self.range_from_adapter);
        }
    }

    pub fn adapter(&self) -> Option<&dyn ValueAdapter> {
        self.adapter.as_deref()
    }

    // ---------------------------------------------------------------------
    // Value resolution
    // ---------------------------------------------------------------------

    /// Index of a display string
    ///
    /// Without an adapter the string is parsed as an integer; anything
    /// unparsable resolves to 0.
    pub fn position_of(&self, value: &str) -> Index {
        let space = self.space();
        match &self.adapter {
            Some(adapter) => space.resolve_position(adapter.position(value)),
            None => parse_index(value).map_or(0, |index| space.resolve_position(index)),
        }
    }

    /// Display string of an index
    pub fn value_of(&self, index: Index) -> String {
        if let Some(adapter) = &self.adapter {
            return adapter.value(index);
        }
        let space = self.space();
        if space.wraps() {
            space.wrap(index).to_string()
        } else if space.contains(index) {
            index.to_string()
        } else {
            String::new()
        }
    }

    pub fn current_index(&self) -> Index {
        self.engine().committed()
    }

    pub fn current_value(&self) -> String {
        self.value_of(self.current_index())
    }

    pub fn min_value(&self) -> String {
        self.value_of(self.space().min())
    }

    pub fn max_value(&self) -> String {
        self.value_of(self.space().max())
    }

    /// Widest label the wheel can show, for sizing the control
    pub fn widest_text(&self) -> String {
        if let Some(adapter) = &self.adapter {
            let text = adapter.max_display_text();
            return if text.is_empty() {
                "00".to_string()
            } else {
                text
            };
        }
        let min = self.space().min().to_string();
        let max = self.space().max().to_string();
        if min.chars().count() > max.chars().count() {
            min
        } else {
            max
        }
    }

    // ---------------------------------------------------------------------
    // Listeners
    // ---------------------------------------------------------------------

    pub fn on_selection_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ValueChange) + 'static,
    {
        self.listeners
            .insert(Listener::Selection(Box::new(listener)))
    }

    /// Called with [`TouchPhase::Down`] on touch down and [`TouchPhase::Up`]
    /// on release, before the gesture itself is handled
    pub fn on_touch<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(TouchPhase) + 'static,
    {
        self.listeners.insert(Listener::Touch(Box::new(listener)))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    fn notify_touch(&mut self, phase: TouchPhase) {
        tracing::trace!("touch {phase:?}");
        for (_, listener) in self.listeners.iter_mut() {
            if let Listener::Touch(listener) = listener {
                listener(phase);
            }
        }
    }

    fn dispatch(&mut self) {
        let changes = self.driver.engine_mut().take_changes();
        for change in changes {
            let event = ValueChange {
                previous: change.previous,
                current: change.current,
                old_value: self.value_of(change.previous),
                new_value: self.value_of(change.current),
            };
            tracing::debug!(
                "value changed {:?} -> {:?}",
                event.old_value,
                event.new_value
            );
            for (_, listener) in self.listeners.iter_mut() {
                if let Listener::Selection(listener) = listener {
                    listener(&event);
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------------

    pub fn slots(&self) -> impl ExactSizeIterator<Item = &Slot> + '_ {
        self.engine().window().slots()
    }

    pub fn sub_pixel_offset(&self) -> f32 {
        self.engine().sub_pixel_offset()
    }

    pub fn first_item_offset(&self) -> f32 {
        self.engine().first_item_offset()
    }

    /// Snapshot of everything needed to draw the current frame
    pub fn frame(&self) -> Frame {
        let engine = self.engine();
        let window = engine.window();
        let middle = window.middle_offset();
        let first = engine.first_item_offset();
        let item_height = engine.item_height();

        let rows = window
            .slots()
            .enumerate()
            .map(|(k, slot)| FrameRow {
                index: slot.index,
                label: self.value_of(slot.index),
                valid: slot.valid,
                selected: k == middle,
                y: first + k as f32 * item_height,
            })
            .collect();

        Frame {
            rows,
            item_height,
            sub_pixel_offset: engine.sub_pixel_offset(),
            first_item_offset: first,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SteppedAdapter;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn picker(space: IndexSpace) -> WheelPicker {
        let mut picker = WheelPicker::new(space, 3, MotionConfig::default());
        picker.set_layout(180.0, 40.0);
        picker
    }

    fn settle(picker: &mut WheelPicker) {
        let mut frames = 0;
        while picker.tick(0.016) {
            frames += 1;
            assert!(frames < 10_000);
        }
    }

    fn record(picker: &mut WheelPicker) -> Rc<RefCell<Vec<ValueChange>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        picker.on_selection_changed(move |change| sink.borrow_mut().push(change.clone()));
        seen
    }

    #[test]
    fn test_value_of_without_adapter() {
        let hours = picker(IndexSpace::new(0, 23));
        assert_eq!(hours.value_of(7), "7");
        assert_eq!(hours.value_of(-1), "");
        assert_eq!(hours.value_of(24), "");

        let wrapping = picker(IndexSpace::new(0, 23).with_wrap(true));
        assert_eq!(wrapping.value_of(-1), "23");
        assert_eq!(wrapping.value_of(24), "0");
    }

    #[test]
    fn test_position_of_without_adapter() {
        let hours = picker(IndexSpace::new(0, 23));
        assert_eq!(hours.position_of("12"), 12);
        assert_eq!(hours.position_of("99"), 23);
        assert_eq!(hours.position_of(""), 0);
        assert_eq!(hours.position_of("abc"), 0);

        let shifted = picker(IndexSpace::new(5, 10));
        // Fallback is 0 even when 0 is out of range
        assert_eq!(shifted.position_of("x"), 0);
        assert_eq!(shifted.position_of("1"), 5);
    }

    #[test]
    fn test_adapter_sets_range_and_values() {
        let mut minutes = picker(IndexSpace::default());
        minutes.set_adapter(Box::new(SteppedAdapter::five_minutes()));
        assert_eq!(minutes.space().min(), 0);
        assert_eq!(minutes.space().max(), 11);
        assert_eq!(minutes.value_of(1), "05");
        assert_eq!(minutes.position_of("35"), 7);
        assert_eq!(minutes.position_of("95"), 11);
        assert_eq!(minutes.min_value(), "00");
        assert_eq!(minutes.max_value(), "55");
        assert_eq!(minutes.widest_text(), "60");

        minutes.set_wrap_enabled(true);
        assert_eq!(minutes.value_of(-1), "55");
    }

    #[test]
    fn test_touch_listeners_see_down_then_up() {
        let mut picker = picker(IndexSpace::new(0, 23));
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = picker.on_touch(move |phase| sink.borrow_mut().push(phase));
        let changes = record(&mut picker);

        picker.start_drag(100.0);
        picker.drag_to(30.0);
        picker.end_drag(0.0);
        // Release without a touch down is not a touch
        picker.end_drag(0.0);
        // Programmatic moves do not touch
        picker.tap_at(10.0);
        settle(&mut picker);

        assert_eq!(*events.borrow(), vec![TouchPhase::Down, TouchPhase::Up]);
        assert!(!changes.borrow().is_empty());

        assert!(picker.remove_listener(id));
        picker.start_drag(0.0);
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_adapter_range_opt_out_and_valid_bounds() {
        let mut picker = picker(IndexSpace::new(-50, 50));
        picker.set_adapter_with(
            Box::new(SteppedAdapter::hours().with_valid_range(Some(8), Some(18))),
            false,
        );
        assert_eq!(picker.space().min(), -50);
        assert_eq!(picker.space().effective_min(), 8);
        assert_eq!(picker.current_index(), 8);
        assert_eq!(picker.current_value(), "08");
    }

    #[test]
    fn test_clear_and_refresh_adapter() {
        let mut picker = picker(IndexSpace::new(0, 100));
        picker.set_adapter(Box::new(SteppedAdapter::hours()));
        picker.refresh_adapter();
        assert_eq!(picker.space().max(), 23);
        assert!(picker.clear_adapter().is_some());
        assert!(picker.adapter().is_none());
        assert_eq!(picker.value_of(5), "5");
        assert_eq!(picker.widest_text(), "23");
    }

    #[test]
    fn test_widest_text_without_adapter() {
        assert_eq!(picker(IndexSpace::new(-100, 5)).widest_text(), "-100");
        assert_eq!(picker(IndexSpace::new(0, 59)).widest_text(), "59");
    }

    #[test]
    fn test_listeners_receive_resolved_values() {
        let mut picker = picker(IndexSpace::new(0, 23));
        picker.set_adapter(Box::new(SteppedAdapter::hours()));
        let seen = record(&mut picker);

        picker.smooth_scroll_to(3);
        settle(&mut picker);

        let seen = seen.borrow();
        assert!(!seen.is_empty());
        assert_eq!(seen.first().map(|c| c.old_value.as_str()), Some("00"));
        assert_eq!(seen.last().map(|c| c.new_value.as_str()), Some("03"));
        for pair in seen.windows(2) {
            assert_eq!(pair[0].current, pair[1].previous);
            assert_ne!(pair[1].previous, pair[1].current);
        }
    }

    #[test]
    fn test_jump_is_silent() {
        let mut picker = picker(IndexSpace::new(0, 23));
        let seen = record(&mut picker);
        assert_eq!(picker.scroll_to_value("17"), 17);
        assert_eq!(picker.current_value(), "17");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_removed_listener_is_not_called() {
        let mut picker = picker(IndexSpace::new(0, 23));
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        let id = picker.on_selection_changed(move |_| *sink.borrow_mut() += 1);
        assert!(picker.remove_listener(id));
        assert!(!picker.remove_listener(id));

        picker.smooth_scroll_to_value("4");
        settle(&mut picker);
        assert_eq!(picker.current_index(), 4);
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn test_drag_reports_each_committed_change_once() {
        let mut picker = picker(IndexSpace::new(0, 23));
        picker.jump_to(10);
        let seen = record(&mut picker);

        picker.start_drag(170.0);
        picker.drag_to(160.0);
        // Three rows in one sample
        picker.drag_to(160.0 - 180.0);
        picker.end_drag(0.0);
        settle(&mut picker);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].previous, 10);
        assert_eq!(seen[0].current, 13);
        assert_eq!(picker.current_index(), 13);
    }

    #[test]
    fn test_frame_snapshot() {
        let mut picker = picker(IndexSpace::new(0, 23));
        picker.jump_to(0);
        let frame = picker.frame();
        assert_eq!(frame.rows.len(), 5);
        let labels: Vec<&str> = frame.rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, vec!["", "", "0", "1", "2"]);
        assert!(frame.rows[2].selected);
        assert_eq!(frame.rows[0].y, -10.0);
        assert_eq!(frame.rows[1].y, 50.0);
        assert_eq!(frame.sub_pixel_offset, 0.0);
        assert_eq!(picker.slots().len(), 5);
    }

    #[test]
    fn test_from_config() {
        let config = PickerConfig::from_toml_str(
            r#"
            adapter = "five_minutes"
            wrap = true
            "#,
        )
        .unwrap();
        let picker = WheelPicker::from_config(&config).unwrap();
        assert_eq!(picker.space().max(), 11);
        assert!(picker.space().wraps());
        assert_eq!(picker.engine().item_height(), 60.0);
        assert_eq!(picker.value_of(-1), "55");
    }

    #[test]
    fn test_from_config_keeps_valid_range_with_adapter() {
        let config =
            PickerConfig::from_toml_str("adapter = \"hours\"\nmin_valid = 8\nmax_valid = 18\n")
                .unwrap();
        let picker = WheelPicker::from_config(&config).unwrap();
        assert_eq!(picker.space().max(), 23);
        assert_eq!(picker.current_value(), "08");
        assert!(!picker.space().is_valid(19));
    }
}
