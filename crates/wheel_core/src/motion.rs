//! Motion driver
//!
//! Turns gestures and programmatic requests into displacement for the
//! [`ScrollEngine`]. Drags forward pointer deltas directly, releases hand off
//! to a [`FlingSimulator`], and every programmatic move or settle runs a
//! deterministic [`Tween`] that lands exactly on its target row.
//!
//! The driver is frame driven: call [`MotionDriver::tick`] once per frame
//! while it returns `true`.

use std::fmt;

use wheel_animation::{DecayFling, FlingBounds, FlingSimulator, Tween};

use crate::config::MotionConfig;
use crate::engine::ScrollEngine;
use crate::index_space::{saturate, Index};

/// What the wheel is doing
#[derive(Clone, Debug)]
pub enum MotionState {
    Idle,
    /// Pointer is down
    Dragging {
        /// Last sample that was applied (or the touch-down point)
        last_y: f32,
        /// Most recent pointer sample
        pointer_y: f32,
        /// Movement has exceeded the touch slop
        past_slop: bool,
    },
    Flinging {
        velocity: f32,
        last_position: f32,
    },
    Tweening {
        target: Index,
        tween: Tween,
        last_value: f32,
    },
}

impl MotionState {
    pub fn name(&self) -> &'static str {
        match self {
            MotionState::Idle => "idle",
            MotionState::Dragging { .. } => "dragging",
            MotionState::Flinging { .. } => "flinging",
            MotionState::Tweening { .. } => "tweening",
        }
    }
}

pub struct MotionDriver {
    engine: ScrollEngine,
    config: MotionConfig,
    fling: Box<dyn FlingSimulator>,
    state: MotionState,
}

impl fmt::Debug for MotionDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionDriver")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl MotionDriver {
    /// Drive `engine` with the stock [`DecayFling`]
    pub fn new(engine: ScrollEngine, config: MotionConfig) -> Self {
        let fling = Box::new(DecayFling::new(config.fling_deceleration));
        Self {
            engine,
            config,
            fling,
            state: MotionState::Idle,
        }
    }

    /// Replace the fling integrator
    pub fn with_fling_simulator(mut self, fling: Box<dyn FlingSimulator>) -> Self {
        self.fling = fling;
        self
    }

    /// Swap the fling integrator, stopping any motion first
    pub fn set_fling_simulator(&mut self, fling: Box<dyn FlingSimulator>) {
        self.stop();
        self.fling = fling;
    }

    pub fn engine(&self) -> &ScrollEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ScrollEngine {
        &mut self.engine
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, MotionState::Idle)
    }

    /// Flinging or tweening, so frames are needed
    pub fn is_animating(&self) -> bool {
        matches!(
            self.state,
            MotionState::Flinging { .. } | MotionState::Tweening { .. }
        )
    }

    /// Touch down: abort whatever is running and start tracking the pointer
    pub fn start_drag(&mut self, y: f32) {
        if !y.is_finite() {
            tracing::warn!("ignoring touch down at non-finite y {y}");
            return;
        }
        self.stop();
        self.state = MotionState::Dragging {
            last_y: y,
            pointer_y: y,
            past_slop: false,
        };
        tracing::debug!("drag start y={y:.1}");
    }

    /// Pointer moved to `y`
    pub fn drag_to(&mut self, y: f32) {
        if !y.is_finite() {
            tracing::warn!("ignoring drag to non-finite y {y}");
            return;
        }
        let MotionState::Dragging {
            last_y,
            pointer_y,
            past_slop,
        } = &mut self.state
        else {
            tracing::trace!("drag sample without touch down, ignoring");
            return;
        };

        *pointer_y = y;
        let mut delta = y - *last_y;
        if !*past_slop && delta.abs() > self.config.touch_slop {
            delta -= self.config.touch_slop.copysign(delta);
            *past_slop = true;
            tracing::debug!("drag passed touch slop");
        }

        if *past_slop {
            *last_y = y;
            self.engine.advance_by(delta);
        }
    }

    /// Pointer moved by `dy` since the previous sample
    pub fn drag_by(&mut self, dy: f32) {
        if let MotionState::Dragging { pointer_y, .. } = self.state {
            self.drag_to(pointer_y + dy);
        }
    }

    /// Pointer released with `velocity` (px/s, positive downwards)
    ///
    /// A release that never passed the touch slop is a tap at the last
    /// pointer position.
    pub fn end_drag(&mut self, velocity: f32) {
        let MotionState::Dragging {
            pointer_y,
            past_slop,
            ..
        } = self.state
        else {
            tracing::trace!("release without touch down, ignoring");
            return;
        };
        self.state = MotionState::Idle;

        if !past_slop {
            self.tap_at(pointer_y);
            return;
        }

        let max = self.config.max_fling_velocity;
        let velocity = if velocity.is_finite() {
            velocity.clamp(-max, max)
        } else {
            0.0
        };

        if velocity.abs() > self.config.min_fling_velocity {
            self.start_fling(velocity);
        } else {
            self.snap_to_nearest();
        }
    }

    /// Tap at `y` within the viewport: step towards the tapped row
    pub fn tap_at(&mut self, y: f32) {
        if !y.is_finite() || !self.engine.has_layout() {
            return;
        }
        let row = (y / self.engine.item_height()).floor() as i64;
        let steps = row - self.engine.window().visible_middle() as i64;
        tracing::debug!("tap y={y:.1} row={row} steps={steps}");
        self.scroll_by_steps(steps);
    }

    /// Abort any motion and settle on the nearest row
    pub fn cancel(&mut self) {
        self.stop();
        self.snap_to_nearest();
    }

    /// Abort any motion where it is, without settling
    pub fn stop(&mut self) {
        if let MotionState::Flinging { .. } = self.state {
            self.fling.abort();
        }
        if !self.is_idle() {
            tracing::debug!("{} stopped", self.state.name());
        }
        self.state = MotionState::Idle;
    }

    /// Move to `index` instantly; no change is reported
    pub fn jump_to(&mut self, index: Index) -> Index {
        self.stop();
        self.engine.jump_to(index)
    }

    /// Animate to `index` (validated) over the scroll duration
    pub fn smooth_scroll_to(&mut self, index: Index) {
        let space = self.engine.space();
        let target = space.resolve_position(index);
        let steps = target as i64 - self.engine.selected() as i64;
        self.tween_steps(steps, target);
    }

    /// Animate `steps` rows forward (negative: backward)
    ///
    /// On a wrapping wheel this crosses the seam instead of turning back.
    pub fn scroll_by_steps(&mut self, steps: i64) {
        let space = self.engine.space();
        let current = self.engine.selected();
        let target = space.resolve_position(saturate(current as i64 + steps));
        let steps = if space.wraps() {
            steps
        } else {
            target as i64 - current as i64
        };
        self.tween_steps(steps, target);
    }

    /// Settle on the nearest row, or go idle if already there
    pub fn snap_to_nearest(&mut self) {
        let displacement = self.engine.snap_displacement();
        let target = self.engine.snap_target();
        if displacement == 0.0 || !self.engine.has_layout() {
            self.state = MotionState::Idle;
            self.engine.land_on(target);
            return;
        }
        self.start_tween(target, displacement, self.config.snap_duration_ms);
    }

    /// Advance running motion by `dt` seconds
    ///
    /// Returns whether another frame is needed.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !dt.is_finite() || dt <= 0.0 {
            return self.is_animating();
        }

        match &mut self.state {
            MotionState::Idle | MotionState::Dragging { .. } => return false,

            MotionState::Flinging { last_position, .. } => {
                self.fling.step(dt);
                let position = self.fling.position();
                let delta = position - *last_position;
                *last_position = position;

                let advance = self.engine.advance_by(delta);
                if advance.absorbed {
                    tracing::debug!("fling absorbed by boundary");
                    self.fling.abort();
                }
                if self.fling.is_finished() {
                    tracing::debug!("fling finished at {:.1}", position);
                    self.state = MotionState::Idle;
                    self.snap_to_nearest();
                }
            }

            MotionState::Tweening {
                target,
                tween,
                last_value,
            } => {
                tween.tick(dt * 1000.0);
                let value = tween.value();
                let delta = value - *last_value;
                *last_value = value;
                let finished = tween.is_finished();
                let target = *target;

                // Boundary absorption does not end a tween; it lands on its
                // validated target regardless.
                self.engine.advance_by(delta);
                if finished {
                    tracing::debug!("tween landed on {target}");
                    self.state = MotionState::Idle;
                    self.engine.land_on(target);
                }
            }
        }

        self.is_animating()
    }

    fn start_fling(&mut self, velocity: f32) {
        let h = self.engine.item_height();
        let space = self.engine.space();
        let bounds = if space.wraps() {
            FlingBounds::UNBOUNDED
        } else {
            let current = self.engine.selected() as i64;
            let to_max = (space.effective_max() as i64 - current) as f32 * h;
            let to_min = (current - space.effective_min() as i64) as f32 * h;
            FlingBounds::new(-to_max, to_min)
        };

        self.fling
            .start(velocity, bounds, self.config.fling_snap_fraction * h);
        if self.fling.is_finished() {
            self.snap_to_nearest();
        } else {
            tracing::debug!("fling v={velocity:.1}");
            self.state = MotionState::Flinging {
                velocity,
                last_position: 0.0,
            };
        }
    }

    fn tween_steps(&mut self, steps: i64, target: Index) {
        self.stop();
        if !self.engine.has_layout() {
            self.engine.land_on(target);
            return;
        }

        let displacement = -(steps as f32) * self.engine.item_height() - self.engine.sub_pixel_offset();
        if displacement == 0.0 {
            self.engine.land_on(target);
            return;
        }
        self.start_tween(target, displacement, self.config.scroll_duration_ms);
    }

    fn start_tween(&mut self, target: Index, displacement: f32, duration_ms: u32) {
        let mut tween = Tween::new(0.0, displacement, duration_ms, self.config.easing);
        tween.start();
        tracing::debug!("tween to {target} by {displacement:.1}px over {duration_ms}ms");
        self.state = MotionState::Tweening {
            target,
            tween,
            last_value: 0.0,
        };
    }
}
