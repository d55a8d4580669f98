//! Fling simulation
//!
//! The wheel engine does not own a decay curve. It drives any
//! [`FlingSimulator`] and integrates the position deltas between ticks.
//! [`DecayFling`] is the stock constant-friction integrator.

/// Displacement bounds for a fling, in pixels relative to the start position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingBounds {
    pub min: f32,
    pub max: f32,
}

impl FlingBounds {
    /// No bounds (cyclic wheels)
    pub const UNBOUNDED: FlingBounds = FlingBounds {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    /// Create bounds, swapping the ends if they arrive inverted
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min == f32::NEG_INFINITY && self.max == f32::INFINITY
    }
}

impl Default for FlingBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Contract for a physics fling integrator
///
/// Positions are pixel displacements from where the fling started (the
/// simulator starts at 0). `step` takes the frame delta in seconds.
pub trait FlingSimulator {
    /// Begin a fling with an initial velocity (pixels per second)
    fn start(&mut self, velocity: f32, bounds: FlingBounds, min_snap_increment: f32);

    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);

    /// Position at the current tick
    fn position(&self) -> f32;

    fn is_finished(&self) -> bool;

    /// Stop immediately, keeping the current position
    fn abort(&mut self);
}

/// Constant-friction fling integrator
#[derive(Clone, Debug)]
pub struct DecayFling {
    position: f32,
    velocity: f32,
    bounds: FlingBounds,
    /// Distance the fling may travel past a finite bound before stopping
    overfling: f32,
    /// Deceleration rate in pixels/second²
    deceleration: f32,
    /// Velocity below which the fling stops (pixels/second)
    velocity_threshold: f32,
    finished: bool,
}

impl Default for DecayFling {
    fn default() -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            bounds: FlingBounds::UNBOUNDED,
            overfling: 0.0,
            deceleration: 1500.0,
            velocity_threshold: 10.0,
            finished: true,
        }
    }
}

impl DecayFling {
    pub fn new(deceleration: f32) -> Self {
        let deceleration = if deceleration.is_finite() && deceleration > 0.0 {
            deceleration
        } else {
            tracing::warn!("ignoring fling deceleration {deceleration}, using default");
            Self::default().deceleration
        };
        Self {
            deceleration,
            ..Default::default()
        }
    }
}

impl FlingSimulator for DecayFling {
    fn start(&mut self, velocity: f32, bounds: FlingBounds, min_snap_increment: f32) {
        self.position = 0.0;
        self.velocity = if velocity.is_finite() { velocity } else { 0.0 };
        self.bounds = bounds;
        self.overfling = if min_snap_increment.is_finite() {
            min_snap_increment.max(0.0)
        } else {
            0.0
        };
        self.finished = self.velocity.abs() < self.velocity_threshold;

        tracing::debug!(
            "fling start v={:.1} bounds=({:.0}, {:.0}) overfling={:.1}",
            self.velocity,
            self.bounds.min,
            self.bounds.max,
            self.overfling
        );
    }

    fn step(&mut self, dt: f32) {
        if self.finished || !dt.is_finite() || dt <= 0.0 {
            return;
        }

        let new_position = self.position + self.velocity * dt;

        // Apply deceleration (friction)
        let decel = self.deceleration * dt;
        if self.velocity > 0.0 {
            self.velocity = (self.velocity - decel).max(0.0);
        } else if self.velocity < 0.0 {
            self.velocity = (self.velocity + decel).min(0.0);
        }

        let low = self.bounds.min - self.overfling;
        let high = self.bounds.max + self.overfling;
        if new_position < low || new_position > high {
            self.position = new_position.clamp(low, high);
            self.velocity = 0.0;
            self.finished = true;
            return;
        }

        self.position = new_position;

        if self.velocity.abs() < self.velocity_threshold {
            self.velocity = 0.0;
            self.finished = true;
        }
    }

    fn position(&self) -> f32 {
        self.position
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn abort(&mut self) {
        self.velocity = 0.0;
        self.finished = true;
    }
}
