//! Wheel Animation System
//!
//! Motion primitives used by the wheel picker engine.
//!
//! # Features
//!
//! - **Easing**: Curves for snap and step-scroll tweens
//! - **Tweens**: Deterministic, analytically evaluated value animations
//! - **Flings**: A simulator contract plus a constant-friction integrator

pub mod easing;
pub mod fling;
pub mod tween;

pub use easing::Easing;
pub use fling::{DecayFling, FlingBounds, FlingSimulator};
pub use tween::Tween;
