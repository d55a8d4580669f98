//! Wheel Core
//!
//! Selection engine for wheel pickers: a vertically scrolling list of
//! discrete values that settles on exactly one of them.
//!
//! # Layers
//!
//! - **IndexSpace**: bounded or wrapping index arithmetic
//! - **SelectionWindow**: the visible rows plus guard rows
//! - **ScrollEngine**: pixel displacement to row shifts, rubber-banding
//! - **MotionDriver**: drags, flings, taps and deterministic tweens
//! - **WheelPicker**: adapters, value resolution and change listeners
//!
//! # Example
//!
//! ```
//! use wheel_core::{IndexSpace, MotionConfig, SteppedAdapter, WheelPicker};
//!
//! let mut picker = WheelPicker::new(IndexSpace::default(), 3, MotionConfig::default());
//! picker.set_layout(180.0, 40.0);
//! picker.set_adapter(Box::new(SteppedAdapter::hours()));
//!
//! picker.smooth_scroll_to(9);
//! while picker.tick(1.0 / 60.0) {}
//! assert_eq!(picker.current_value(), "09");
//! ```

pub mod adapter;
pub mod config;
pub mod engine;
pub mod error;
pub mod index_space;
pub mod motion;
pub mod picker;
pub mod window;

pub use adapter::{SteppedAdapter, ValueAdapter};
pub use config::{AdapterKind, LayoutConfig, MotionConfig, PickerConfig};
pub use engine::{Advance, ScrollEngine, SelectionChange, MAX_ITEMS_PER_ADVANCE};
pub use error::{ConfigError, Result};
pub use index_space::{Index, IndexSpace, ValidRange};
pub use motion::{MotionDriver, MotionState};
pub use picker::{Frame, FrameRow, ListenerId, TouchPhase, ValueChange, WheelPicker};
pub use window::{SelectionWindow, Slot, DEFAULT_VISIBLE_COUNT, GUARD_ITEMS};

pub use wheel_animation::{DecayFling, Easing, FlingBounds, FlingSimulator};
