//! Picker configuration (TOML)

use serde::{Deserialize, Serialize};
use wheel_animation::Easing;

use crate::adapter::{SteppedAdapter, ValueAdapter};
use crate::error::{ConfigError, Result};
use crate::index_space::{Index, IndexSpace, ValidRange};
use crate::window::DEFAULT_VISIBLE_COUNT;

/// Longest accepted tween duration
pub const MAX_DURATION_MS: u32 = 10_000;

/// Top-level picker configuration (picker.toml)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PickerConfig {
    /// Rows shown at once
    #[serde(default = "default_visible_count")]
    pub visible_count: usize,
    #[serde(default = "default_min")]
    pub min: Index,
    #[serde(default = "default_max")]
    pub max: Index,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_valid: Option<Index>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_valid: Option<Index>,
    /// Scroll past either end onto the other
    #[serde(default)]
    pub wrap: bool,
    #[serde(default)]
    pub adapter: AdapterKind,
    /// Replace `min`/`max` with the adapter's size when it reports one
    #[serde(default = "default_true")]
    pub range_from_adapter: bool,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub motion: MotionConfig,
}

fn default_visible_count() -> usize {
    DEFAULT_VISIBLE_COUNT
}

fn default_min() -> Index {
    Index::MIN
}

fn default_max() -> Index {
    Index::MAX
}

fn default_true() -> bool {
    true
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            visible_count: default_visible_count(),
            min: default_min(),
            max: default_max(),
            min_valid: None,
            max_valid: None,
            wrap: false,
            adapter: AdapterKind::default(),
            range_from_adapter: true,
            layout: LayoutConfig::default(),
            motion: MotionConfig::default(),
        }
    }
}

/// Stock adapters selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// Show raw indices
    #[default]
    None,
    Hours,
    FiveMinutes,
}

impl AdapterKind {
    /// Build the adapter, carrying `valid` as its selectable bounds
    pub fn build(self, valid: ValidRange) -> Option<Box<dyn ValueAdapter>> {
        let adapter = match self {
            AdapterKind::None => return None,
            AdapterKind::Hours => SteppedAdapter::hours(),
            AdapterKind::FiveMinutes => SteppedAdapter::five_minutes(),
        };
        Some(Box::new(adapter.with_valid_range(valid.min, valid.max)))
    }
}

/// Viewport metrics used for layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayoutConfig {
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    /// Height of one rendered label
    #[serde(default = "default_text_height")]
    pub text_height: f32,
}

fn default_viewport_height() -> f32 {
    180.0
}

fn default_text_height() -> f32 {
    40.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_height: default_viewport_height(),
            text_height: default_text_height(),
        }
    }
}

/// Gesture thresholds and animation timing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MotionConfig {
    /// Pointer travel (px) before a touch becomes a drag
    #[serde(default = "default_touch_slop")]
    pub touch_slop: f32,
    /// Release velocity (px/s) needed to fling instead of snapping
    #[serde(default = "default_min_fling_velocity")]
    pub min_fling_velocity: f32,
    #[serde(default = "default_max_fling_velocity")]
    pub max_fling_velocity: f32,
    /// Fling overshoot allowance past a bound, as a fraction of a row
    #[serde(default = "default_fling_snap_fraction")]
    pub fling_snap_fraction: f32,
    /// Fling friction (px/s²)
    #[serde(default = "default_fling_deceleration")]
    pub fling_deceleration: f32,
    #[serde(default = "default_duration_ms")]
    pub snap_duration_ms: u32,
    #[serde(default = "default_duration_ms")]
    pub scroll_duration_ms: u32,
    #[serde(default = "default_easing")]
    pub easing: Easing,
}

fn default_touch_slop() -> f32 {
    8.0
}

fn default_min_fling_velocity() -> f32 {
    50.0
}

fn default_max_fling_velocity() -> f32 {
    2000.0
}

fn default_fling_snap_fraction() -> f32 {
    0.7
}

fn default_fling_deceleration() -> f32 {
    1500.0
}

fn default_duration_ms() -> u32 {
    300
}

fn default_easing() -> Easing {
    Easing::WHEEL
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            touch_slop: default_touch_slop(),
            min_fling_velocity: default_min_fling_velocity(),
            max_fling_velocity: default_max_fling_velocity(),
            fling_snap_fraction: default_fling_snap_fraction(),
            fling_deceleration: default_fling_deceleration(),
            snap_duration_ms: default_duration_ms(),
            scroll_duration_ms: default_duration_ms(),
            easing: default_easing(),
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("touch_slop", self.touch_slop),
            ("min_fling_velocity", self.min_fling_velocity),
            ("max_fling_velocity", self.max_fling_velocity),
            ("fling_snap_fraction", self.fling_snap_fraction),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidMotion { field, value });
            }
        }

        if !self.fling_deceleration.is_finite() || self.fling_deceleration <= 0.0 {
            return Err(ConfigError::InvalidMotion {
                field: "fling_deceleration",
                value: self.fling_deceleration,
            });
        }

        if self.max_fling_velocity < self.min_fling_velocity {
            return Err(ConfigError::InvalidMotion {
                field: "max_fling_velocity",
                value: self.max_fling_velocity,
            });
        }

        for (field, value) in [
            ("snap_duration_ms", self.snap_duration_ms),
            ("scroll_duration_ms", self.scroll_duration_ms),
        ] {
            if value == 0 || value > MAX_DURATION_MS {
                return Err(ConfigError::InvalidDuration {
                    field,
                    value,
                    max: MAX_DURATION_MS,
                });
            }
        }

        Ok(())
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.viewport_height.is_finite() || self.viewport_height <= 0.0 {
            return Err(ConfigError::InvalidLayout {
                field: "viewport_height",
                value: self.viewport_height,
            });
        }
        if !self.text_height.is_finite() || self.text_height < 0.0 {
            return Err(ConfigError::InvalidLayout {
                field: "text_height",
                value: self.text_height,
            });
        }
        Ok(())
    }
}

impl PickerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PickerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings the engine cannot sanitise on its own
    ///
    /// An inverted index range is not an error here; the engine collapses it.
    pub fn validate(&self) -> Result<()> {
        if self.visible_count == 0 {
            return Err(ConfigError::InvalidVisibleCount(self.visible_count));
        }
        self.layout.validate()?;
        self.motion.validate()
    }

    /// Index space described by the range fields (adapter not applied)
    pub fn index_space(&self) -> IndexSpace {
        IndexSpace::new(self.min, self.max)
            .with_valid_range(ValidRange::new(self.min_valid, self.max_valid))
            .with_wrap(self.wrap)
    }
}
