//! Value adapters
//!
//! An adapter maps wheel indices to display strings and back. Without one the
//! wheel shows the indices themselves.

use crate::index_space::Index;

/// Maps indices to display text and back
pub trait ValueAdapter {
    /// Number of distinct values, or `None` when the adapter is unbounded
    fn size(&self) -> Option<u32> {
        None
    }

    /// Display text for `index`
    fn value(&self, index: Index) -> String;

    /// Index of a display string; unparsable input maps to 0
    fn position(&self, value: &str) -> Index;

    fn min_valid_index(&self) -> Option<Index> {
        None
    }

    fn max_valid_index(&self) -> Option<Index> {
        None
    }

    /// Longest text the adapter produces, used as a width hint
    ///
    /// Empty when unknown.
    fn max_display_text(&self) -> String;
}

/// Repeating sequence `0, step, 2*step, ...` of `count` values, zero-padded
///
/// Any index maps onto the sequence (`index mod count`), so the adapter also
/// renders the guard rows of a wrapping wheel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SteppedAdapter {
    count: u32,
    step: u32,
    sized: bool,
    min_valid: Option<Index>,
    max_valid: Option<Index>,
}

impl SteppedAdapter {
    pub fn new(count: u32, step: u32) -> Self {
        if count == 0 || step == 0 {
            tracing::warn!("stepped adapter needs a positive count and step (got {count} x {step})");
        }
        Self {
            count: count.max(1),
            step: step.max(1),
            sized: true,
            min_valid: None,
            max_valid: None,
        }
    }

    /// `00` to `23`
    pub fn hours() -> Self {
        Self::new(24, 1)
    }

    /// `00` to `55` in steps of five
    pub fn five_minutes() -> Self {
        Self::new(12, 5)
    }

    /// Stop reporting a size, so attaching the adapter keeps the wheel's range
    pub fn unbounded(mut self) -> Self {
        self.sized = false;
        self
    }

    pub fn with_valid_range(mut self, min: Option<Index>, max: Option<Index>) -> Self {
        self.min_valid = min;
        self.max_valid = max;
        self
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn step(&self) -> u32 {
        self.step
    }
}

impl ValueAdapter for SteppedAdapter {
    fn size(&self) -> Option<u32> {
        self.sized.then_some(self.count)
    }

    fn value(&self, index: Index) -> String {
        let slot = (index as i64).rem_euclid(self.count as i64);
        format!("{:02}", slot * self.step as i64)
    }

    fn position(&self, value: &str) -> Index {
        parse_index(value).map_or(0, |v| v / self.step as Index)
    }

    fn min_valid_index(&self) -> Option<Index> {
        self.min_valid
    }

    fn max_valid_index(&self) -> Option<Index> {
        self.max_valid
    }

    fn max_display_text(&self) -> String {
        (self.count as u64 * self.step as u64).to_string()
    }
}

/// Plain integer parse used when no adapter is attached
pub(crate) fn parse_index(value: &str) -> Option<Index> {
    value.parse::<Index>().ok()
}
