//! Index space arithmetic
//!
//! An [`IndexSpace`] describes which integer positions a wheel can show:
//! an inclusive `[min, max]` range, an optional tighter selectable range, and
//! whether scrolling past either end wraps around. Everything here is pure
//! arithmetic on copies; nothing holds mutable wheel state.

/// A wheel position
pub type Index = i32;

/// Selectable sub-range of an [`IndexSpace`]
///
/// Each side is independently optional. A missing side means "no tighter
/// constraint than the index range itself".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidRange {
    pub min: Option<Index>,
    pub max: Option<Index>,
}

impl ValidRange {
    /// No constraint on either side
    pub const UNCONSTRAINED: ValidRange = ValidRange {
        min: None,
        max: None,
    };

    pub fn new(min: Option<Index>, max: Option<Index>) -> Self {
        Self { min, max }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Legal index range, selectable sub-range and wrap mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpace {
    min: Index,
    max: Index,
    valid: ValidRange,
    wrap_enabled: bool,
}

impl Default for IndexSpace {
    /// The whole `i32` domain, unconstrained, not wrapping
    fn default() -> Self {
        Self::new(Index::MIN, Index::MAX)
    }
}

impl IndexSpace {
    /// Create a non-wrapping space over `[min, max]`
    ///
    /// `min > max` collapses to the single-item range `[min, min]`.
    pub fn new(min: Index, max: Index) -> Self {
        let mut space = Self {
            min,
            max,
            valid: ValidRange::UNCONSTRAINED,
            wrap_enabled: false,
        };
        space.sanitize();
        space
    }

    pub fn with_valid_range(mut self, valid: ValidRange) -> Self {
        self.set_valid_range(valid);
        self
    }

    pub fn with_wrap(mut self, wrap_enabled: bool) -> Self {
        self.wrap_enabled = wrap_enabled;
        self
    }

    pub fn set_range(&mut self, min: Index, max: Index) {
        self.min = min;
        self.max = max;
        self.sanitize();
    }

    pub fn set_valid_range(&mut self, valid: ValidRange) {
        self.valid = valid;
        self.sanitize();
    }

    pub fn set_wrap_enabled(&mut self, wrap_enabled: bool) {
        self.wrap_enabled = wrap_enabled;
    }

    pub fn min(&self) -> Index {
        self.min
    }

    pub fn max(&self) -> Index {
        self.max
    }

    pub fn valid_range(&self) -> ValidRange {
        self.valid
    }

    /// Whether wrapping was requested
    pub fn wrap_enabled(&self) -> bool {
        self.wrap_enabled
    }

    /// Whether the space actually wraps
    ///
    /// A single-item range never wraps: there is no seam to cross.
    pub fn wraps(&self) -> bool {
        self.wrap_enabled && self.len() > 1
    }

    /// Number of indices in `[min, max]`
    pub fn len(&self) -> i64 {
        self.max as i64 - self.min as i64 + 1
    }

    /// Lower selectable bound (valid bound if present)
    pub fn effective_min(&self) -> Index {
        self.valid.min.unwrap_or(self.min)
    }

    /// Upper selectable bound (valid bound if present)
    pub fn effective_max(&self) -> Index {
        self.valid.max.unwrap_or(self.max)
    }

    /// True if `index` lies inside `[min, max]`
    pub fn contains(&self, index: Index) -> bool {
        (self.min..=self.max).contains(&index)
    }

    /// Map an out-of-range index back into `[min, max]`
    ///
    /// The ±1 terms are the wheel's established seam behaviour and are kept
    /// exactly: an overshoot that is a whole multiple of the range length
    /// lands one step outside the range. Window building only ever overshoots
    /// by less than the range length when the range is larger than the
    /// window, where the result is exact.
    pub fn wrap(&self, index: Index) -> Index {
        self.wrap_wide(index as i64)
    }

    /// `wrap` over a 64-bit index, for callers offsetting near `i32` limits
    pub(crate) fn wrap_wide(&self, i: i64) -> Index {
        let (min, max) = (self.min as i64, self.max as i64);
        let len = max - min + 1;
        let wrapped = if i > max {
            min + (i - max) % len - 1
        } else if i < min {
            max - (min - i) % len + 1
        } else {
            i
        };
        saturate(wrapped)
    }

    /// Bound `index` to the selectable range without wrapping
    pub fn clamp(&self, index: Index) -> Index {
        index.clamp(self.effective_min(), self.effective_max())
    }

    /// Resolve a requested position: wrap when wrapping, clamp otherwise
    pub fn validate_position(&self, index: Index) -> Index {
        if self.wraps() {
            self.wrap(index)
        } else {
            self.clamp(index)
        }
    }

    /// The index a wheel actually settles on for a requested position
    ///
    /// `validate_position` can land one step outside the range when a
    /// wrapping overshoot is a whole multiple of the range length; the
    /// middle slot wraps that once more. Everything that commits a
    /// selection goes through here so the committed index and the middle
    /// slot agree.
    pub fn resolve_position(&self, index: Index) -> Index {
        let validated = self.validate_position(index);
        if self.wraps() {
            self.wrap(validated)
        } else {
            validated
        }
    }

    /// False only when a valid bound exists and `index` lies outside it
    pub fn is_valid(&self, index: Index) -> bool {
        let below = self.valid.min.is_some_and(|min| index < min);
        let above = self.valid.max.is_some_and(|max| index > max);
        !below && !above
    }

    /// At or beyond the lower selectable bound
    pub fn at_lower_bound(&self, index: Index) -> bool {
        index <= self.effective_min()
    }

    /// At or beyond the upper selectable bound
    pub fn at_upper_bound(&self, index: Index) -> bool {
        index >= self.effective_max()
    }

    /// The index after `index`, crossing the seam when wrapping
    pub fn step_forward(&self, index: Index) -> Index {
        let next = index as i64 + 1;
        if self.wraps() && next > self.max as i64 {
            self.min
        } else {
            saturate(next)
        }
    }

    /// The index before `index`, crossing the seam when wrapping
    pub fn step_backward(&self, index: Index) -> Index {
        let prev = index as i64 - 1;
        if self.wraps() && prev < self.min as i64 {
            self.max
        } else {
            saturate(prev)
        }
    }

    /// Where a freshly initialised wheel starts
    ///
    /// Zero when the selectable range reaches down to it, otherwise the
    /// lower selectable bound.
    pub fn initial_index(&self) -> Index {
        let min = self.effective_min();
        let start = if min <= 0 { 0 } else { min };
        self.resolve_position(start)
    }

    fn sanitize(&mut self) {
        if self.min > self.max {
            tracing::warn!(
                "index range inverted (min={}, max={}), collapsing to a single item",
                self.min,
                self.max
            );
            self.max = self.min;
        }

        let (min, max) = (self.min, self.max);
        let clamp_bound = |bound: Option<Index>| bound.map(|b| b.clamp(min, max));
        let mut lo = clamp_bound(self.valid.min);
        let mut hi = clamp_bound(self.valid.max);
        if lo != self.valid.min || hi != self.valid.max {
            tracing::warn!(
                "valid range {:?}..{:?} exceeds index range {}..{}, clamping",
                self.valid.min,
                self.valid.max,
                min,
                max
            );
        }

        if let (Some(l), Some(h)) = (lo, hi) {
            if l > h {
                tracing::warn!("valid range inverted ({l} > {h}), collapsing to {l}");
                hi = Some(l);
            }
        }

        // Recompute after a possible collapse so both sides stay in range
        lo = lo.map(|l| l.clamp(min, max));
        self.valid = ValidRange::new(lo, hi);
    }
}

pub(crate) fn saturate(value: i64) -> Index {
    value.clamp(Index::MIN as i64, Index::MAX as i64) as Index
}
