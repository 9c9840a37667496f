//! Quantity Counter

/// Bounded quantity picker for standalone drinks.
///
/// Always holds a value in `MIN..=MAX`; stepping past either bound is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityCounter {
    value: u32,
}

impl QuantityCounter {
    /// Lowest selectable quantity.
    pub const MIN: u32 = 1;

    /// Highest selectable quantity.
    pub const MAX: u32 = 30;

    /// A counter at the minimum.
    #[must_use]
    pub fn new() -> Self {
        Self { value: Self::MIN }
    }

    /// Current quantity.
    pub fn value(self) -> u32 {
        self.value
    }

    /// Step up by one. Returns whether the value changed.
    pub fn increment(&mut self) -> bool {
        if self.value >= Self::MAX {
            return false;
        }

        self.value += 1;

        true
    }

    /// Step down by one. Returns whether the value changed.
    pub fn decrement(&mut self) -> bool {
        if self.value <= Self::MIN {
            return false;
        }

        self.value -= 1;

        true
    }

    /// Set a value, clamped into range.
    pub fn set(&mut self, value: u32) {
        self.value = value.clamp(Self::MIN, Self::MAX);
    }

    /// Back to the minimum.
    pub fn reset(&mut self) {
        self.value = Self::MIN;
    }
}

impl Default for QuantityCounter {
    fn default() -> Self {
        Self::new()
    }
}
