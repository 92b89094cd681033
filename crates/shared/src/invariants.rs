//! Bounded numeric wrappers for validated settings.

use std::fmt;

/// Out-of-range error for bounded numeric wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsError<T> {
    /// Raw value provided.
    pub value: T,
    /// Inclusive minimum.
    pub min: T,
    /// Inclusive maximum.
    pub max: T,
}

impl<T: fmt::Display> fmt::Display for BoundsError<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "value {} is outside [{}, {}]",
            self.value, self.min, self.max
        )
    }
}

impl<T: fmt::Debug + fmt::Display> std::error::Error for BoundsError<T> {}

macro_rules! bounded_integer {
    ($(#[$meta:meta])* $name:ident, $int:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name<const MIN: $int, const MAX: $int>($int);

        impl<const MIN: $int, const MAX: $int> $name<MIN, MAX> {
            /// Create a bounded value when within the inclusive range.
            pub const fn new(value: $int) -> Option<Self> {
                if value < MIN || value > MAX {
                    None
                } else {
                    Some(Self(value))
                }
            }

            /// Create a bounded value or return a bounds error.
            pub const fn try_new(value: $int) -> Result<Self, BoundsError<$int>> {
                match Self::new(value) {
                    Some(value) => Ok(value),
                    None => Err(BoundsError {
                        value,
                        min: MIN,
                        max: MAX,
                    }),
                }
            }

            /// Return the wrapped value.
            pub const fn get(self) -> $int {
                self.0
            }
        }

        impl<const MIN: $int, const MAX: $int> fmt::Display for $name<MIN, MAX> {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

bounded_integer!(
    /// Bounded `u32` with const generic limits.
    BoundedU32,
    u32
);

bounded_integer!(
    /// Bounded `u64` with const generic limits.
    BoundedU64,
    u64
);

#[cfg(test)]
mod tests {
    use super::*;

    type Seconds = BoundedU64<1, 3600>;
    type LineLength = BoundedU32<1, 100_000>;

    #[test]
    fn values_inside_range_are_accepted() {
        assert_eq!(Seconds::new(1).map(Seconds::get), Some(1));
        assert_eq!(Seconds::new(3600).map(Seconds::get), Some(3600));
        assert_eq!(LineLength::new(300).map(LineLength::get), Some(300));
    }

    #[test]
    fn values_outside_range_report_bounds() {
        assert_eq!(
            Seconds::try_new(0),
            Err(BoundsError {
                value: 0,
                min: 1,
                max: 3600
            })
        );
        let error = LineLength::try_new(100_001).err();
        assert_eq!(
            error.map(|error| error.to_string()).as_deref(),
            Some("value 100001 is outside [1, 100000]")
        );
    }
}
