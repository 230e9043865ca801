use core::fmt::{Binary, Debug};
use core::hash::Hash;
use core::ops::{BitAnd, BitOr, BitOrAssign, Not, Shl};

/// An unsigned integer used as the storage unit of a
/// [`RangeBitmap`](crate::RangeBitmap).
///
/// Implemented for `u8`, `u16`, `u32`, `u64`, `u128` and `usize`. The word
/// type is chosen through the bitmap's type parameter and defaults to `u64`.
///
/// The trait is sealed. A type providing every other bound still cannot
/// implement it outside this crate:
/// ```compile_fail
/// use core::fmt;
/// use core::ops::{BitAnd, BitOr, BitOrAssign, Not, Shl};
/// use range_bitmap::Word;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// struct Narrow(u8);
///
/// impl fmt::Binary for Narrow {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         fmt::Binary::fmt(&self.0, f)
///     }
/// }
/// impl BitAnd for Narrow {
///     type Output = Self;
///     fn bitand(self, rhs: Self) -> Self {
///         Narrow(self.0 & rhs.0)
///     }
/// }
/// impl BitOr for Narrow {
///     type Output = Self;
///     fn bitor(self, rhs: Self) -> Self {
///         Narrow(self.0 | rhs.0)
///     }
/// }
/// impl BitOrAssign for Narrow {
///     fn bitor_assign(&mut self, rhs: Self) {
///         self.0 |= rhs.0;
///     }
/// }
/// impl Not for Narrow {
///     type Output = Self;
///     fn not(self) -> Self {
///         Narrow(!self.0)
///     }
/// }
/// impl Shl<usize> for Narrow {
///     type Output = Self;
///     fn shl(self, rhs: usize) -> Self {
///         Narrow(self.0 << rhs)
///     }
/// }
///
/// impl Word for Narrow {
///     const BITS: usize = 0;
///     const ZERO: Self = Narrow(0);
///     const ONES: Self = Narrow(0);
///
///     fn trailing_zeros(self) -> usize {
///         0
///     }
///
///     fn count_ones(self) -> usize {
///         0
///     }
/// }
/// ```
pub trait Word:
    sealed::Sealed
    + Copy
    + Eq
    + Hash
    + Debug
    + Binary
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitOrAssign
    + Not<Output = Self>
    + Shl<usize, Output = Self>
{
    /// Number of bits in one word.
    const BITS: usize;
    /// The word with no bits set.
    const ZERO: Self;
    /// The word with every bit set.
    const ONES: Self;

    /// Number of trailing zero bits.
    fn trailing_zeros(self) -> usize;

    /// Number of set bits.
    fn count_ones(self) -> usize;

    /// Returns a word with bits `[start, end)` set and all others unset.
    ///
    /// # Panics
    /// Panics if `start > end` or `end > Self::BITS`.
    ///
    /// # Examples
    /// ```
    /// use range_bitmap::Word;
    ///
    /// assert_eq!(u8::range_mask(2, 5), 0b0001_1100);
    /// assert_eq!(u8::range_mask(0, 8), 0xff);
    /// assert_eq!(u64::range_mask(3, 3), 0);
    /// ```
    #[inline]
    fn range_mask(start: usize, end: usize) -> Self {
        assert!(
            start <= end && end <= Self::BITS,
            "Mask range {start}..{end} out of bounds"
        );
        let width = end - start;
        if width == 0 {
            Self::ZERO
        } else if width == Self::BITS {
            // shifting by BITS would overflow
            Self::ONES
        } else {
            !(Self::ONES << width) << start
        }
    }

    /// Returns `true` if no bit is set.
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! impl_word {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Word for $ty {
                const BITS: usize = <$ty>::BITS as usize;
                const ZERO: Self = 0;
                const ONES: Self = <$ty>::MAX;

                #[inline]
                fn trailing_zeros(self) -> usize {
                    <$ty>::trailing_zeros(self) as usize
                }

                #[inline]
                fn count_ones(self) -> usize {
                    <$ty>::count_ones(self) as usize
                }
            }
        )+
    };
}

impl_word!(u8, u16, u32, u64, u128, usize);

/// Computes the number of words of type `W` needed to store `bit_count` bits.
///
/// # Examples
/// ```
/// use range_bitmap::word_count;
///
/// assert_eq!(word_count::<u64>(0), 0);
/// assert_eq!(word_count::<u64>(64), 1);
/// assert_eq!(word_count::<u64>(129), 3);
/// assert_eq!(word_count::<u8>(17), 3);
/// ```
pub const fn word_count<W: Word>(bit_count: usize) -> usize {
    bit_count.div_ceil(W::BITS)
}
