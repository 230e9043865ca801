use core::fmt::{self, Debug, Display, Formatter, Write as _};
use core::iter::FusedIterator;
use core::ops::Range;

use log::{debug, error, trace};

use crate::error::RangeError;
use crate::word::{Word, word_count};

/// A fixed-length, append-only bitmap whose bits are reserved in whole
/// ranges.
///
/// A range can only be set if none of its bits are set yet. Setting is
/// all-or-nothing: a conflicting request leaves the bitmap untouched. Bits are
/// never unset again.
///
/// `W` is the storage word, `u64` by default (see [`Word`]).
///
/// # Examples
/// ```
/// use range_bitmap::RangeBitmap;
///
/// let mut bitmap: RangeBitmap = RangeBitmap::new(129);
/// assert_eq!(bitmap.try_set_range(0, 3), Ok(true));
/// assert_eq!(bitmap.try_set_range(63, 7), Ok(true));
/// // bit 64 is already taken
/// assert_eq!(bitmap.try_set_range(64, 65), Ok(false));
/// assert_eq!(bitmap.set_count(), 10);
/// ```
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct RangeBitmap<W: Word = u64> {
    pub(crate) words: Vec<W>,
    length: usize,
    set_count: usize,
    committed_sections: usize,
}

/// Masked view of a single word touched by a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WordSpan<W> {
    pub(crate) idx: usize,
    pub(crate) mask: W,
}

/// Splits the non-empty range `[start, start + span)` into per-word masks:
/// a partial head word, full interior words and a partial tail word.
pub(crate) fn word_spans<W: Word>(
    start: usize,
    span: usize,
) -> impl Iterator<Item = WordSpan<W>> {
    debug_assert!(span > 0);
    let last = start + span - 1;
    let (start_word, start_bit) = (start / W::BITS, start % W::BITS);
    let (end_word, end_bit) = (last / W::BITS, last % W::BITS);

    (start_word..=end_word).map(move |idx| {
        let lo = if idx == start_word { start_bit } else { 0 };
        let hi = if idx == end_word { end_bit + 1 } else { W::BITS };
        WordSpan {
            idx,
            mask: W::range_mask(lo, hi),
        }
    })
}

impl<W: Word> RangeBitmap<W> {
    /// Creates a bitmap of `length` bits, all unset.
    ///
    /// A length of zero is allowed and yields a bitmap without storage.
    ///
    /// # Examples
    /// ```
    /// use range_bitmap::RangeBitmap;
    ///
    /// let bitmap = RangeBitmap::<u32>::new(40);
    /// assert_eq!(bitmap.len(), 40);
    /// assert_eq!(bitmap.word_count(), 2);
    /// assert_eq!(bitmap.set_count(), 0);
    /// ```
    pub fn new(length: usize) -> Self {
        Self {
            words: vec![W::ZERO; word_count::<W>(length)],
            length,
            set_count: 0,
            committed_sections: 0,
        }
    }

    /// Number of addressable bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the bitmap has no addressable bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Total number of bits set so far.
    #[inline]
    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// Number of bits that are still unset.
    #[inline]
    pub fn free_count(&self) -> usize {
        self.length - self.set_count
    }

    /// Returns `true` if every bit is set.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.set_count == self.length
    }

    /// Number of successful non-empty [`try_set_range`] calls.
    ///
    /// Each committed range counts once, even if it touches a range set
    /// earlier and the two now form one contiguous run. This is therefore an
    /// upper bound on the number of set sections reported by
    /// [`section_counts`].
    ///
    /// [`try_set_range`]: RangeBitmap::try_set_range
    /// [`section_counts`]: RangeBitmap::section_counts
    #[inline]
    pub fn committed_sections(&self) -> usize {
        self.committed_sections
    }

    /// Number of storage words.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// The raw storage words, least significant bit first.
    ///
    /// Padding bits past [`len`](RangeBitmap::len) in the last word are
    /// always unset.
    #[inline]
    pub fn as_words(&self) -> &[W] {
        &self.words
    }

    /// Returns `true` if the bit at `idx` is set.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    ///
    /// # Examples
    /// ```
    /// use range_bitmap::RangeBitmap;
    ///
    /// let mut bitmap: RangeBitmap = RangeBitmap::new(8);
    /// bitmap.try_set_range(2, 3).unwrap();
    /// assert!(!bitmap.is_set(1));
    /// assert!(bitmap.is_set(2));
    /// assert!(bitmap.is_set(4));
    /// assert!(!bitmap.is_set(5));
    /// ```
    #[inline]
    pub fn is_set(&self, idx: usize) -> bool {
        assert!(idx < self.length, "Bit index {idx} out of bounds");
        let (word_idx, bit_idx) = Self::idxs(idx);
        !(self.words[word_idx] & W::range_mask(bit_idx, bit_idx + 1)).is_zero()
    }

    #[inline]
    fn idxs(idx: usize) -> (usize, usize) {
        (idx / W::BITS, idx % W::BITS)
    }

    fn check_bounds(&self, start: usize, span: usize) -> Result<(), RangeError> {
        match start.checked_add(span) {
            Some(end) if end <= self.length => Ok(()),
            _ => Err(RangeError::OutOfBounds {
                start,
                span,
                length: self.length,
            }),
        }
    }

    /// Returns the index of the first word in which `[start, start + span)`
    /// collides with an already set bit. Bounds must already be checked.
    fn first_conflict(&self, start: usize, span: usize) -> Option<usize> {
        if span == 0 {
            return None;
        }
        word_spans::<W>(start, span)
            .find(|ws| !(self.words[ws.idx] & ws.mask).is_zero())
            .map(|ws| ws.idx)
    }

    /// Returns whether none of the bits in `[start, start + span)` are set,
    /// without modifying the bitmap.
    ///
    /// # Errors
    /// Returns [`RangeError::OutOfBounds`] if `start + span > self.len()`.
    ///
    /// # Examples
    /// ```
    /// use range_bitmap::RangeBitmap;
    ///
    /// let mut bitmap: RangeBitmap = RangeBitmap::new(16);
    /// bitmap.try_set_range(4, 4).unwrap();
    /// assert_eq!(bitmap.is_range_free(0, 4), Ok(true));
    /// assert_eq!(bitmap.is_range_free(0, 5), Ok(false));
    /// assert!(bitmap.is_range_free(10, 7).is_err());
    /// ```
    pub fn is_range_free(&self, start: usize, span: usize) -> Result<bool, RangeError> {
        self.check_bounds(start, span)?;
        Ok(self.first_conflict(start, span).is_none())
    }

    /// Sets all bits in `[start, start + span)` if none of them is set yet.
    ///
    /// Returns `Ok(true)` if the range was set and `Ok(false)` if at least
    /// one bit in it was already set. In the latter case the bitmap is left
    /// unchanged. An empty range (`span == 0`) is always free and changes
    /// nothing.
    ///
    /// The range is first checked word by word and only written once every
    /// word is known to be free, so a failed call never leaves partial
    /// writes behind.
    ///
    /// # Errors
    /// Returns [`RangeError::OutOfBounds`] if `start + span > self.len()`.
    ///
    /// # Examples
    /// ```
    /// use range_bitmap::{RangeBitmap, RangeError};
    ///
    /// let mut bitmap: RangeBitmap = RangeBitmap::new(100);
    /// assert_eq!(bitmap.try_set_range(60, 10), Ok(true));
    /// assert_eq!(bitmap.try_set_range(50, 11), Ok(false));
    /// assert_eq!(bitmap.try_set_range(50, 10), Ok(true));
    /// assert_eq!(
    ///     bitmap.try_set_range(99, 2),
    ///     Err(RangeError::OutOfBounds { start: 99, span: 2, length: 100 })
    /// );
    /// assert_eq!(bitmap.set_count(), 20);
    /// ```
    pub fn try_set_range(&mut self, start: usize, span: usize) -> Result<bool, RangeError> {
        self.check_bounds(start, span)
            .inspect_err(|err| debug!("rejected range: {err}"))?;
        if span == 0 {
            return Ok(true);
        }

        if let Some(word_idx) = self.first_conflict(start, span) {
            debug!("range [{start}, {}) conflicts in word {word_idx}", start + span);
            return Ok(false);
        }

        for ws in word_spans::<W>(start, span) {
            self.words[ws.idx] |= ws.mask;
        }
        self.set_count += span;
        self.committed_sections += 1;
        trace!(
            "set range [{start}, {}), {} bits set in total",
            start + span,
            self.set_count
        );
        Ok(true)
    }

    /// Returns an iterator over the maximal runs of set bits, as half-open
    /// ranges in ascending order.
    ///
    /// # Examples
    /// ```
    /// use range_bitmap::RangeBitmap;
    ///
    /// let mut bitmap: RangeBitmap = RangeBitmap::new(129);
    /// bitmap.try_set_range(0, 3).unwrap();
    /// bitmap.try_set_range(3, 61).unwrap();
    /// bitmap.try_set_range(100, 29).unwrap();
    /// let runs: Vec<_> = bitmap.occupied_ranges().collect();
    /// assert_eq!(runs, [0..64, 100..129]);
    /// ```
    #[inline]
    pub fn occupied_ranges(&self) -> OccupiedRanges<'_, W> {
        OccupiedRanges {
            bitmap: self,
            pos: 0,
        }
    }

    /// Index of the first bit at or after `from` with the wanted value, or
    /// `self.len()` if there is none.
    fn next_with_value(&self, from: usize, value: bool) -> usize {
        if from >= self.length {
            return self.length;
        }
        let (mut word_idx, bit_idx) = Self::idxs(from);
        let load = |w: W| if value { w } else { !w };
        let mut current = load(self.words[word_idx]) & W::range_mask(bit_idx, W::BITS);
        loop {
            if !current.is_zero() {
                let idx = word_idx * W::BITS + current.trailing_zeros();
                return idx.min(self.length);
            }
            word_idx += 1;
            if word_idx >= self.words.len() {
                return self.length;
            }
            current = load(self.words[word_idx]);
        }
    }

    /// Counts the maximal runs of unset and of set bits, returned as
    /// `(zero_sections, one_sections)`.
    ///
    /// Both numbers come from a scan over the whole bitmap. The scanned
    /// number of set runs is checked against [`committed_sections`], which
    /// can only be larger: adjacent ranges committed separately are counted
    /// twice there but merge into one run here.
    ///
    /// # Panics
    /// Panics if the scan finds more set runs than ranges were ever
    /// committed. This means the bookkeeping is broken.
    ///
    /// # Examples
    /// ```
    /// use range_bitmap::RangeBitmap;
    ///
    /// let mut bitmap: RangeBitmap = RangeBitmap::new(10);
    /// assert_eq!(bitmap.section_counts(), (1, 0));
    /// bitmap.try_set_range(2, 2).unwrap();
    /// bitmap.try_set_range(4, 2).unwrap();
    /// assert_eq!(bitmap.section_counts(), (2, 1));
    /// assert_eq!(bitmap.committed_sections(), 2);
    /// ```
    ///
    /// [`committed_sections`]: RangeBitmap::committed_sections
    pub fn section_counts(&self) -> (usize, usize) {
        let mut one_sections = 0;
        let mut zero_sections = 0;
        let mut covered_to = 0;
        for run in self.occupied_ranges() {
            if run.start > covered_to {
                zero_sections += 1;
            }
            one_sections += 1;
            covered_to = run.end;
        }
        if covered_to < self.length {
            zero_sections += 1;
        }

        if one_sections > self.committed_sections {
            error!(
                "scanned {one_sections} set sections but only {} were committed",
                self.committed_sections
            );
            panic!(
                "Set section count inconsistent: scanned {one_sections}, committed {}\n{self}",
                self.committed_sections
            );
        }
        (zero_sections, one_sections)
    }

    /// Renders a human-readable summary: lengths, number of set bits and all
    /// occupied areas. Same as the [`Display`] output.
    ///
    /// # Examples
    /// ```
    /// use range_bitmap::RangeBitmap;
    ///
    /// let mut bitmap: RangeBitmap = RangeBitmap::new(129);
    /// bitmap.try_set_range(0, 3).unwrap();
    /// bitmap.try_set_range(63, 7).unwrap();
    /// assert_eq!(
    ///     bitmap.describe(),
    ///     "Length: 129, Len of array: 3, # set slots: 10\nOccupied areas: [0, 3)[63, 70)\n"
    /// );
    /// ```
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl<W: Word> Display for RangeBitmap<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut areas = String::new();
        for run in self.occupied_ranges() {
            write!(areas, "[{}, {})", run.start, run.end)?;
        }
        writeln!(
            f,
            "Length: {}, Len of array: {}, # set slots: {}",
            self.length,
            self.words.len(),
            self.set_count
        )?;
        writeln!(f, "Occupied areas: {areas}")
    }
}

impl<W: Word> Debug for RangeBitmap<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "LSB -> ")?;
        for idx in 0..self.length {
            if idx % W::BITS == 0 {
                if idx > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{idx}: ")?;
            }
            write!(f, "{}", if self.is_set(idx) { '1' } else { '0' })?;
        }
        write!(f, " <- MSB")
    }
}

impl<'bitmap, W: Word> IntoIterator for &'bitmap RangeBitmap<W> {
    type Item = Range<usize>;
    type IntoIter = OccupiedRanges<'bitmap, W>;

    fn into_iter(self) -> Self::IntoIter {
        self.occupied_ranges()
    }
}

/// Iterator over the maximal runs of set bits in a bitmap.
///
/// Returned by [`RangeBitmap::occupied_ranges()`].
#[derive(Clone, Copy)]
pub struct OccupiedRanges<'bitmap, W: Word> {
    bitmap: &'bitmap RangeBitmap<W>,
    pos: usize,
}

impl<W: Word> Iterator for OccupiedRanges<'_, W> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.bitmap.next_with_value(self.pos, true);
        if start >= self.bitmap.length {
            self.pos = self.bitmap.length;
            return None;
        }
        let end = self.bitmap.next_with_value(start, false);
        self.pos = end;
        Some(start..end)
    }
}

impl<W: Word> FusedIterator for OccupiedRanges<'_, W> {}
