use thiserror::Error;

/// Errors returned by fallible [`RangeBitmap`](crate::RangeBitmap) operations.
///
/// A conflict with already set bits is not an error; it is reported as
/// `Ok(false)`. `RangeError` only covers caller mistakes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeError {
    /// The requested range reaches past the end of the bitmap, or
    /// `start + span` does not fit in a `usize`.
    #[error(
        "range out of bounds: start {start} + span {span} exceeds bitmap length {length}"
    )]
    OutOfBounds {
        /// First bit of the requested range.
        start: usize,
        /// Number of bits requested.
        span: usize,
        /// Length of the bitmap the range was checked against.
        length: usize,
    },
}
