//! A fixed-capacity, append-only bitmap that hands out bits in whole ranges.
//!
//! [`RangeBitmap`] is the main struct in this library. A range of bits can be
//! claimed with [`RangeBitmap::try_set_range`] only if none of its bits has
//! been claimed before, which makes the bitmap a simple exclusive
//! reservation table for slots, blocks or offsets.
//!
//! # Examples
//! ```
//! use range_bitmap::RangeBitmap;
//!
//! let mut bitmap: RangeBitmap = RangeBitmap::new(129);
//! assert_eq!(bitmap.try_set_range(0, 3), Ok(true));
//! assert_eq!(bitmap.try_set_range(3, 61), Ok(true));
//! assert_eq!(bitmap.try_set_range(63, 7), Ok(false));
//! assert_eq!(bitmap.set_count(), 64);
//! assert!(bitmap.try_set_range(129, 1).is_err());
//! ```
//!
//! # Features
//!
//! - All-or-nothing range setting: a conflicting request changes nothing
//! - Bits are never cleared; the bitmap only accumulates
//! - Out-of-bounds requests are reported as [`RangeError::OutOfBounds`]
//! - Bookkeeping: `set_count`, `free_count`, `committed_sections`
//! - Scans: `section_counts`, `occupied_ranges`
//! - Configurable storage word (`u8` up to `u128`, default `u64`)
//! - Diagnostics through the [`log`] facade and a readable `Display` dump
//!
//! # Concurrency
//!
//! Setting a range takes `&mut self`, so the check and the write cannot be
//! interleaved with another writer. To share a bitmap between threads, wrap it
//! in a lock such as `std::sync::Mutex`.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod bitmap;
mod error;
mod word;

pub use bitmap::{OccupiedRanges, RangeBitmap};
pub use error::RangeError;
pub use word::{Word, word_count};
