//! Byte ranges for chunked uploads.
//!
//! A chunked upload first creates the remote file with its final size and
//! then writes it range by range. Ranges are produced by advancing a cursor
//! by the full range size while `position < total`:
//!
//! ```text
//! total = 2M + 5
//! ┌──────────────┬──────────────┬─────┐
//! │ [0, M-1]     │ [M, 2M-1]    │ 5 B │
//! └──────────────┴──────────────┴─────┘
//! ```

use std::fmt;

/// Maximum number of bytes written by one range request.
///
/// Treated as the "4 MB" range limit, although `4096 * 4096` is 16 MiB.
/// The literal is kept as-is.
pub const MAX_RANGE_SIZE: u64 = 4096 * 4096;

/// Inclusive byte range `[start, end]` of one upload chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset, inclusive.
    pub end: u64,
}

impl UploadRange {
    /// Create a range. `end` must not be before `start`.
    #[must_use]
    pub const fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of bytes covered by the range.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for an HTTP range header, e.g. `bytes=0-511`.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl fmt::Display for UploadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Iterator over the ranges of a chunked upload.
#[derive(Debug, Clone)]
pub struct UploadRanges {
    position: u64,
    total: u64,
    range_size: u64,
}

impl Iterator for UploadRanges {
    type Item = UploadRange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.total {
            return None;
        }

        let end = self
            .position
            .saturating_add(self.range_size - 1)
            .min(self.total - 1);
        let range = UploadRange::new(self.position, end);
        self.position = self.position.saturating_add(self.range_size);

        Some(range)
    }
}

/// Ranges covering a file of `total` bytes in chunks of at most
/// `range_size` bytes.
///
/// A zero `range_size` is treated as one byte.
#[must_use]
pub fn upload_ranges(total: u64, range_size: u64) -> UploadRanges {
    UploadRanges {
        position: 0,
        total,
        range_size: range_size.max(1),
    }
}
