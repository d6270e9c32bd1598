//! Property-based tests for chunked upload ranges.

use proptest::prelude::*;

use super::chunk::{UploadRange, upload_ranges};

/// Strategy for file sizes, biased towards small values and range boundaries.
fn file_size() -> impl Strategy<Value = u64> {
    prop_oneof![0u64..64, 0u64..100_000, (1u64..64).prop_map(|n| n * 1024)]
}

/// Strategy for range sizes.
fn range_size() -> impl Strategy<Value = u64> {
    prop_oneof![1u64..16, 1u64..10_000]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The number of ranges is `ceil(N / M)`, and zero for an empty file.
    #[test]
    fn prop_range_count(total in file_size(), size in range_size()) {
        let count = upload_ranges(total, size).count() as u64;
        prop_assert_eq!(count, total.div_ceil(size));
    }

    /// Ranges are ascending, contiguous and cover `[0, N-1]` exactly.
    #[test]
    fn prop_ranges_cover_file(total in 1u64..100_000, size in range_size()) {
        let ranges: Vec<UploadRange> = upload_ranges(total, size).collect();

        prop_assert_eq!(ranges[0].start, 0);
        prop_assert_eq!(ranges[ranges.len() - 1].end, total - 1);
        for pair in ranges.windows(2) {
            prop_assert_eq!(pair[1].start, pair[0].end + 1);
        }

        let covered: u64 = ranges.iter().map(UploadRange::len).sum();
        prop_assert_eq!(covered, total);
    }

    /// No range exceeds the range size, and all but the last are full.
    #[test]
    fn prop_ranges_bounded(total in 1u64..100_000, size in range_size()) {
        let ranges: Vec<UploadRange> = upload_ranges(total, size).collect();
        let (last, full) = ranges.split_last().expect("non-empty file has ranges");

        for range in full {
            prop_assert_eq!(range.len(), size);
        }
        prop_assert!(last.len() <= size);
        prop_assert!(last.len() >= 1);
    }
}
