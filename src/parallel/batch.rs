//! Batch distribution for parallel estimation.
//!
//! Splits trials into ranges for parallel execution or chunked export.

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use beachhead::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + usize::from(i < remainder);
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Split `total` items into consecutive ranges of at most `chunk_size` items.
/// Boundaries depend only on `total` and `chunk_size`, never on thread count.
pub fn chunk_ranges(total: usize, chunk_size: usize) -> Vec<(usize, usize)> {
    if total == 0 || chunk_size == 0 {
        return Vec::new();
    }
    (0..total)
        .step_by(chunk_size)
        .map(|start| (start, (start + chunk_size).min(total)))
        .collect()
}
