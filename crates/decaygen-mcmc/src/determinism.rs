use std::ops::Range;

use decaygen_core::derive_substream_seed;

/// Derives the seed of one estimator worker chain.
pub fn worker_seed(fork_seed: u64, rank: usize, worker: usize) -> u64 {
    derive_substream_seed(fork_seed, (rank as u64) << 32 | worker as u64)
}

/// Contiguous share of `range` owned by participant `rank` out of `size`.
///
/// Shares are balanced to within one index, cover the range without overlap
/// and may be empty when the range is shorter than `size`.
pub fn rank_slice(range: Range<u64>, rank: usize, size: usize) -> Range<u64> {
    let size = size.max(1) as u128;
    let len = range.end.saturating_sub(range.start) as u128;
    let offset = |index: u128| range.start + (len * index / size) as u64;
    offset(rank as u128)..offset(rank as u128 + 1)
}
