/// Block length `ceil(sqrt(samples / workers))`, at least one.
pub fn block_length(samples: u64, workers: usize) -> u64 {
    let per_worker = samples as f64 / workers.max(1) as f64;
    (per_worker.sqrt().ceil() as u64).max(1)
}

/// Running `(sum, sum of squares)` flushed from a local partial every `block`
/// values, bounding the cancellation error of long sums.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockAccumulator {
    block: u64,
    filled: u64,
    partial: [f64; 2],
    total: [f64; 2],
}

impl BlockAccumulator {
    /// Creates an empty accumulator; a zero block length is treated as one.
    pub fn new(block: u64) -> Self {
        Self {
            block: block.max(1),
            filled: 0,
            partial: [0.0; 2],
            total: [0.0; 2],
        }
    }

    /// Adds one value.
    pub fn push(&mut self, value: f64) {
        self.partial[0] += value;
        self.partial[1] += value * value;
        self.filled += 1;
        if self.filled == self.block {
            self.flush();
        }
    }

    /// Flushes the pending partial and returns `[sum, sum of squares]`.
    pub fn finish(mut self) -> [f64; 2] {
        self.flush();
        self.total
    }

    fn flush(&mut self) {
        self.total[0] += self.partial[0];
        self.total[1] += self.partial[1];
        self.partial = [0.0; 2];
        self.filled = 0;
    }
}

/// Elementwise sum of two accumulator results.
pub fn combine(left: [f64; 2], right: [f64; 2]) -> [f64; 2] {
    [left[0] + right[0], left[1] + right[1]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_length_rounds_up() {
        assert_eq!(block_length(0, 4), 1);
        assert_eq!(block_length(100, 4), 5);
        assert_eq!(block_length(101, 4), 6);
        assert_eq!(block_length(10, 0), 4);
    }

    #[test]
    fn partial_blocks_are_flushed_on_finish() {
        let mut acc = BlockAccumulator::new(3);
        for value in [1.0, 2.0, 3.0, 4.0] {
            acc.push(value);
        }
        assert_eq!(acc.finish(), [10.0, 30.0]);
    }
}
