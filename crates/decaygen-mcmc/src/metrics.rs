use serde::{Deserialize, Serialize};

/// Proposal bookkeeping for a single chain, burn-in included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChainStats {
    /// Number of evaluated proposals.
    pub proposed: u64,
    /// Number of accepted proposals.
    pub accepted: u64,
}

impl ChainStats {
    /// Records the outcome of one proposal.
    pub fn record(&mut self, accepted: bool) {
        self.proposed += 1;
        if accepted {
            self.accepted += 1;
        }
    }

    /// Fraction of accepted proposals, zero before the first proposal.
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}
