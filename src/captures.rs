//! Shape facts captured by the external reduction matcher.

use smallvec::SmallVec;

/// Structural properties of a matched reduction computation.
///
/// Filled in by the matcher that located the reduction and held read-only by
/// strategy construction. At this boundary a rank of 0 in
/// [`maybe_leading_rank`](Self::maybe_leading_rank) or
/// [`maybe_trailing_rank`](Self::maybe_trailing_rank) means the optional op
/// is absent; the strategy translates that into `Option` handles internally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedReductionCaptures {
    /// Number of loop dimensions of the reduction, including the reduced
    /// (most minor) dimension.
    pub reduction_rank: usize,
    /// Static extents of the reduction's loop dimensions, where known.
    ///
    /// Carried for future shape-aware policies; the current configuration
    /// selection does not consult them.
    pub reduction_op_sizes: SmallVec<[i64; 4]>,
    /// Rank of the fused leading elementwise op, 0 when absent.
    pub maybe_leading_rank: usize,
    /// Rank of the fused trailing elementwise op, 0 when absent.
    pub maybe_trailing_rank: usize,
}

impl MatchedReductionCaptures {
    /// Whether a leading elementwise op was matched.
    pub fn has_leading(&self) -> bool {
        self.maybe_leading_rank > 0
    }

    /// Whether a trailing elementwise op was matched.
    pub fn has_trailing(&self) -> bool {
        self.maybe_trailing_rank > 0
    }
}
