//! CPU reduction strategy.
//!
//! Handles reductions along the last dimension, with optional fused leading
//! and trailing elementwise ops. Construction selects the tiling parameters;
//! emission appends the transform script that applies them.

use smallvec::SmallVec;
use snafu::ensure;

use crate::captures::MatchedReductionCaptures;
use crate::cpu::common::{BlockDistributor, ReductionMatch, TrailingFinalizer};
use crate::error::{InvalidReductionRankSnafu, StrategyError};
use crate::transform::{FailurePropagation, Handle, ScriptBuilder};

/// Tunable knobs of the CPU reduction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionConfig {
    /// Vector width applied to the most minor dimension.
    pub vector_size: usize,
}

/// Select the configuration for a matched reduction.
///
/// Current policy ignores the captured shape entirely and always vectorizes
/// by 16. Placeholder until a shape-aware policy exists; keep the constant
/// when touching this.
pub fn reduction_config(_captures: &MatchedReductionCaptures) -> ReductionConfig {
    ReductionConfig { vector_size: 16 }
}

/// A configured CPU reduction strategy.
///
/// Combines the matcher's captures with the derived tiling parameters.
/// Read-only once [`create`](Self::create) returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionStrategy {
    /// Captures this strategy was built from.
    pub captures: MatchedReductionCaptures,
    workgroup_tile_sizes: SmallVec<[usize; 4]>,
    vector_size: usize,
}

impl ReductionStrategy {
    /// Build a fully configured strategy from the matcher's captures.
    ///
    /// Fails when `reduction_rank < 1`: a rank-0 "reduction" violates the
    /// matcher contract and must not reach emission.
    pub fn create(captures: MatchedReductionCaptures) -> Result<Self, StrategyError> {
        let config = reduction_config(&captures);
        let mut strategy = Self { captures, workgroup_tile_sizes: SmallVec::new(), vector_size: 0 };
        strategy.configure(&config)?;
        tracing::debug!(vector_size = strategy.vector_size, "using CPU reduction strategy");
        Ok(strategy)
    }

    fn configure(&mut self, config: &ReductionConfig) -> Result<(), StrategyError> {
        ensure!(
            self.captures.reduction_rank >= 1,
            InvalidReductionRankSnafu { rank: self.captures.reduction_rank }
        );

        // Block level: tile every parallel dimension to 8 for now,
        // irrespective of its extent.
        let num_parallel_loops = self.captures.reduction_rank - 1;
        self.workgroup_tile_sizes.extend(std::iter::repeat_n(8, num_parallel_loops));
        self.vector_size = config.vector_size;
        Ok(())
    }

    /// Tile sizes for the parallel (non-reduced) loop dimensions, one per
    /// dimension.
    pub fn workgroup_tile_sizes(&self) -> &[usize] {
        &self.workgroup_tile_sizes
    }

    /// Vector width for the most minor dimension.
    pub fn vector_size(&self) -> usize {
        self.vector_size
    }
}

/// Append the CPU reduction transform script to `script`.
///
/// The emitted sequence, in order:
///
/// 1. Re-register and re-run the "reduction" matcher over `variant`. This is
///    the same matcher that selected this strategy, so it must re-apply;
///    Propagate mode makes a mismatch abort the whole script at
///    interpretation time.
/// 2. Distribute onto a single-iteration block loop, everything fused
///    (delegated to `distributor`).
/// 3. Tile the most minor dimension of the leading, reduction and trailing
///    ops, in that order, by [`ReductionStrategy::vector_size`]. Absent ops
///    (rank 0) are skipped.
/// 4. Shared trailing steps over the whole variant (delegated to
///    `finalizer`).
///
/// Emission itself cannot fail; any failure surfaces when the host
/// interpreter executes the script.
pub fn build_reduction_strategy(
    script: &mut ScriptBuilder,
    variant: Handle,
    strategy: &ReductionStrategy,
    distributor: &impl BlockDistributor,
    finalizer: &impl TrailingFinalizer,
) {
    // Step 1. Call the matcher.
    script.register_match_callbacks();
    let handles = script.match_callback("reduction", FailurePropagation::Propagate, variant, 4);
    let matched = ReductionMatch {
        maybe_leading: strategy.captures.has_leading().then_some(handles[0]),
        fill: handles[1],
        reduction: handles[2],
        maybe_trailing: strategy.captures.has_trailing().then_some(handles[3]),
    };

    // Step 2. Block distribution.
    let block = distributor.distribute(script, &matched, strategy);

    // Step 3. Naive first cut: vectorize only the last dimension of each op.
    let slots = [
        (block.maybe_leading, strategy.captures.maybe_leading_rank),
        (Some(block.reduction), strategy.captures.reduction_rank),
        (block.maybe_trailing, strategy.captures.maybe_trailing_rank),
    ];
    for (handle, rank) in slots {
        if rank == 0 {
            continue;
        }
        let Some(handle) = handle else { continue };
        let mut tile_sizes: SmallVec<[usize; 4]> = SmallVec::new();
        tile_sizes.extend(std::iter::repeat_n(0, rank - 1));
        tile_sizes.push(strategy.vector_size());
        script.tile_fuse_to_scf_for(handle, tile_sizes, &[]);
    }

    // Step 4. Common trailing steps.
    finalizer.finalize(script, variant);
}
