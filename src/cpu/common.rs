//! Steps shared across CPU strategies.
//!
//! Block-level distribution and trailing cleanup are common to every CPU
//! strategy, not specific to reductions. The emission procedure consumes
//! them through the [`BlockDistributor`] and [`TrailingFinalizer`] traits;
//! the standard implementations live here and tests substitute fakes.

use crate::cpu::reduction::ReductionStrategy;
use crate::transform::{Handle, ScriptBuilder};

/// Handles of the ops bound by the "reduction" match callback.
///
/// Optional slots are `Option`, not sentinel handles; the rank-0-means-absent
/// convention of the matcher is translated once, at the match boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionMatch {
    /// Leading elementwise op, when one was matched.
    pub maybe_leading: Option<Handle>,
    /// Fill op initializing the reduction accumulator.
    pub fill: Handle,
    /// The reduction op itself.
    pub reduction: Handle,
    /// Trailing elementwise op, when one was matched.
    pub maybe_trailing: Option<Handle>,
}

/// Introduces the coarse-grained parallel loop a strategy distributes onto.
pub trait BlockDistributor {
    /// Distribute the matched ops onto a block-level loop, returning the
    /// block-scoped copies of the same four slots.
    fn distribute(
        &self,
        script: &mut ScriptBuilder,
        ops: &ReductionMatch,
        strategy: &ReductionStrategy,
    ) -> ReductionMatch;
}

/// Appends the finalization directives shared by all CPU strategies.
pub trait TrailingFinalizer {
    /// Finalize the script over the top-level `variant` region.
    fn finalize(&self, script: &mut ScriptBuilder, variant: Handle);
}

/// Standard block distribution: a single-iteration forall loop mapped to one
/// workgroup, with every matched op fused into it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForallBlockDistribution;

impl BlockDistributor for ForallBlockDistribution {
    fn distribute(
        &self,
        script: &mut ScriptBuilder,
        ops: &ReductionMatch,
        _strategy: &ReductionStrategy,
    ) -> ReductionMatch {
        let (forall, grid_reduction) = script.tile_to_forall(ops.reduction, &[1]);
        let grid_fill = script.fuse_into_forall(ops.fill, forall);
        let maybe_leading = ops.maybe_leading.map(|leading| script.fuse_into_forall(leading, forall));
        let maybe_trailing = ops.maybe_trailing.map(|trailing| script.fuse_into_forall(trailing, forall));
        ReductionMatch { maybe_leading, fill: grid_fill, reduction: grid_reduction, maybe_trailing }
    }
}

/// Standard trailing steps: canonicalize then CSE the whole variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonTrailing;

impl TrailingFinalizer for CommonTrailing {
    fn finalize(&self, script: &mut ScriptBuilder, variant: Handle) {
        script.canonicalize(variant);
        script.cse(variant);
    }
}

#[cfg(test)]
mod tests {
    use crate::captures::MatchedReductionCaptures;
    use crate::transform::Directive;

    use super::*;

    fn strategy(rank: usize) -> ReductionStrategy {
        let captures = MatchedReductionCaptures { reduction_rank: rank, ..Default::default() };
        ReductionStrategy::create(captures).unwrap()
    }

    fn matched(script: &mut ScriptBuilder, leading: bool, trailing: bool) -> ReductionMatch {
        let program = script.program();
        let handles =
            script.match_callback("reduction", crate::transform::FailurePropagation::Propagate, program, 4);
        ReductionMatch {
            maybe_leading: leading.then_some(handles[0]),
            fill: handles[1],
            reduction: handles[2],
            maybe_trailing: trailing.then_some(handles[3]),
        }
    }

    #[test]
    fn test_distribution_is_single_iteration() {
        let mut script = ScriptBuilder::new();
        let ops = matched(&mut script, false, false);
        ForallBlockDistribution.distribute(&mut script, &ops, &strategy(2));

        let foralls: Vec<_> = script
            .directives()
            .iter()
            .filter_map(|d| match d {
                Directive::TileToForall { num_threads, .. } => Some(num_threads.as_slice()),
                _ => None,
            })
            .collect();
        assert_eq!(foralls, vec![&[1][..]], "one workgroup, one iteration");
    }

    #[test]
    fn test_distribution_fuses_only_present_ops() {
        let mut script = ScriptBuilder::new();
        let ops = matched(&mut script, true, false);
        let block = ForallBlockDistribution.distribute(&mut script, &ops, &strategy(2));

        assert!(block.maybe_leading.is_some());
        assert!(block.maybe_trailing.is_none());

        let fusions =
            script.directives().iter().filter(|d| matches!(d, Directive::FuseIntoForall { .. })).count();
        assert_eq!(fusions, 2, "fill and leading are fused, trailing is absent");
    }

    #[test]
    fn test_distribution_returns_block_scoped_handles() {
        let mut script = ScriptBuilder::new();
        let ops = matched(&mut script, false, true);
        let block = ForallBlockDistribution.distribute(&mut script, &ops, &strategy(3));

        assert_ne!(block.reduction, ops.reduction);
        assert_ne!(block.fill, ops.fill);
        assert_ne!(block.maybe_trailing, ops.maybe_trailing);
    }

    #[test]
    fn test_common_trailing_cleans_the_variant() {
        let mut script = ScriptBuilder::new();
        let program = script.program();
        CommonTrailing.finalize(&mut script, program);

        let rendered: Vec<_> = script.directives().iter().map(|d| d.to_string()).collect();
        assert_eq!(rendered, vec!["canonicalize(%0)", "cse(%0)"]);
    }
}
