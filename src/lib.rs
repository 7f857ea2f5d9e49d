//! Transform-script construction for CPU reduction codegen.
//!
//! Given the structural facts a matcher captured about a reduction-shaped
//! computation (rank, optional fused leading/trailing elementwise ops), this
//! crate decides tiling parameters and builds a linear sequence of
//! transformation directives that an external transform interpreter later
//! executes against the target program.
//!
//! # Module Organization
//!
//! - [`captures`] - Shape facts supplied by the external matcher
//! - [`transform`] - Directive model and the script builder they accumulate in
//! - [`cpu`] - CPU reduction strategy (configuration, emission, shared steps)
//!
//! # Flow
//!
//! 1. The matcher locates a reduction and fills [`MatchedReductionCaptures`].
//! 2. [`ReductionStrategy::create`] selects the configuration and derives the
//!    workgroup tile sizes.
//! 3. [`build_reduction_strategy`] appends the directive sequence to a
//!    [`ScriptBuilder`]: re-match, block distribution, per-op vector tiling,
//!    trailing cleanup.
//! 4. The host interpreter executes the script; a directive failing there
//!    aborts the whole sequence (Propagate mode on the match).

pub mod captures;
pub mod cpu;
pub mod error;
pub mod transform;

#[cfg(test)]
mod test;

// Re-export main types
pub use captures::MatchedReductionCaptures;
pub use cpu::common::{
    BlockDistributor, CommonTrailing, ForallBlockDistribution, ReductionMatch, TrailingFinalizer,
};
pub use cpu::reduction::{ReductionConfig, ReductionStrategy, build_reduction_strategy, reduction_config};
pub use error::StrategyError;
pub use transform::{Directive, FailurePropagation, Handle, ScriptBuilder};
