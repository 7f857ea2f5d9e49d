//! CPU codegen strategies.
//!
//! - [`reduction`] - Tiling/fusion strategy for trailing-axis reductions
//! - [`common`] - Steps shared across CPU strategies (block distribution,
//!   trailing cleanup), behind collaborator traits so tests can fake them

pub mod common;
pub mod reduction;

pub use common::{BlockDistributor, CommonTrailing, ForallBlockDistribution, ReductionMatch, TrailingFinalizer};
pub use reduction::{ReductionConfig, ReductionStrategy, build_reduction_strategy, reduction_config};
