//! Directive definitions for transform scripts.
//!
//! Each directive is a plain value describing one transformation the host
//! interpreter will perform: matching, tiling, fusion or cleanup. The
//! `Display` form is a stable one-line rendering used in diagnostics and
//! tests.

use std::fmt;

use smallvec::SmallVec;

use super::Handle;

/// Failure mode of a match directive at interpretation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePropagation {
    /// A failed match aborts the whole script. Used when the match is known
    /// to apply (it already triggered strategy selection) and a mismatch is
    /// a logic error to surface, not a case to recover from.
    Propagate,
    /// A failed match is silently skipped.
    Suppress,
}

impl fmt::Display for FailurePropagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propagate => write!(f, "propagate"),
            Self::Suppress => write!(f, "suppress"),
        }
    }
}

/// One transformation step in a transform script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Register the named match callbacks with the interpreter.
    RegisterMatchCallbacks,
    /// Invoke a registered match callback over `operand`, binding
    /// `results` to the matched ops.
    MatchCallback {
        name: &'static str,
        propagation: FailurePropagation,
        operand: Handle,
        results: SmallVec<[Handle; 4]>,
    },
    /// Tile `target` onto a parallel `forall` loop nest with the given
    /// per-dimension thread counts. Produces the loop and the tiled op.
    TileToForall {
        target: Handle,
        num_threads: SmallVec<[usize; 4]>,
        forall: Handle,
        tiled: Handle,
    },
    /// Fuse `producer` into the `containing` forall loop, producing the
    /// fused copy.
    FuseIntoForall { producer: Handle, containing: Handle, fused: Handle },
    /// Tile `target` into a sequential loop nest and fuse its producers.
    ///
    /// A tile size of 0 leaves that dimension untiled. `interchange` is a
    /// loop permutation; empty means identity order. One loop handle is
    /// produced per tiled (nonzero) dimension.
    TileFuseToScfFor {
        target: Handle,
        tile_sizes: SmallVec<[usize; 4]>,
        interchange: SmallVec<[usize; 4]>,
        loops: SmallVec<[Handle; 4]>,
        tiled: Handle,
    },
    /// Apply canonicalization patterns to everything under `target`.
    Canonicalize { target: Handle },
    /// Eliminate common subexpressions under `target`.
    Cse { target: Handle },
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegisterMatchCallbacks => write!(f, "register_match_callbacks"),
            Self::MatchCallback { name, propagation, operand, results } => {
                write!(f, "match_callback(\"{name}\", {propagation}, {operand}) -> ")?;
                write_list(f, results)
            }
            Self::TileToForall { target, num_threads, forall, tiled } => {
                write!(f, "tile_to_forall({target}, num_threads=")?;
                write_list(f, num_threads)?;
                write!(f, ") -> ({forall}, {tiled})")
            }
            Self::FuseIntoForall { producer, containing, fused } => {
                write!(f, "fuse_into_forall({producer}, {containing}) -> {fused}")
            }
            Self::TileFuseToScfFor { target, tile_sizes, interchange, loops, tiled } => {
                write!(f, "tile_fuse_to_scf_for({target}, sizes=")?;
                write_list(f, tile_sizes)?;
                if !interchange.is_empty() {
                    write!(f, ", interchange=")?;
                    write_list(f, interchange)?;
                }
                write!(f, ") -> (")?;
                write_list(f, loops)?;
                write!(f, ", {tiled})")
            }
            Self::Canonicalize { target } => write!(f, "canonicalize({target})"),
            Self::Cse { target } => write!(f, "cse({target})"),
        }
    }
}
