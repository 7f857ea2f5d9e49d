//! Script builder accumulating transformation directives.

use smallvec::SmallVec;

use super::{Directive, FailurePropagation, Handle};

/// Builder for a linear transform script.
///
/// Owns the growing directive list and the handle counter. Handle 0 always
/// refers to the top-level program region the script runs against; every
/// other handle is allocated by the directive that produces it.
///
/// The builder holds no other state: each emission against it is an
/// independent, append-only construction, and the directive list is the
/// output artifact.
#[derive(Debug)]
pub struct ScriptBuilder {
    directives: Vec<Directive>,
    next_handle: u32,
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptBuilder {
    /// Create an empty script with the top-level program handle allocated.
    pub fn new() -> Self {
        Self { directives: Vec::new(), next_handle: 1 }
    }

    /// Handle of the top-level program region.
    pub fn program(&self) -> Handle {
        Handle(0)
    }

    fn fresh(&mut self) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Append a directive registering the match callbacks with the
    /// interpreter. Must precede any [`Self::match_callback`].
    pub fn register_match_callbacks(&mut self) {
        self.directives.push(Directive::RegisterMatchCallbacks);
    }

    /// Append a match-callback invocation over `operand`, yielding
    /// `num_results` handles bound to the matched ops.
    pub fn match_callback(
        &mut self,
        name: &'static str,
        propagation: FailurePropagation,
        operand: Handle,
        num_results: usize,
    ) -> SmallVec<[Handle; 4]> {
        let results: SmallVec<[Handle; 4]> = (0..num_results).map(|_| self.fresh()).collect();
        self.directives.push(Directive::MatchCallback { name, propagation, operand, results: results.clone() });
        results
    }

    /// Append a tile-to-forall directive, returning the forall loop handle
    /// and the tiled op handle.
    pub fn tile_to_forall(&mut self, target: Handle, num_threads: &[usize]) -> (Handle, Handle) {
        let forall = self.fresh();
        let tiled = self.fresh();
        self.directives.push(Directive::TileToForall {
            target,
            num_threads: SmallVec::from_slice(num_threads),
            forall,
            tiled,
        });
        (forall, tiled)
    }

    /// Append a fuse-into-forall directive, returning the fused op handle.
    pub fn fuse_into_forall(&mut self, producer: Handle, containing: Handle) -> Handle {
        let fused = self.fresh();
        self.directives.push(Directive::FuseIntoForall { producer, containing, fused });
        fused
    }

    /// Append a tile-and-fuse-to-sequential-loop directive.
    ///
    /// A tile size of 0 leaves that dimension untiled; one loop handle is
    /// allocated per nonzero tile size. An empty `interchange` keeps the
    /// identity loop order. Returns the tiled op handle.
    pub fn tile_fuse_to_scf_for(
        &mut self,
        target: Handle,
        tile_sizes: impl IntoIterator<Item = usize>,
        interchange: &[usize],
    ) -> Handle {
        let tile_sizes: SmallVec<[usize; 4]> = tile_sizes.into_iter().collect();
        let loops: SmallVec<[Handle; 4]> =
            tile_sizes.iter().filter(|&&size| size != 0).map(|_| self.fresh()).collect();
        let tiled = self.fresh();
        self.directives.push(Directive::TileFuseToScfFor {
            target,
            tile_sizes,
            interchange: SmallVec::from_slice(interchange),
            loops,
            tiled,
        });
        tiled
    }

    /// Append a canonicalization directive over `target`.
    pub fn canonicalize(&mut self, target: Handle) {
        self.directives.push(Directive::Canonicalize { target });
    }

    /// Append a common-subexpression-elimination directive over `target`.
    pub fn cse(&mut self, target: Handle) {
        self.directives.push(Directive::Cse { target });
    }

    /// Directives appended so far, in emission order.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Consume the builder, yielding the finished script.
    pub fn into_directives(self) -> Vec<Directive> {
        self.directives
    }
}
