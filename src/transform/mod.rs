//! Transform-script model.
//!
//! A strategy does not rewrite the target program directly. It appends
//! [`Directive`] values to a [`ScriptBuilder`]; the resulting linear script
//! is handed to the host's transform interpreter, which executes it and
//! reports any failure. Program regions are referenced through opaque
//! [`Handle`]s allocated by the builder and never dereferenced here.

pub mod directive;
pub mod script;

pub use directive::{Directive, FailurePropagation};
pub use script::ScriptBuilder;

use std::fmt;

/// Opaque reference to a region of the target program.
///
/// Handles are produced by directives (match results, tiled ops, generated
/// loops) and consumed by later directives. Only the interpreter resolves
/// them to actual program regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub(crate) u32);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}
