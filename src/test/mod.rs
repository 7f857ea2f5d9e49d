//! Crate-level test support.
