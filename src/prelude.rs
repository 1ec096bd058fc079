//! Derive macros shared by the crate's value types.

pub use derive_more::Display;
