//! In-memory document model
//!
//! - `object`: geometric objects and their append-only store
//! - `variable`: typed variable bindings and their store

pub mod object;
pub mod variable;

pub use object::*;
pub use variable::*;
