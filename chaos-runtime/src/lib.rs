//! ChaosMeter Runtime - the sequential aggregation pipeline
//!
//! One pass per invocation: fetch every feed in turn, normalize the
//! harvest into factors, compute the index, synthesize the decorative
//! layers, assemble the snapshot, and write it atomically.

pub mod assemble;
pub mod decor;
pub mod output;
pub mod pipeline;

pub use assemble::*;
pub use decor::*;
pub use output::*;
pub use pipeline::*;
