//! Compiled bytecode chunks for a Lox virtual machine.
//!
//! A [`Chunk`] holds the instruction stream of one compiled unit together with a
//! run-length encoded table mapping each byte back to its source line, and the
//! constant pool its load instructions refer to. Constants are inserted through
//! a [`Heap`] so that values only reachable from the insertion in progress are
//! not collected if growing the pool triggers a collection.

pub mod utils;

pub mod runtime;
pub mod codegen;
pub mod debug;


pub use runtime::{Value, Heap, GcConfig, GcRef};
pub use codegen::{Chunk, OpCode, ConstIndex, LineNumber, ChunkError, ChunkResult};
