//! Bytecode output of the compiler.
//!
//! A `Chunk` is written once, sequentially, while a unit is being compiled and read
//! many times afterwards by the VM and by diagnostics.

pub mod array;
pub mod code;
pub mod lines;
pub mod consts;
pub mod chunk;
pub mod opcodes;
pub mod errors;

pub use opcodes::OpCode;
pub use code::InstructionBuffer;
pub use lines::{LineTable, LineRun, LineNumber};
pub use consts::{ConstantPool, ConstIndex};
pub use chunk::{Chunk, MAX_SHORT_INDEX, MAX_LONG_INDEX};
pub use errors::{ChunkResult, ChunkError, ErrorKind};
