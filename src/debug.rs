pub mod dasm;

pub use dasm::Disassembler;

mod tests;
