use crate::runtime::{Value, Heap};
use crate::runtime::gc::{Trace, Marker};
use crate::codegen::OpCode;
use crate::codegen::code::InstructionBuffer;
use crate::codegen::lines::{LineTable, LineNumber};
use crate::codegen::consts::{ConstantPool, ConstIndex};
use crate::codegen::errors::{ChunkResult, ChunkError, ErrorKind};


/// Largest constant index that fits in an `OP_CONSTANT` operand
pub const MAX_SHORT_INDEX: ConstIndex = u8::MAX as ConstIndex;

/// Largest constant index that fits in the 24-bit `OP_CONSTANT_LONG` operand
pub const MAX_LONG_INDEX: ConstIndex = 0xFF_FFFF;


/// Bytecode, line information and constants for one compiled unit
#[derive(Debug)]
pub struct Chunk {
    code: InstructionBuffer,
    lines: LineTable,
    constants: ConstantPool,
    const_limit: usize,
}

impl Default for Chunk {
    fn default() -> Self { Self::new() }
}

impl Chunk {
    pub fn new() -> Self {
        Self {
            code: InstructionBuffer::new(),
            lines: LineTable::new(),
            constants: ConstantPool::new(),
            const_limit: MAX_LONG_INDEX + 1,
        }
    }

    /// Allow at most `limit` constants, capped at what `OP_CONSTANT_LONG` can address.
    pub fn with_const_limit(mut self, limit: usize) -> Self {
        self.const_limit = limit.min(MAX_LONG_INDEX + 1); self
    }

    // Bytes

    pub fn len(&self) -> usize { self.code.len() }

    pub fn is_empty(&self) -> bool { self.code.is_empty() }

    pub fn code(&self) -> &[u8] { self.code.as_slice() }

    pub fn instructions(&self) -> &InstructionBuffer { &self.code }

    pub fn emit_byte(&mut self, byte: impl Into<u8>, line: LineNumber) {
        self.code.push(byte);
        self.lines.record(line);
    }

    // Lines

    pub fn lines(&self) -> &LineTable { &self.lines }

    /// The source line for the byte at `offset`, `None` if there is no such byte
    pub fn line_at(&self, offset: usize) -> Option<LineNumber> {
        self.lines.line_at(offset)
    }

    // Constants

    pub fn constants(&self) -> &ConstantPool { &self.constants }

    pub fn constant(&self, index: ConstIndex) -> Option<&Value> {
        self.constants.get(index)
    }

    /// Insert a value into the constant pool without emitting any bytecode.
    /// Fails without inserting anything if the index could not be encoded.
    pub fn add_constant(&mut self, heap: &mut Heap, value: Value) -> ChunkResult<ConstIndex> {
        if self.constants.len() >= self.const_limit {
            return Err(ChunkError::from(ErrorKind::ConstPoolLimit));
        }
        Ok(self.constants.add(heap, value))
    }

    /// Insert a value into the constant pool and emit the instruction that loads it,
    /// choosing the short or long operand form depending on the new index.
    pub fn emit_constant(&mut self, heap: &mut Heap, value: Value, line: LineNumber) -> ChunkResult<ConstIndex> {
        let index = self.add_constant(heap, value)
            .map_err(|error| error.with_line(line))?;

        if let Ok(operand) = u8::try_from(index) {
            self.emit_byte(OpCode::Constant, line);
            self.emit_byte(operand, line);
        } else {
            if index == MAX_SHORT_INDEX + 1 {
                log::debug!("constant pool passed {} entries, switching to {}", index, OpCode::ConstantLong);
            }

            self.emit_byte(OpCode::ConstantLong, line);
            self.emit_byte((index & 0xFF) as u8, line);
            self.emit_byte(((index >> 8) & 0xFF) as u8, line);
            self.emit_byte(((index >> 16) & 0xFF) as u8, line);
        }

        Ok(index)
    }

    /// Decode a load-constant instruction at `offset`.
    /// Returns the constant index and the length of the instruction.
    pub fn read_constant(&self, offset: usize) -> Option<(ConstIndex, usize)> {
        let opcode = OpCode::from_byte(self.code.get(offset)?)?;
        match opcode {
            OpCode::Constant => {
                let index = self.code.get(offset + 1)?;
                Some((ConstIndex::from(index), opcode.instr_len()))
            },

            OpCode::ConstantLong => {
                let operand = self.code().get(offset + 1 .. offset + 4)?;
                let index = operand.iter().rev()
                    .fold(0, |index, byte| (index << 8) | ConstIndex::from(*byte));
                Some((index, opcode.instr_len()))
            },

            _ => None,
        }
    }
}

impl Trace for Chunk {
    fn trace(&self, marker: &mut Marker<'_>) {
        self.constants.trace(marker)
    }
}
