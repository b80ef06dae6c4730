use std::fmt;
use std::fmt::{Write, Formatter};

use crate::runtime::Heap;
use crate::codegen::{Chunk, OpCode, ConstIndex};


// string constants longer than this are trimmed
const MAX_STR_LEN: usize = 16;

pub struct Disassembler<'c, 'h> {
    chunk: &'c Chunk,
    name: Option<&'c str>,
    heap: Option<&'h Heap>,
}

impl<'c, 'h> Disassembler<'c, 'h> {
    pub fn new(chunk: &'c Chunk) -> Self {
        Self { chunk, name: None, heap: None }
    }

    pub fn with_name(mut self, name: &'c str) -> Self {
        self.name.replace(name); self
    }

    /// Without a heap, object constants are shown by handle only
    pub fn with_heap(mut self, heap: &'h Heap) -> Self {
        self.heap.replace(heap); self
    }

    fn decode_chunk(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name {
            writeln!(fmt, "== {} ==", name)?;
        }

        let mut offset = 0;
        while offset < self.chunk.len() {
            offset = self.decode_instr(fmt, offset)?;
        }
        Ok(())
    }

    // write one instruction, returning the offset of the next
    fn decode_instr(&self, fmt: &mut impl fmt::Write, offset: usize) -> Result<usize, fmt::Error> {
        let mut line = String::new();

        write!(line, "{:04} ", offset)?;

        let lineno = self.chunk.line_at(offset);
        if offset > 0 && lineno == self.chunk.line_at(offset - 1) {
            line.push_str("   | ");
        } else {
            match lineno {
                Some(lineno) => write!(line, "{:4} ", lineno)?,
                None => line.push_str("   ? "),
            }
        }

        let byte = self.chunk.code()[offset];
        let opcode = OpCode::from_byte(byte);
        let next = match opcode {
            Some(opcode @ (OpCode::Constant | OpCode::ConstantLong)) => {
                match self.chunk.read_constant(offset) {
                    Some((index, len)) => {
                        write!(line, "{:16} {: >4} ", opcode, index)?;
                        self.write_const(&mut line, index)?;
                        offset + len
                    },
                    None => {
                        write!(line, "{:16} <truncated>", opcode)?;
                        self.chunk.len()
                    },
                }
            },
            Some(opcode) => {
                write!(line, "{}", opcode)?;
                offset + opcode.instr_len()
            },
            None => {
                write!(line, "Unknown! {:#x}", byte)?;
                offset + 1
            },
        };

        writeln!(fmt, "{}", line.trim_end())?;

        Ok(next)
    }

    fn write_const(&self, fmt: &mut impl fmt::Write, index: ConstIndex) -> fmt::Result {
        match self.chunk.constant(index) {
            Some(value) => write!(fmt, "'{}'", value.display(self.heap).trimmed(MAX_STR_LEN)),
            None => write!(fmt, "<missing>"),
        }
    }
}

impl fmt::Display for Disassembler<'_, '_> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        self.decode_chunk(fmt)
    }
}
