use crate::codegen::array::DynArray;


/// The raw instruction stream of a chunk
#[derive(Debug, Default, Clone)]
pub struct InstructionBuffer {
    bytes: DynArray<u8>,
}

impl InstructionBuffer {
    pub fn new() -> Self {
        Self { bytes: DynArray::new() }
    }

    pub fn len(&self) -> usize { self.bytes.len() }

    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    pub fn capacity(&self) -> usize { self.bytes.capacity() }

    pub fn as_slice(&self) -> &[u8] { self.bytes.as_slice() }

    pub fn get(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    // using Into<u8> so that OpCodes can be accepted without extra fuss
    pub fn push(&mut self, byte: impl Into<u8>) {
        self.bytes.push(byte.into());
    }
}
