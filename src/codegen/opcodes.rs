// Opcodes

// Rust enums are not like C enums! They're more like unions.
// So if we want to convert between them and integer constants easily,
// we need to explictly define each value as a const

// 0x00         Constants and literals

                        // width set here so that the longest mnemonic is 16 chars
const OP_CONSTANT:      u8 = 0x00;  // load a constant from the chunk's const pool
const OP_CONSTANT_LONG: u8 = 0x01;  // ...using a 24-bit index
const OP_NIL:           u8 = 0x02;
const OP_TRUE:          u8 = 0x03;
const OP_FALSE:         u8 = 0x04;
const OP_POP:           u8 = 0x05;

// 0x10         Comparison

const OP_EQUAL:         u8 = 0x10;
const OP_GREATER:       u8 = 0x11;
const OP_LESS:          u8 = 0x12;

// 0x20         Arithmetic and logic

const OP_ADD:           u8 = 0x20;
const OP_SUBTRACT:      u8 = 0x21;
const OP_MULTIPLY:      u8 = 0x22;
const OP_DIVIDE:        u8 = 0x23;
const OP_NOT:           u8 = 0x24;
const OP_NEGATE:        u8 = 0x25;

// 0x30         Statements and control

const OP_PRINT:         u8 = 0x30;
const OP_RETURN:        u8 = 0x31;


#[repr(u8)]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum OpCode {
    Constant = OP_CONSTANT,
    ConstantLong = OP_CONSTANT_LONG,
    Nil = OP_NIL,
    True = OP_TRUE,
    False = OP_FALSE,
    Pop = OP_POP,

    Equal = OP_EQUAL,
    Greater = OP_GREATER,
    Less = OP_LESS,

    Add = OP_ADD,
    Subtract = OP_SUBTRACT,
    Multiply = OP_MULTIPLY,
    Divide = OP_DIVIDE,
    Not = OP_NOT,
    Negate = OP_NEGATE,

    Print = OP_PRINT,
    Return = OP_RETURN,
}

impl OpCode {
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        let opcode = match byte {
            OP_CONSTANT => Self::Constant,
            OP_CONSTANT_LONG => Self::ConstantLong,
            OP_NIL => Self::Nil,
            OP_TRUE => Self::True,
            OP_FALSE => Self::False,
            OP_POP => Self::Pop,

            OP_EQUAL => Self::Equal,
            OP_GREATER => Self::Greater,
            OP_LESS => Self::Less,

            OP_ADD => Self::Add,
            OP_SUBTRACT => Self::Subtract,
            OP_MULTIPLY => Self::Multiply,
            OP_DIVIDE => Self::Divide,
            OP_NOT => Self::Not,
            OP_NEGATE => Self::Negate,

            OP_PRINT => Self::Print,
            OP_RETURN => Self::Return,

            _ => return None,
        };
        Some(opcode)
    }

    /// Length of the whole instruction, opcode included
    pub fn instr_len(&self) -> usize {
        match self {
            Self::Constant => 2,
            Self::ConstantLong => 4,
            _ => 1,
        }
    }
}

impl From<OpCode> for u8 {
    fn from(opcode: OpCode) -> Self { opcode as u8 }
}

impl PartialEq<u8> for OpCode {
    fn eq(&self, other: &u8) -> bool { *other == (*self).into() }
}

// For disassembly/debugging
impl std::fmt::Display for OpCode {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = match *self {
            Self::Constant => "OP_CONSTANT",
            Self::ConstantLong => "OP_CONSTANT_LONG",
            Self::Nil => "OP_NIL",
            Self::True => "OP_TRUE",
            Self::False => "OP_FALSE",
            Self::Pop => "OP_POP",

            Self::Equal => "OP_EQUAL",
            Self::Greater => "OP_GREATER",
            Self::Less => "OP_LESS",

            Self::Add => "OP_ADD",
            Self::Subtract => "OP_SUBTRACT",
            Self::Multiply => "OP_MULTIPLY",
            Self::Divide => "OP_DIVIDE",
            Self::Not => "OP_NOT",
            Self::Negate => "OP_NEGATE",

            Self::Print => "OP_PRINT",
            Self::Return => "OP_RETURN",
        };

        if let Some(width) = fmt.width() {
            write!(fmt, "{:1$}", mnemonic, width)
        } else {
            fmt.write_str(mnemonic)
        }
    }
}
