use std::fmt;
use std::error::Error;

use crate::utils;
use crate::codegen::lines::LineNumber;


pub type ErrorKind = ChunkErrorKind;
pub type ChunkResult<T> = Result<T, ChunkError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkErrorKind {
    // more constants than OP_CONSTANT_LONG can address
    ConstPoolLimit,
}

#[derive(Debug)]
pub struct ChunkError {
    kind: ErrorKind,
    line: Option<LineNumber>,
}

impl ChunkError {
    pub fn with_line(mut self, line: LineNumber) -> Self {
        self.line.replace(line); self
    }

    pub fn kind(&self) -> &ErrorKind { &self.kind }

    pub fn line(&self) -> Option<LineNumber> { self.line }
}

impl From<ErrorKind> for ChunkError {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, line: None }
    }
}

impl Error for ChunkError { }

impl fmt::Display for ChunkError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let message = match self.kind() {
            ErrorKind::ConstPoolLimit => "constant pool limit reached",
        };

        match self.line {
            Some(line) => {
                let title = format!("[line {}] chunk error", line);
                utils::format_error(fmt, &title, Some(message), self.source())
            },
            None => utils::format_error(fmt, "chunk error", Some(message), self.source()),
        }
    }
}
