use crate::codegen::array::DynArray;


pub type LineNumber = u32;

/// `len` consecutive bytes of bytecode that were all generated from `line`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRun {
    pub line: LineNumber,
    pub len: usize,
}

impl From<(LineNumber, usize)> for LineRun {
    fn from((line, len): (LineNumber, usize)) -> Self {
        Self { line, len }
    }
}


// Maps each byte of a chunk's bytecode to the source line it came from.
// Should receive one line for each byte in the associated InstructionBuffer,
// in the same order. Stored using run length encoding.
#[derive(Debug, Default, Clone)]
pub struct LineTable {
    runs: DynArray<LineRun>,
}

impl LineTable {
    pub fn new() -> Self {
        Self { runs: DynArray::new() }
    }

    /// Only extends the most recent run, equal lines that are not adjacent get separate runs.
    pub fn record(&mut self, line: LineNumber) {
        match self.runs.last_mut() {
            Some(run) if run.line == line => run.len += 1,
            _ => self.runs.push(LineRun { line, len: 1 }),
        }
    }

    /// The source line for the byte at `offset`, or `None` if it is past the end of the chunk.
    pub fn line_at(&self, offset: usize) -> Option<LineNumber> {
        let mut end = 0;
        for run in self.runs.iter() {
            end += run.len;
            if offset < end {
                return Some(run.line);
            }
        }
        None
    }

    pub fn runs(&self) -> &[LineRun] { self.runs.as_slice() }

    /// Number of bytes covered by the table
    pub fn total_len(&self) -> usize {
        self.runs.iter().map(|run| run.len).sum()
    }

    /// One line for each byte
    pub fn iter(&self) -> impl Iterator<Item=LineNumber> + '_ {
        self.runs.iter().flat_map(
            |run| std::iter::repeat(run.line).take(run.len)
        )
    }
}
