use core::fmt;
use static_assertions::const_assert_eq;
use crate::utils;
use crate::runtime::gc::{GcRef, Heap, Obj, Trace, Marker};


// values are copied around a lot by the VM, keep them at two words
const_assert_eq!(core::mem::size_of::<Value>(), 16);

// Fundamental data value type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Obj(GcRef),
}

impl Default for Value {
    fn default() -> Self { Self::Nil }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Self::Bool(value) }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Self::Number(value) }
}

impl From<GcRef> for Value {
    fn from(gc: GcRef) -> Self { Self::Obj(gc) }
}

impl Value {
    pub fn as_obj(&self) -> Option<GcRef> {
        match self {
            Self::Obj(gc) => Some(*gc),
            _ => None,
        }
    }

    /// Format a value, resolving heap objects through `heap` if one is given.
    pub fn display<'a>(&'a self, heap: Option<&'a Heap>) -> ValueDisplay<'a> {
        ValueDisplay { value: self, heap, maxlen: None }
    }
}

impl Trace for Value {
    #[inline]
    fn trace(&self, marker: &mut Marker<'_>) {
        if let Self::Obj(gc) = self {
            marker.mark(*gc)
        }
    }
}


pub struct ValueDisplay<'a> {
    value: &'a Value,
    heap: Option<&'a Heap>,
    maxlen: Option<usize>,
}

impl ValueDisplay<'_> {
    /// Trim string objects longer than `maxlen` characters
    pub fn trimmed(mut self, maxlen: usize) -> Self {
        self.maxlen.replace(maxlen); self
    }
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Nil => fmt.write_str("nil"),
            Value::Bool(true) => fmt.write_str("true"),
            Value::Bool(false) => fmt.write_str("false"),
            Value::Number(value) => write!(fmt, "{}", value),
            Value::Obj(gc) => match self.heap.and_then(|heap| heap.get(*gc)) {
                Some(Obj::String(string)) => match self.maxlen {
                    Some(maxlen) => write!(fmt, "\"{}\"", utils::trim_str(string, maxlen)),
                    None => write!(fmt, "\"{}\"", string),
                },
                None => write!(fmt, "<obj {}>", gc),
            },
        }
    }
}
