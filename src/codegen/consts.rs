//! Constant values that are compiled with chunks

use core::mem;
use crate::runtime::{Value, Heap};
use crate::runtime::gc::{Trace, Marker, HeapLease};
use crate::codegen::array::DynArray;


pub type ConstIndex = usize;


#[derive(Debug, Default)]
pub struct ConstantPool {
    values: DynArray<Value>,
    lease: Option<HeapLease>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self { values: DynArray::new(), lease: None }
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn get(&self, index: ConstIndex) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item=&Value> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[Value] { self.values.as_slice() }

    /// Append `value` and return its index. Values are never deduplicated.
    ///
    /// Growing the pool is reported to `heap` and may run a collection, `value` is
    /// rooted for the whole insertion so it survives that even if nothing else
    /// references it yet. Once stored it stays pinned in `heap` until the pool is dropped.
    /// A pool must always be used with the same heap.
    pub fn add(&mut self, heap: &mut Heap, value: Value) -> ConstIndex {
        let lease = self.lease.get_or_insert_with(|| heap.lease());
        debug_assert!(heap.owns_lease(lease), "constant pool used with a different heap");

        let mut heap = heap.root(value);

        if let Some(capacity) = self.values.pending_growth() {
            let bytes = (capacity - self.values.capacity()) * mem::size_of::<Value>();
            lease.add_bytes(bytes);
            // values already in the pool are pinned
            heap.account(bytes, &());
        }

        let index = self.values.len();
        self.values.push(value);
        heap.pin(value);
        index
    }
}

impl Drop for ConstantPool {
    fn drop(&mut self) {
        if let Some(lease) = self.lease.take() {
            lease.release(self.values.iter().filter_map(Value::as_obj));
        }
    }
}

impl Trace for ConstantPool {
    fn trace(&self, marker: &mut Marker<'_>) {
        self.values.trace(marker)
    }
}
