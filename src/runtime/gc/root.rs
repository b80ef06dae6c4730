use core::ops::{Deref, DerefMut};
use crate::runtime::Value;
use crate::runtime::gc::Heap;


/// Keeps a value alive across any collection that happens while the guard is held.
///
/// The guard borrows the heap mutably and derefs to it, so allocations can be made
/// through the guard. Nested guards are released in the reverse order they were
/// taken, which the borrow checker enforces. The root is released when the guard
/// is dropped, including during unwinding.
pub struct RootGuard<'h> {
    heap: &'h mut Heap,
    depth: usize,
}

impl<'h> RootGuard<'h> {
    pub(super) fn new(heap: &'h mut Heap, value: Value) -> Self {
        heap.roots.push(value);
        let depth = heap.roots.len();
        Self { heap, depth }
    }
}

impl Deref for RootGuard<'_> {
    type Target = Heap;

    #[inline]
    fn deref(&self) -> &Heap { self.heap }
}

impl DerefMut for RootGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Heap { self.heap }
}

impl Drop for RootGuard<'_> {
    fn drop(&mut self) {
        debug_assert!(self.heap.roots.len() == self.depth);
        self.heap.roots.truncate(self.depth - 1);
    }
}
