use core::cell::RefCell;
use std::rc::Rc;
use crate::runtime::gc::{GcRef, Released};


/// Tracks what a container has taken from a `Heap`: storage bytes it reported
/// through `Heap::account()` and values it pinned. Both are handed back when the
/// lease is released, which a container does when it is dropped.
#[derive(Debug)]
pub struct HeapLease {
    released: Rc<RefCell<Released>>,
    bytes: usize,
}

impl HeapLease {
    pub(super) fn new(released: Rc<RefCell<Released>>) -> Self {
        Self { released, bytes: 0 }
    }

    pub(super) fn is_from(&self, released: &Rc<RefCell<Released>>) -> bool {
        Rc::ptr_eq(&self.released, released)
    }

    pub fn bytes(&self) -> usize { self.bytes }

    pub(crate) fn add_bytes(&mut self, bytes: usize) {
        self.bytes += bytes;
    }

    pub(crate) fn release(self, pinned: impl Iterator<Item=GcRef>) {
        let mut released = self.released.borrow_mut();
        released.bytes += self.bytes;
        released.unpinned.extend(pinned);
    }
}
