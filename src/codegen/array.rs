use core::ops::Deref;
use crate::runtime::gc::{Trace, Marker};


/// Smallest non-zero capacity of a `DynArray`
pub const MIN_CAPACITY: usize = 8;

/// Capacity to grow to when an array holding `capacity` items is full
#[inline]
pub fn grow_capacity(capacity: usize) -> usize {
    if capacity < MIN_CAPACITY { MIN_CAPACITY } else { capacity * 2 }
}


/// Append-only growable array with an explicit doubling policy.
///
/// `Vec` leaves its growth strategy unspecified, this requests `grow_capacity()` items
/// whenever the array is full so callers can tell when a push will reallocate and report
/// that allocation ahead of time. The allocator may still hand back a larger capacity,
/// `pending_growth()` always works from the capacity actually held.
#[derive(Debug, Clone)]
pub struct DynArray<T> {
    items: Vec<T>,
}

impl<T> Default for DynArray<T> {
    fn default() -> Self { Self::new() }
}

impl<T> DynArray<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize { self.items.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    #[inline]
    pub fn capacity(&self) -> usize { self.items.capacity() }

    pub fn as_slice(&self) -> &[T] { self.items.as_slice() }

    pub fn last_mut(&mut self) -> Option<&mut T> { self.items.last_mut() }

    /// The capacity the array will grow to on the next push, if that push needs to reallocate.
    pub fn pending_growth(&self) -> Option<usize> {
        if self.items.len() < self.items.capacity() {
            None
        } else {
            Some(grow_capacity(self.items.capacity()))
        }
    }

    pub fn push(&mut self, item: T) {
        if let Some(capacity) = self.pending_growth() {
            self.grow_to(capacity);
        }
        self.items.push(item);
    }

    fn grow_to(&mut self, capacity: usize) {
        log::trace!(
            "grow {} array: {} -> {} items",
            core::any::type_name::<T>(), self.items.capacity(), capacity,
        );
        self.items.reserve_exact(capacity - self.items.len());
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] { self.items.as_slice() }
}

impl<T> Trace for DynArray<T> where T: Trace {
    fn trace(&self, marker: &mut Marker<'_>) {
        self.items.trace(marker)
    }
}
