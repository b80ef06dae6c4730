use crate::runtime::gc::{GcRef, Slot};


/// Trait for anything that can hold references to heap objects.
/// If the `trace()` implementation fails to call `Marker::mark()` on every
/// `GcRef` it can reach, the GC will free objects that are still in use.
pub trait Trace {
    fn trace(&self, marker: &mut Marker<'_>);
}


/// Mark state for one collection cycle
pub struct Marker<'h> {
    slots: &'h mut [Option<Slot>],
    marked: usize,
}

impl<'h> Marker<'h> {
    pub(super) fn new(slots: &'h mut [Option<Slot>]) -> Self {
        Self { slots, marked: 0 }
    }

    pub fn mark(&mut self, gc: GcRef) {
        if let Some(Some(slot)) = self.slots.get_mut(gc.index()) {
            if slot.generation == gc.generation && !slot.marked {
                slot.marked = true;
                self.marked += 1;
            }
        }
    }

    // objects held by a constant pool are roots until the pool is dropped
    pub(super) fn mark_pinned(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            if slot.pins > 0 && !slot.marked {
                slot.marked = true;
                self.marked += 1;
            }
        }
    }

    pub fn is_marked(&self, gc: GcRef) -> bool {
        matches!(
            self.slots.get(gc.index()),
            Some(Some(slot)) if slot.generation == gc.generation && slot.marked
        )
    }

    pub fn marked(&self) -> usize { self.marked }
}


// nothing extra to keep alive
impl Trace for () {
    fn trace(&self, _marker: &mut Marker<'_>) { }
}

// Arrays
impl<T> Trace for [T] where T: Trace {
    fn trace(&self, marker: &mut Marker<'_>) {
        for item in self.iter() {
            item.trace(marker)
        }
    }
}

impl<T> Trace for Vec<T> where T: Trace {
    fn trace(&self, marker: &mut Marker<'_>) {
        self.as_slice().trace(marker)
    }
}
