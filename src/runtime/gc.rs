use core::fmt;
use core::mem;
use core::cell::RefCell;
use std::rc::Rc;
use std::collections::HashMap;

use crate::runtime::{Value, DefaultBuildHasher};

mod trace;
mod root;
mod lease;

pub use trace::{Trace, Marker};
pub use root::RootGuard;
pub use lease::HeapLease;


/// Handle to an object allocated in a `Heap`.
/// Slots are reused after a collection, but each reuse bumps the slot's generation,
/// so a handle to a collected object stops resolving instead of aliasing its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GcRef {
    index: u32,
    generation: u32,
}

impl GcRef {
    #[inline]
    pub(crate) fn index(&self) -> usize { self.index as usize }
}

impl fmt::Display for GcRef {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "#{}", self.index)?;
        if self.generation > 0 {
            write!(fmt, ".{}", self.generation)?;
        }
        Ok(())
    }
}


/// Heap allocated objects
#[derive(Debug)]
pub enum Obj {
    String(Box<str>),
}

impl Obj {
    fn size(&self) -> usize {
        let extra = match self {
            Self::String(string) => string.len(),
        };
        mem::size_of::<Slot>() + extra
    }
}

#[derive(Debug)]
pub(crate) struct Slot {
    obj: Obj,
    generation: u32,
    pins: u32,
    marked: bool,
}


#[derive(Debug, Clone)]
pub struct GcConfig {
    pub threshold: usize,   // bytes allocated before the first cycle
    pub pause_factor: u16,  // percent memory use relative to last cycle before starting a new cycle
    pub stress: bool,       // collect on every allocation
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            threshold: 1024,
            pause_factor: 200,
            stress: false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GcStats {
    pub allocated: usize,
    pub object_count: usize,
    pub cycle_count: usize,
}

impl fmt::Display for GcStats {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt, "Cycle {}: estimated usage {}u ({} objects)",
            self.cycle_count, self.allocated, self.object_count
        )
    }
}


// What dropped leases have handed back since the heap last looked
#[derive(Debug, Default)]
pub(crate) struct Released {
    bytes: usize,
    unpinned: Vec<GcRef>,
}


/// Mark-and-sweep object heap.
///
/// Anything that allocates (directly, or by reporting growth through `account()`) may
/// trigger a collection. Roots are the values registered with `root()`, the objects
/// pinned by live constant pools, and whatever is passed in as `roots` by the
/// allocating caller.
pub struct Heap {
    config: GcConfig,
    stats: GcStats,
    threshold: usize,
    slots: Vec<Option<Slot>>,
    free: Vec<(u32, u32)>,  // (index, generation of the next occupant)
    strings: HashMap<Box<str>, GcRef, DefaultBuildHasher>,
    roots: Vec<Value>,
    released: Rc<RefCell<Released>>,
}

impl Default for Heap {
    fn default() -> Self {
        Heap::new(GcConfig::default())
    }
}

impl Heap {
    pub fn new(config: GcConfig) -> Self {
        let threshold = config.threshold;
        Self {
            config,
            threshold,
            stats: GcStats::default(),
            slots: Vec::new(),
            free: Vec::new(),
            strings: HashMap::default(),
            roots: Vec::new(),
            released: Rc::new(RefCell::new(Released::default())),
        }
    }

    pub fn config(&self) -> &GcConfig { &self.config }

    /// Memory released by dropped leases is only counted once the heap
    /// next accounts or collects.
    pub fn stats(&self) -> GcStats { self.stats }

    pub fn object_count(&self) -> usize { self.stats.object_count }

    /// Number of values currently protected by a `RootGuard`
    pub fn rooted_count(&self) -> usize { self.roots.len() }

    fn slot(&self, gc: GcRef) -> Option<&Slot> {
        self.slots.get(gc.index())
            .and_then(Option::as_ref)
            .filter(|slot| slot.generation == gc.generation)
    }

    pub fn get(&self, gc: GcRef) -> Option<&Obj> {
        self.slot(gc).map(|slot| &slot.obj)
    }

    pub fn is_live(&self, gc: GcRef) -> bool {
        self.slot(gc).is_some()
    }

    pub fn as_str(&self, gc: GcRef) -> Option<&str> {
        match self.get(gc)? {
            Obj::String(string) => Some(&**string),
        }
    }

    /// Protect `value` from collection until the returned guard is dropped.
    pub fn root(&mut self, value: Value) -> RootGuard<'_> {
        RootGuard::new(self, value)
    }

    /// A lease lets a long lived container pin values and report its own storage.
    /// Whatever it holds is handed back to the heap when the lease is released.
    pub fn lease(&self) -> HeapLease {
        HeapLease::new(Rc::clone(&self.released))
    }

    pub(crate) fn owns_lease(&self, lease: &HeapLease) -> bool {
        lease.is_from(&self.released)
    }

    /// Keep the object behind `value` alive until it is unpinned by a released lease.
    pub(crate) fn pin(&mut self, value: Value) {
        if let Some(gc) = value.as_obj() {
            if let Some(Some(slot)) = self.slots.get_mut(gc.index()) {
                if slot.generation == gc.generation {
                    slot.pins += 1;
                }
            }
        }
    }

    /// Get or allocate an interned string. May collect, `roots` are kept alive.
    pub fn intern(&mut self, string: &str, roots: &dyn Trace) -> GcRef {
        if let Some(gc) = self.strings.get(string) {
            return *gc;
        }

        let gc = self.allocate(Obj::String(string.into()), roots);
        self.strings.insert(string.into(), gc);
        gc
    }

    /// Allocate a new object. The object itself is not rooted once this returns.
    pub fn allocate(&mut self, obj: Obj, roots: &dyn Trace) -> GcRef {
        let size = obj.size();
        self.account(size, roots);

        let gc = match self.free.pop() {
            Some((index, generation)) => GcRef { index, generation },
            None => {
                let index = u32::try_from(self.slots.len())
                    .unwrap_or_else(|_| panic!("heap exhausted: too many objects"));
                self.slots.push(None);
                GcRef { index, generation: 0 }
            },
        };

        self.slots[gc.index()] = Some(Slot {
            obj,
            generation: gc.generation,
            pins: 0,
            marked: false,
        });

        self.stats.object_count += 1;
        log::trace!("{} allocate {} bytes", gc, size);
        gc
    }

    /// Record `bytes` of new memory use and run a collection if one is due.
    /// Growable buffers holding values call this before they reallocate.
    pub fn account(&mut self, bytes: usize, roots: &dyn Trace) {
        self.drain_released();
        self.stats.allocated += bytes;
        if self.should_collect() {
            self.collect(roots);
        }
    }

    #[inline]
    fn should_collect(&self) -> bool {
        self.config.stress || self.stats.allocated > self.threshold
    }

    fn drain_released(&mut self) {
        let released = mem::take(&mut *self.released.borrow_mut());
        if released.bytes == 0 && released.unpinned.is_empty() {
            return;
        }

        log::debug!("Released {} bytes ({} pins)", released.bytes, released.unpinned.len());
        self.stats.allocated = self.stats.allocated.saturating_sub(released.bytes);

        for gc in released.unpinned.into_iter() {
            if let Some(Some(slot)) = self.slots.get_mut(gc.index()) {
                if slot.generation == gc.generation {
                    slot.pins = slot.pins.saturating_sub(1);
                }
            }
        }
    }

    pub fn collect(&mut self, roots: &dyn Trace) {
        log::debug!("GC cycle begin ---");
        self.drain_released();

        let allocated = self.stats.allocated;
        let object_count = self.stats.object_count;
        log::debug!("{}", self.stats);

        // mark
        let mut marker = Marker::new(&mut self.slots);
        marker.mark_pinned();
        for value in self.roots.iter() {
            value.trace(&mut marker);
        }
        roots.trace(&mut marker);
        log::debug!("Marked {} objects", marker.marked());

        // interned strings are weak
        self.strings.retain(|_, gc| marker.is_marked(*gc));

        // sweep
        self.sweep();
        self.stats.cycle_count = self.stats.cycle_count.wrapping_add(1);

        let freed = allocated - self.stats.allocated;
        let dropped = object_count - self.stats.object_count;
        log::debug!("Freed {} bytes ({} objects)", freed, dropped);
        log::debug!("{}", self.stats);

        let next = (self.stats.allocated * usize::from(self.config.pause_factor)) / 100;
        self.threshold = next.max(self.config.threshold);
        log::debug!("Next collection at {} bytes", self.threshold);

        log::debug!("GC cycle end ---");
    }

    fn sweep(&mut self) {
        for (index, entry) in self.slots.iter_mut().enumerate() {
            match entry {
                Some(slot) if slot.marked => slot.marked = false,

                Some(slot) => {
                    let size = slot.obj.size();
                    let gc = GcRef { index: index as u32, generation: slot.generation };
                    log::trace!("{} free {} bytes", gc, size);

                    self.free.push((gc.index, gc.generation.wrapping_add(1)));
                    *entry = None;
                    self.stats.allocated -= size;
                    self.stats.object_count -= 1;
                },

                None => { },
            }
        }
    }
}

impl fmt::Debug for Heap {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Heap")
            .field("stats", &self.stats)
            .field("threshold", &self.threshold)
            .field("roots", &self.roots.len())
            .finish()
    }
}
