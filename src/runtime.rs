mod value;
pub use value::{Value, ValueDisplay};

pub mod gc;
pub use gc::{Heap, GcConfig, GcRef, GcStats, Obj, Trace, Marker, RootGuard, HeapLease};

mod tests;


// Default Hasher

pub type DefaultBuildHasher = ahash::RandomState;
