#![cfg(test)]

use std::panic::{self, AssertUnwindSafe};
use test_log::test;
use crate::runtime::{Heap, GcConfig, Value};
use crate::codegen::ConstantPool;


fn stress_heap() -> Heap {
    Heap::new(GcConfig { stress: true, ..GcConfig::default() })
}

#[test]
fn gc_frees_unreachable_objects() {
    let mut heap = Heap::default();
    let gc = heap.intern("garbage", &());
    assert!(heap.is_live(gc));
    assert_eq!(heap.object_count(), 1);

    heap.collect(&());
    assert!(!heap.is_live(gc));
    assert_eq!(heap.object_count(), 0);
    assert_eq!(heap.stats().allocated, 0);
}

#[test]
fn gc_keeps_objects_reachable_from_roots() {
    let mut heap = Heap::default();
    let gc = heap.intern("kept", &());
    let roots = vec![ Value::from(gc) ];

    heap.collect(&roots);
    assert_eq!(heap.as_str(gc), Some("kept"));
}

#[test]
fn gc_interns_strings() {
    let mut heap = Heap::default();
    let first = heap.intern("name", &());
    let second = heap.intern("name", &());
    assert_eq!(first, second);
    assert_eq!(heap.object_count(), 1);

    // interned strings don't keep themselves alive
    heap.collect(&());
    let third = heap.intern("name", &());
    assert!(heap.is_live(third));
    assert_eq!(heap.object_count(), 1);
}

#[test]
fn gc_reuses_freed_slots() {
    let mut heap = Heap::default();
    let first = heap.intern("first", &());
    heap.collect(&());

    let second = heap.intern("second", &());
    assert_eq!(first.index(), second.index());
    assert_ne!(first, second);
    assert_eq!(heap.as_str(second), Some("second"));
}

#[test]
fn gc_stale_handle_does_not_resolve_to_new_object() {
    let mut heap = Heap::default();
    let stale = heap.intern("old", &());
    heap.collect(&());
    let fresh = heap.intern("new", &());

    assert_eq!(heap.as_str(stale), None);
    assert!(!heap.is_live(stale));
    assert_eq!(heap.as_str(fresh), Some("new"));

    // marking through a stale handle must not keep the new occupant alive
    let roots = vec![ Value::from(stale) ];
    heap.collect(&roots);
    assert!(!heap.is_live(fresh));
}

#[test]
fn pinned_objects_survive_until_lease_released() {
    let mut heap = Heap::default();
    let gc = heap.intern("pinned", &());

    let mut lease = heap.lease();
    heap.pin(Value::from(gc));
    lease.add_bytes(64);
    heap.account(64, &());

    heap.collect(&());
    assert!(heap.is_live(gc));

    lease.release(std::iter::once(gc));
    heap.collect(&());
    assert!(!heap.is_live(gc));
    assert_eq!(heap.stats().allocated, 0);
}

#[test]
fn root_guard_protects_value_during_collection() {
    let mut heap = Heap::default();
    let gc = heap.intern("rooted", &());

    {
        let mut guard = heap.root(Value::from(gc));
        assert_eq!(guard.rooted_count(), 1);
        guard.collect(&());
        assert!(guard.is_live(gc));
    }

    assert_eq!(heap.rooted_count(), 0);
    heap.collect(&());
    assert!(!heap.is_live(gc));
}

#[test]
fn root_guards_nest() {
    let mut heap = Heap::default();
    let a = heap.intern("a", &());
    let b = heap.intern("b", &());

    {
        let mut outer = heap.root(Value::from(a));
        {
            let mut inner = outer.root(Value::from(b));
            assert_eq!(inner.rooted_count(), 2);
            inner.collect(&());
        }
        assert_eq!(outer.rooted_count(), 1);
        outer.collect(&());
        assert!(outer.is_live(a));
        assert!(!outer.is_live(b));
    }
    assert_eq!(heap.rooted_count(), 0);
}

#[test]
fn root_guard_released_on_unwind() {
    let mut heap = Heap::default();
    let gc = heap.intern("unwound", &());

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard = heap.root(Value::from(gc));
        panic!("failed while rooted");
    }));

    assert!(result.is_err());
    assert_eq!(heap.rooted_count(), 0);
}

#[test]
fn const_pool_growth_does_not_collect_new_value() {
    let mut heap = stress_heap();
    let mut pool = ConstantPool::new();

    // nothing references this string except the insertion in progress
    let gc = heap.intern("constant", &pool);
    let index = pool.add(&mut heap, Value::from(gc));

    // the first insertion always grows the pool, which collects under stress
    assert_eq!(heap.stats().cycle_count, 2);
    assert_eq!(index, 0);
    assert_eq!(heap.as_str(gc), Some("constant"));
    assert_eq!(heap.rooted_count(), 0);
}

#[test]
fn const_pool_contents_survive_later_growth() {
    let mut heap = stress_heap();
    let mut pool = ConstantPool::new();

    let mut strings = Vec::new();
    for i in 0..17 {
        let gc = heap.intern(&i.to_string(), &pool);
        pool.add(&mut heap, Value::from(gc));
        strings.push(gc);
    }

    for (i, gc) in strings.iter().enumerate() {
        assert_eq!(heap.as_str(*gc), Some(i.to_string().as_str()));
    }
}

#[test]
fn gc_threshold_follows_pause_factor() {
    let config = GcConfig { threshold: 100, pause_factor: 200, stress: false };
    let mut heap = Heap::new(config);

    let keep = heap.intern("keep", &());
    let roots = vec![ Value::from(keep) ];
    assert_eq!(heap.stats().cycle_count, 0);

    heap.account(100, &roots);
    assert_eq!(heap.stats().cycle_count, 1);
    assert_eq!(heap.object_count(), 1);

    // next cycle waits until usage doubles
    heap.account(100, &roots);
    assert_eq!(heap.stats().cycle_count, 1);
    heap.account(200, &roots);
    assert_eq!(heap.stats().cycle_count, 2);
    assert!(heap.is_live(keep));
}

#[test]
fn value_display() {
    let mut heap = Heap::default();
    let gc = heap.intern("text", &());

    assert_eq!(Value::Nil.display(None).to_string(), "nil");
    assert_eq!(Value::from(true).display(None).to_string(), "true");
    assert_eq!(Value::from(2.0).display(None).to_string(), "2");
    assert_eq!(Value::from(0.25).display(None).to_string(), "0.25");
    assert_eq!(Value::from(gc).display(Some(&heap)).to_string(), "\"text\"");
    assert_eq!(Value::from(gc).display(None).to_string(), format!("<obj {}>", gc));
}

#[test]
fn const_pool_returns_storage_when_dropped() {
    let mut heap = Heap::default();
    let mut pool = ConstantPool::new();

    for i in 0..2000 {
        pool.add(&mut heap, Value::from(f64::from(i)));
    }
    assert!(heap.stats().allocated >= 2000 * core::mem::size_of::<Value>());

    drop(pool);
    heap.collect(&());
    assert_eq!(heap.stats().allocated, 0);
}
