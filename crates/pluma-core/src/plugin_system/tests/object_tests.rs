#![cfg(test)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::plugin_system::object::RawObject;
use crate::plugin_system::tests::{Counter, English, Greeter, Tracked};

#[test]
fn test_raw_object_carries_capability() {
    let object = RawObject::new::<dyn Greeter>(Box::new(English));
    assert_eq!(object.capability(), "pluma.tests.Greeter/1");
    assert!(object.is::<dyn Greeter>());
    assert!(!object.is::<dyn Counter>());
}

#[test]
fn test_downcast_mismatch_returns_object() {
    let drops = Arc::new(AtomicUsize::new(0));
    let object = RawObject::new::<dyn Greeter>(Box::new(Tracked {
        drops: Arc::clone(&drops),
    }));

    let object = match object.downcast::<dyn Counter>() {
        Ok(_) => panic!("a Greeter must not downcast to Counter"),
        Err(object) => object,
    };
    assert_eq!(drops.load(Ordering::SeqCst), 0, "failed downcast must not drop");

    let greeter = object.downcast::<dyn Greeter>().expect("matching capability");
    assert_eq!(greeter.greet(), "tracked");
    assert_eq!(drops.load(Ordering::SeqCst), 0);
    drop(greeter);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dropping_raw_object_runs_destructor_once() {
    let drops = Arc::new(AtomicUsize::new(0));
    let object = RawObject::new::<dyn Greeter>(Box::new(Tracked {
        drops: Arc::clone(&drops),
    }));
    drop(object);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_raw_object_debug_shows_capability() {
    let object = RawObject::new::<dyn Greeter>(Box::new(English));
    let debug = format!("{:?}", object);
    assert!(debug.contains("pluma.tests.Greeter/1"), "{}", debug);
}

#[test]
fn test_raw_object_can_move_between_threads() {
    let object = RawObject::new::<dyn Greeter>(Box::new(English));
    let greeting = std::thread::spawn(move || {
        object
            .downcast::<dyn Greeter>()
            .map(|greeter| greeter.greet())
            .unwrap_or_default()
    })
    .join()
    .expect("thread panicked");
    assert_eq!(greeting, "hello");
}
