pub mod factory_tests;
pub mod object_tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::plugin_system::object::Capability;

/// Interface used by the unit tests in place of a real plugin API.
pub trait Greeter: Send {
    fn greet(&self) -> String;
}

impl Capability for dyn Greeter {
    const ID: &'static str = "pluma.tests.Greeter/1";
}

pub trait Counter: Send {
    fn value(&self) -> u32;
}

impl Capability for dyn Counter {
    const ID: &'static str = "pluma.tests.Counter/1";
}

pub struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

pub struct French;

impl Greeter for French {
    fn greet(&self) -> String {
        "bonjour".to_string()
    }
}

/// Counts how many times it has been dropped.
pub struct Tracked {
    pub drops: Arc<AtomicUsize>,
}

impl Greeter for Tracked {
    fn greet(&self) -> String {
        "tracked".to_string()
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}
