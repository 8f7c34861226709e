//! Interface implemented by classes exported from math function plugins.
//!
//! Both the host and the plugin depend on this crate, so they agree on the
//! trait and on its capability ID.
use pluma_core::Capability;

/// A real function of one variable.
pub trait MathFunction: Send + Sync {
    /// Short human-readable name, e.g. `"exp"`.
    fn name(&self) -> &str;

    fn eval(&self, x: f64) -> f64;
}

impl Capability for dyn MathFunction {
    const ID: &'static str = "pluma.math.MathFunction/1";
}
