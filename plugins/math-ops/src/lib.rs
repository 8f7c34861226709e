#![allow(non_snake_case)] // Library is named after the plugin

use math_api::MathFunction;

/// Natural exponential.
pub struct Exp;

impl MathFunction for Exp {
    fn name(&self) -> &str {
        "exp"
    }

    fn eval(&self, x: f64) -> f64 {
        x.exp()
    }
}

/// Natural logarithm. NaN for negative input, negative infinity at zero.
pub struct Log;

impl MathFunction for Log {
    fn name(&self) -> &str {
        "log"
    }

    fn eval(&self, x: f64) -> f64 {
        x.ln()
    }
}

pluma_core::declare_plugin!("MathOps", env!("CARGO_PKG_VERSION"), |factory| {
    factory
        .register::<dyn MathFunction>("Exp", || Box::new(Exp))?
        .register::<dyn MathFunction>("Log", || Box::new(Log))?;
    Ok(())
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functions_evaluate() {
        assert!((Exp.eval(1.0) - std::f64::consts::E).abs() < 1e-12);
        assert!((Log.eval(std::f64::consts::E) - 1.0).abs() < 1e-12);
        assert!(Log.eval(-1.0).is_nan());
    }

    #[test]
    fn test_entry_point_registers_both_classes() {
        let registry = unsafe { &*pluma_plugin_entry() };
        assert_eq!(registry.name(), "MathOps");
        assert_eq!(registry.version(), "1.0.0");
        assert!(registry.registration_error().is_none());
        assert_eq!(registry.metadata().class_names(), vec!["Exp", "Log"]);
    }
}
