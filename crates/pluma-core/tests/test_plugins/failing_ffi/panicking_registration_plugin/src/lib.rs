// Registration itself panics before any class is added.
pluma_core::declare_plugin!("Unsteady", "0.1.0", |_factory| {
    panic!("registration failed on purpose")
});
