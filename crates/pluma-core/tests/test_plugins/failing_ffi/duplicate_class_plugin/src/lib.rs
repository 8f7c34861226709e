use pluma_core::Capability;

pub trait Widget: Send {
    fn id(&self) -> u32;
}

impl Capability for dyn Widget {
    const ID: &'static str = "pluma.tests.Widget/1";
}

pub struct One;

impl Widget for One {
    fn id(&self) -> u32 {
        1
    }
}

pluma_core::declare_plugin!("Doubled", "0.1.0", |factory| {
    factory
        .register::<dyn Widget>("Twice", || Box::new(One))?
        .register::<dyn Widget>("Twice", || Box::new(One))?;
    Ok(())
});
