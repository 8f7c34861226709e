use pluma_core::Capability;

pub trait Widget: Send {
    fn id(&self) -> u32;
}

impl Capability for dyn Widget {
    const ID: &'static str = "pluma.tests.Widget/1";
}

pub struct Calm;

impl Widget for Calm {
    fn id(&self) -> u32 {
        1
    }
}

pluma_core::declare_plugin!("Panicky", "0.1.0", |factory| {
    factory
        .register::<dyn Widget>("Calm", || Box::new(Calm))?
        .register::<dyn Widget>("Boom", || -> Box<dyn Widget> {
            panic!("constructor failed on purpose")
        })?;
    Ok(())
});
