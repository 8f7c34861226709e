//! Type-erased objects created by plugin constructors, and the owning handles
//! the manager hands out for them.
//!
//! A constructor registered for interface `I` produces a `Box<I>`. The box is
//! erased into a [`RawObject`] tagged with `I`'s [`Capability::ID`]; turning it
//! back into a typed value checks that tag first.
//!
//! The vtable and drop glue of every created object live in the plugin module,
//! so the module must stay mapped for as long as the object exists. A
//! [`RawObject`] borrows the registry it came from. [`Instance`] and
//! [`OpaqueInstance`] instead hold a counted reference to the loaded module,
//! which keeps it mapped until the handle is dropped.
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::sync::Arc;

use crate::plugin_system::record::PluginModule;

/// An interface classes can be exported as.
///
/// Implemented by the host-visible type of a class, usually a trait object:
///
/// ```ignore
/// impl Capability for dyn MathFunction {
///     const ID: &'static str = "pluma.math.MathFunction/1";
/// }
/// ```
///
/// The ID is compared by value across the module boundary, so it must be
/// unique for each interface and change whenever the interface changes.
pub trait Capability: 'static {
    const ID: &'static str;
}

/// An object created by a plugin, erased to its capability tag.
pub struct RawObject<'r> {
    /// Points at a heap-allocated `Box<I>`.
    ptr: NonNull<()>,
    capability: &'static str,
    drop_fn: unsafe fn(NonNull<()>),
    _registry: PhantomData<&'r ()>,
}

// SAFETY: `RawObject::new` only accepts `Box<I>` with `I: Send`.
unsafe impl Send for RawObject<'_> {}

unsafe fn drop_erased<I: ?Sized>(ptr: NonNull<()>) {
    drop(unsafe { Box::from_raw(ptr.cast::<Box<I>>().as_ptr()) });
}

impl RawObject<'static> {
    /// Erases `object`, tagging it with `I::ID`.
    pub fn new<I: ?Sized + Capability + Send>(object: Box<I>) -> Self {
        let outer: Box<Box<I>> = Box::new(object);
        Self {
            ptr: NonNull::from(Box::leak(outer)).cast(),
            capability: I::ID,
            drop_fn: drop_erased::<I>,
            _registry: PhantomData,
        }
    }
}

impl<'r> RawObject<'r> {
    /// Capability ID the object was registered under.
    pub fn capability(&self) -> &str {
        self.capability
    }

    pub fn is<I: ?Sized + Capability>(&self) -> bool {
        self.capability == I::ID
    }

    /// Recovers the typed box, or returns the object unchanged if it was
    /// registered under a different capability.
    pub fn downcast<I: ?Sized + Capability>(self) -> Result<Box<I>, Self> {
        if !self.is::<I>() {
            return Err(self);
        }
        let this = ManuallyDrop::new(self);
        // SAFETY: the tag matched, so `ptr` was produced by `new::<I>` from a
        // `Box<Box<I>>` and has not been freed.
        let outer = unsafe { Box::from_raw(this.ptr.cast::<Box<I>>().as_ptr()) };
        Ok(*outer)
    }

    /// Releases the registry borrow.
    ///
    /// # Safety
    /// The module that created the object must stay loaded until the returned
    /// value is dropped or downcast and dropped.
    pub(crate) unsafe fn detach(self) -> RawObject<'static> {
        let this = ManuallyDrop::new(self);
        RawObject {
            ptr: this.ptr,
            capability: this.capability,
            drop_fn: this.drop_fn,
            _registry: PhantomData,
        }
    }
}

impl Drop for RawObject<'_> {
    fn drop(&mut self) {
        // SAFETY: `drop_fn` was instantiated for the type `ptr` points at.
        unsafe { (self.drop_fn)(self.ptr) }
    }
}

impl fmt::Debug for RawObject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawObject")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

/// Owning, typed handle to an object created by a loaded plugin.
///
/// Dereferences to the interface `I`. The plugin module stays mapped until
/// every `Instance` created from it has been dropped.
pub struct Instance<I: ?Sized> {
    // Dropped before `module`: the drop glue lives in the module.
    object: Box<I>,
    class_name: String,
    module: Arc<PluginModule>,
}

impl<I: ?Sized> Instance<I> {
    /// Name the plugin was loaded under.
    pub fn plugin_name(&self) -> &str {
        self.module.name()
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}

impl<I: ?Sized> Deref for Instance<I> {
    type Target = I;

    fn deref(&self) -> &I {
        &self.object
    }
}

impl<I: ?Sized> DerefMut for Instance<I> {
    fn deref_mut(&mut self) -> &mut I {
        &mut self.object
    }
}

impl<I: ?Sized> fmt::Debug for Instance<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("plugin", &self.plugin_name())
            .field("class", &self.class_name)
            .finish_non_exhaustive()
    }
}

/// Owning handle to an object whose interface has not been checked yet.
pub struct OpaqueInstance {
    object: RawObject<'static>,
    class_name: String,
    module: Arc<PluginModule>,
}

impl OpaqueInstance {
    /// # Safety
    /// `object` must have been created by the registry inside `module`.
    pub(crate) unsafe fn new(
        object: RawObject<'static>,
        class_name: String,
        module: Arc<PluginModule>,
    ) -> Self {
        Self {
            object,
            class_name,
            module,
        }
    }

    pub fn capability(&self) -> &str {
        self.object.capability()
    }

    pub fn plugin_name(&self) -> &str {
        self.module.name()
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn is<I: ?Sized + Capability>(&self) -> bool {
        self.object.is::<I>()
    }

    /// Converts into a typed [`Instance`], or gives the handle back if the
    /// object does not implement `I`.
    pub fn downcast<I: ?Sized + Capability>(self) -> Result<Instance<I>, Self> {
        let OpaqueInstance {
            object,
            class_name,
            module,
        } = self;
        match object.downcast::<I>() {
            Ok(object) => Ok(Instance {
                object,
                class_name,
                module,
            }),
            Err(object) => Err(OpaqueInstance {
                object,
                class_name,
                module,
            }),
        }
    }
}

impl fmt::Debug for OpaqueInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueInstance")
            .field("plugin", &self.plugin_name())
            .field("class", &self.class_name)
            .field("capability", &self.capability())
            .finish()
    }
}
