//! # ComponentRegistry — Tag → Factory Dispatch
//!
//! Scene loading has to turn a string tag like `"Transform"` back into a
//! live component. The registry maps each tag to a plain factory function
//! pointer so the load path stays an open set: applications register their
//! own component types next to the built-in ones, and the node/scene code
//! never needs a match over concrete types.

use std::any::TypeId;
use std::collections::HashMap;
use std::rc::Rc;

use crate::component::Component;
use crate::transform::Transform;

type FactoryFn = fn() -> Rc<dyn Component>;

pub(crate) struct RegistryEntry {
    pub(crate) type_id: TypeId,
    pub(crate) create: FactoryFn,
}

/// Maps component tags to factories for the deserialization path.
pub struct ComponentRegistry {
    factories: HashMap<String, RegistryEntry>,
}

impl ComponentRegistry {
    /// An empty registry with nothing registered, not even [`Transform`].
    pub fn empty() -> Self {
        Self { factories: HashMap::new() }
    }

    /// A registry with the built-in [`Transform`] pre-registered. This is
    /// what [`Scene`](crate::scene::Scene) starts with.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<Transform>();
        registry
    }

    /// Register `T` under its own [`type_name`](Component::type_name) tag.
    ///
    /// Re-registering the same tag replaces the previous factory.
    pub fn register<T: Component + Default>(&mut self) {
        fn make<T: Component + Default>() -> Rc<dyn Component> {
            Rc::new(T::default())
        }

        let tag = T::default().type_name();
        self.factories.insert(
            tag.to_string(),
            RegistryEntry { type_id: TypeId::of::<T>(), create: make::<T> },
        );
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// The registered tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub(crate) fn entry(&self, tag: &str) -> Option<&RegistryEntry> {
        self.factories.get(tag)
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
