use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use crate::services::options::{OptionsBuilder, RequestOptionsFactory};

/// Application-wide table of options factories, one per options type.
///
/// Built once at startup and shared (read-only) by every request.
#[derive(Default)]
pub struct OptionsRegistry {
    factories: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl OptionsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T>(self, builder: OptionsBuilder<T>) -> Self
    where
        T: Default + Send + Sync + 'static,
    {
        self.insert(builder.build())
    }

    /// Register an explicitly wired factory. Replaces any earlier one for `T`.
    pub fn insert<T>(mut self, factory: RequestOptionsFactory<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        tracing::debug!(
            options = type_name::<T>(),
            configurators = factory.configurator_count(),
            "request options registered"
        );
        self.factories.insert(TypeId::of::<T>(), Arc::new(factory));
        self
    }

    pub fn factory<T>(&self) -> Option<Arc<RequestOptionsFactory<T>>>
    where
        T: Send + Sync + 'static,
    {
        let factory = self.factories.get(&TypeId::of::<T>())?;
        Arc::clone(factory)
            .downcast::<RequestOptionsFactory<T>>()
            .ok()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for OptionsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsRegistry")
            .field("types", &self.factories.len())
            .finish()
    }
}
