use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::services::options::{OptionsError, OptionsRegistry, RequestOptions};

/// Per-request arena of resolvers, one per options type.
///
/// Created empty when the request starts and emptied by [`RequestScope::clear`]
/// when it ends. Cached options may hold a clone of the owning
/// [`RequestContext`](super::RequestContext), so dropping the context alone
/// does not release them.
#[derive(Default)]
pub struct RequestScope {
    resolvers: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn resolver<T>(
        &self,
        registry: &OptionsRegistry,
    ) -> Result<Arc<RequestOptions<T>>, OptionsError>
    where
        T: Send + Sync + 'static,
    {
        let mut resolvers = self.resolvers.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = resolvers.get(&TypeId::of::<T>()) {
            if let Ok(resolver) = Arc::clone(existing).downcast::<RequestOptions<T>>() {
                return Ok(resolver);
            }
        }

        let factory = registry.factory::<T>().ok_or(OptionsError::NotRegistered {
            type_name: type_name::<T>(),
        })?;
        let resolver = Arc::new(RequestOptions::new(factory));
        resolvers.insert(TypeId::of::<T>(), resolver.clone());

        Ok(resolver)
    }

    /// Drop every resolver (and so every cached options value) of this request.
    pub fn clear(&self) {
        let released = {
            let mut resolvers = self.resolvers.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *resolvers)
        };
        // lock の外で drop する (options 側の Drop が scope に触れても deadlock しない)
        drop(released);
    }

    pub fn resolver_count(&self) -> usize {
        self.resolvers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}
