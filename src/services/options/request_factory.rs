use std::sync::Arc;

use crate::services::options::{OptionsError, OptionsFactory, RequestConfigurator};
use crate::services::request::RequestContext;

/// Base factory + ordered async configurators.
///
/// Never caches: caching is the resolver's job.
pub struct RequestOptionsFactory<T> {
    base: Arc<dyn OptionsFactory<T>>,
    configurators: Vec<Arc<dyn RequestConfigurator<T>>>,
}

impl<T> RequestOptionsFactory<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(
        base: Arc<dyn OptionsFactory<T>>,
        configurators: Vec<Arc<dyn RequestConfigurator<T>>>,
    ) -> Self {
        Self {
            base,
            configurators,
        }
    }

    pub async fn create(&self, name: &str, ctx: &RequestContext) -> Result<T, OptionsError> {
        let mut options = self.base.create(name)?;

        // 並列化しない: 登録順に 1 つずつ await する
        for configurator in &self.configurators {
            configurator.configure(name, &mut options, ctx).await?;
        }

        Ok(options)
    }

    pub fn configurator_count(&self) -> usize {
        self.configurators.len()
    }
}
