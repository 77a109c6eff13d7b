use std::sync::Arc;

use crate::services::options::{
    ConfigureFuture, ConfigureRequestOptions, ConfiguredOptionsFactory, OptionsFactory,
    RequestConfigurator, RequestOptionsFactory, Target,
};
use crate::services::request::RequestContext;

/// Registration surface for one options type.
///
/// Synchronous actions go to the base factory; asynchronous configurators
/// always run after them, in the order they were added.
pub struct OptionsBuilder<T> {
    base: ConfiguredOptionsFactory<T>,
    configurators: Vec<Arc<dyn RequestConfigurator<T>>>,
}

impl<T> Default for OptionsBuilder<T> {
    fn default() -> Self {
        Self {
            base: ConfiguredOptionsFactory::default(),
            configurators: Vec::new(),
        }
    }
}

impl<T> OptionsBuilder<T>
where
    T: Default + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.base = self.base.configure(action);
        self
    }

    pub fn configure_named<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.base = self.base.configure_named(name, action);
        self
    }

    pub fn configure_all<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.base = self.base.configure_all(action);
        self
    }

    pub fn post_configure<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.base = self.base.post_configure(Target::Named(name.into()), action);
        self
    }

    pub fn post_configure_all<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.base = self.base.post_configure(Target::All, action);
        self
    }

    /// Checked for every name once synchronous configuration is done.
    pub fn validate<F>(mut self, check: F, message: impl Into<String>) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.base = self.base.validate(Target::All, check, message);
        self
    }

    pub fn configure_async<F>(self, configure: F) -> Self
    where
        F: for<'a> Fn(&'a str, &'a mut T, &'a RequestContext) -> ConfigureFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        self.add_configurator(Arc::new(ConfigureRequestOptions::new(configure)))
    }

    pub fn add_configurator(mut self, configurator: Arc<dyn RequestConfigurator<T>>) -> Self {
        self.configurators.push(configurator);
        self
    }

    pub fn build(self) -> RequestOptionsFactory<T> {
        let base: Arc<dyn OptionsFactory<T>> = Arc::new(self.base);
        RequestOptionsFactory::new(base, self.configurators)
    }
}
