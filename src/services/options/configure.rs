use std::{future::Future, pin::Pin};

use crate::services::options::OptionsError;
use crate::services::request::RequestContext;

pub type ConfigureFuture<'a> = Pin<Box<dyn Future<Output = Result<(), OptionsError>> + Send + 'a>>;

/// Request-aware configuration step, applied after the base factory.
///
/// Every registered configurator runs, in registration order, on every newly
/// created instance for every name. Each one is awaited to completion before
/// the next starts.
pub trait RequestConfigurator<T>: Send + Sync {
    fn configure<'a>(
        &'a self,
        name: &'a str,
        options: &'a mut T,
        ctx: &'a RequestContext,
    ) -> ConfigureFuture<'a>;
}

/// Closure-backed [`RequestConfigurator`].
///
/// ```ignore
/// OptionsBuilder::<MyOptions>::new().configure_async(|_name, o, ctx| {
///     Box::pin(async move {
///         o.request_id = ctx.request_id().to_string();
///         Ok(())
///     })
/// })
/// ```
pub struct ConfigureRequestOptions<F> {
    configure: F,
}

impl<F> ConfigureRequestOptions<F> {
    pub fn new(configure: F) -> Self {
        Self { configure }
    }
}

impl<T, F> RequestConfigurator<T> for ConfigureRequestOptions<F>
where
    F: for<'a> Fn(&'a str, &'a mut T, &'a RequestContext) -> ConfigureFuture<'a> + Send + Sync,
{
    fn configure<'a>(
        &'a self,
        name: &'a str,
        options: &'a mut T,
        ctx: &'a RequestContext,
    ) -> ConfigureFuture<'a> {
        (self.configure)(name, options, ctx)
    }
}
