//! Named, request-scoped options.
//!
//! An options type is registered once ([`OptionsRegistry`]); every request
//! resolves its own instances through [`RequestOptions`], which caches them
//! by name until the request ends.
mod builder;
mod configure;
mod error;
mod factory;
mod registry;
mod request_factory;
mod resolver;

pub use builder::OptionsBuilder;
pub use configure::{ConfigureFuture, ConfigureRequestOptions, RequestConfigurator};
pub use error::OptionsError;
pub use factory::{ConfiguredOptionsFactory, OptionsFactory, Target};
pub use registry::OptionsRegistry;
pub use request_factory::RequestOptionsFactory;
pub use resolver::RequestOptions;

/// Name used when the caller does not ask for a specific one.
pub const DEFAULT_NAME: &str = "";

#[cfg(test)]
mod tests;
