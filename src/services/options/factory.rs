/*
 * Responsibility
 * - 名前付き options の「素の」インスタンス生成 (request context なし・同期)
 * - configure → post_configure → validate の順に適用する
 */
use std::sync::Arc;

use crate::services::options::{DEFAULT_NAME, OptionsError};

/// Builds a base options instance for a name. Synchronous, no request context.
pub trait OptionsFactory<T>: Send + Sync {
    fn create(&self, name: &str) -> Result<T, OptionsError>;
}

type Action<T> = Arc<dyn Fn(&mut T) + Send + Sync>;
type Check<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Which names an action applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    All,
    Named(String),
}

impl Target {
    fn matches(&self, name: &str) -> bool {
        match self {
            Target::All => true,
            Target::Named(n) => n == name,
        }
    }
}

pub(crate) struct NamedAction<T> {
    target: Target,
    action: Action<T>,
}

impl<T> Clone for NamedAction<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            action: Arc::clone(&self.action),
        }
    }
}

pub(crate) struct Validation<T> {
    target: Target,
    check: Check<T>,
    message: String,
}

impl<T> Clone for Validation<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            check: Arc::clone(&self.check),
            message: self.message.clone(),
        }
    }
}

/// `T::default()` followed by every registered synchronous action.
pub struct ConfiguredOptionsFactory<T> {
    configures: Vec<NamedAction<T>>,
    post_configures: Vec<NamedAction<T>>,
    validations: Vec<Validation<T>>,
}

impl<T> Default for ConfiguredOptionsFactory<T> {
    fn default() -> Self {
        Self {
            configures: Vec::new(),
            post_configures: Vec::new(),
            validations: Vec::new(),
        }
    }
}

impl<T> Clone for ConfiguredOptionsFactory<T> {
    fn clone(&self) -> Self {
        Self {
            configures: self.configures.clone(),
            post_configures: self.post_configures.clone(),
            validations: self.validations.clone(),
        }
    }
}

impl<T> ConfiguredOptionsFactory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the default-named instance only.
    pub fn configure<F>(self, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.configure_named(DEFAULT_NAME, action)
    }

    pub fn configure_named<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.configures.push(NamedAction {
            target: Target::Named(name.into()),
            action: Arc::new(action),
        });
        self
    }

    pub fn configure_all<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.configures.push(NamedAction {
            target: Target::All,
            action: Arc::new(action),
        });
        self
    }

    pub fn post_configure<F>(mut self, target: Target, action: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.post_configures.push(NamedAction {
            target,
            action: Arc::new(action),
        });
        self
    }

    pub fn validate<F>(mut self, target: Target, check: F, message: impl Into<String>) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.validations.push(Validation {
            target,
            check: Arc::new(check),
            message: message.into(),
        });
        self
    }
}

impl<T> OptionsFactory<T> for ConfiguredOptionsFactory<T>
where
    T: Default + Send + Sync,
{
    fn create(&self, name: &str) -> Result<T, OptionsError> {
        let mut options = T::default();

        for step in self.configures.iter().chain(self.post_configures.iter()) {
            if step.target.matches(name) {
                (step.action)(&mut options);
            }
        }

        let failures: Vec<String> = self
            .validations
            .iter()
            .filter(|v| v.target.matches(name) && !(v.check)(&options))
            .map(|v| v.message.clone())
            .collect();

        if !failures.is_empty() {
            return Err(OptionsError::Validation {
                name: name.to_string(),
                failures,
            });
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Sample {
        message: String,
        limit: u32,
    }

    #[test]
    fn configure_targets_default_name_only() {
        let factory = ConfiguredOptionsFactory::<Sample>::new()
            .configure(|o| o.message.push('d'))
            .configure_named("other", |o| o.message.push('o'))
            .configure_all(|o| o.message.push('*'));

        assert_eq!(factory.create(DEFAULT_NAME).unwrap().message, "d*");
        assert_eq!(factory.create("other").unwrap().message, "o*");
        assert_eq!(factory.create("third").unwrap().message, "*");
    }

    #[test]
    fn post_configure_runs_after_every_configure() {
        let factory = ConfiguredOptionsFactory::<Sample>::new()
            .post_configure(Target::All, |o| o.message.push_str("post"))
            .configure_all(|o| o.message.push_str("pre-"));

        assert_eq!(factory.create("x").unwrap().message, "pre-post");
    }

    #[test]
    fn validation_failures_are_collected() {
        let factory = ConfiguredOptionsFactory::<Sample>::new()
            .validate(Target::All, |o| o.limit > 0, "limit must be positive")
            .validate(Target::All, |o| !o.message.is_empty(), "message is required")
            .validate(Target::Named("strict".into()), |_| false, "never valid");

        match factory.create("loose") {
            Err(OptionsError::Validation { name, failures }) => {
                assert_eq!(name, "loose");
                assert_eq!(failures, vec!["limit must be positive", "message is required"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn each_create_returns_a_fresh_instance() {
        let factory = ConfiguredOptionsFactory::<Sample>::new().configure_all(|o| o.limit += 1);

        assert_eq!(factory.create("a").unwrap().limit, 1);
        assert_eq!(factory.create("a").unwrap().limit, 1);
    }
}
