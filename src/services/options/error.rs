use thiserror::Error;

/// Errors raised while building or resolving an options instance.
///
/// Configurator failures are surfaced to the caller unchanged; nothing is
/// cached for the failed name.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("options type {type_name} is not registered")]
    NotRegistered { type_name: &'static str },

    #[error("options '{name}' failed validation: {}", failures.join("; "))]
    Validation { name: String, failures: Vec<String> },

    #[error("configuring options '{name}' failed: {message}")]
    Configure { name: String, message: String },
}

impl OptionsError {
    pub fn configure(name: &str, message: impl Into<String>) -> Self {
        Self::Configure {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
