use thiserror::Error;

use crate::services::auth::AuthProperties;
use crate::services::request::RequestContext;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthContextError {
    #[error("invalid argument: {0} must not be empty")]
    InvalidArgument(&'static str),
}

/// Outcome of a denied access check.
///
/// Built by the access layer when an authenticated caller is refused;
/// read-only afterwards and dropped once the denial has been reported.
#[derive(Debug, Clone)]
pub struct AccessDecisionContext {
    request: RequestContext,
    scheme: String,
    properties: AuthProperties,
}

impl AccessDecisionContext {
    pub fn new(request: RequestContext, scheme: &str) -> Result<Self, AuthContextError> {
        Self::with_properties(request, scheme, None)
    }

    pub fn with_properties(
        request: RequestContext,
        scheme: &str,
        properties: Option<AuthProperties>,
    ) -> Result<Self, AuthContextError> {
        if scheme.is_empty() {
            return Err(AuthContextError::InvalidArgument("scheme"));
        }

        Ok(Self {
            request,
            scheme: scheme.to_string(),
            properties: properties.unwrap_or_default(),
        })
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn properties(&self) -> &AuthProperties {
        &self.properties
    }
}
