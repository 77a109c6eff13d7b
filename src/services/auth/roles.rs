use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::ApiKey;

/// Role lookup for an API key.
///
/// - `Ok(Some(roles))`: key is known (roles may be empty)
/// - `Ok(None)`: unknown key (caller is not authenticated)
/// - `Err(_)`: backend failure (treat as fail-closed)
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn roles_for(&self, api_key: &str) -> Result<Option<Vec<String>>, RoleStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RoleStoreError {
    #[error("role store unavailable: {0}")]
    Unavailable(String),
}

/// Config-backed role store.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRoleStore {
    keys: HashMap<String, Vec<String>>,
}

impl InMemoryRoleStore {
    pub fn new(keys: &[ApiKey]) -> Self {
        Self {
            keys: keys
                .iter()
                .map(|k| (k.key.clone(), k.roles.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn roles_for(&self, api_key: &str) -> Result<Option<Vec<String>>, RoleStoreError> {
        Ok(self.keys.get(api_key).cloned())
    }
}
