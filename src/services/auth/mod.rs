pub mod access;
pub mod forbid;
pub mod properties;
pub mod roles;

pub use access::{ADMIN_POLICY, AccessOptions};
pub use forbid::{AccessDecisionContext, AuthContextError};
pub use properties::AuthProperties;
pub use roles::{InMemoryRoleStore, RoleStore, RoleStoreError};
