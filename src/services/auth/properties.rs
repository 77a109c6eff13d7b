use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key/value bag describing an authentication session or decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthProperties {
    #[serde(default)]
    pub items: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_utc: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_persistent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_refresh: Option<bool>,
}

impl AuthProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }

    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    pub fn item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_properties_serialize_compactly() {
        let json = serde_json::to_value(AuthProperties::new()).unwrap();
        assert_eq!(json, serde_json::json!({"items": {}, "is_persistent": false}));
    }

    #[test]
    fn items_are_readable() {
        let props = AuthProperties::new()
            .with_item("policy", "admin")
            .with_redirect_uri("/login");

        assert_eq!(props.item("policy"), Some("admin"));
        assert_eq!(props.item("missing"), None);
        assert_eq!(props.redirect_uri.as_deref(), Some("/login"));
        assert!(!props.is_empty());
    }
}
