use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;

/// Settings for an [`InMemoryDatabase`](super::InMemoryDatabase).
///
/// Deserializable so it can sit inside an application's own config file:
///
/// ```ignore
/// let config = InMemoryConfig::from_json(r#"{ "name": "orders", "first_key": 1000 }"#)?;
/// let database = InMemoryDatabase::with_config(config)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryConfig {
    /// Recorded on log events.
    pub name: String,
    /// First key generated for each table.
    pub first_key: i64,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            first_key: 1,
        }
    }
}

impl InMemoryConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RepositoryError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RepositoryError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Key `0` marks unsaved entities, so generation must start above it.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        if self.first_key < 1 {
            return Err(RepositoryError::InvalidConfig(format!(
                "first_key must be at least 1, got {}",
                self.first_key
            )));
        }
        Ok(())
    }
}
