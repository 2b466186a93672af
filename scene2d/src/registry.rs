use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Session-wide key/value store that outlives individual scenes.
///
/// Values are kept as JSON so any serde type can be stored and read back.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    values: HashMap<String, Value>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let key = key.into();
        let value = serde_json::to_value(value)
            .with_context(|| format!("serializing session value `{key}`"))?;
        self.values.insert(key, value);
        Ok(())
    }

    /// Read a value back. Missing keys and type mismatches both give `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_typed_values() {
        let mut reg = SessionRegistry::new();
        reg.set("score", &120u32).unwrap();
        assert_eq!(reg.get::<u32>("score"), Some(120));
        assert!(reg.get::<String>("score").is_none());
    }

    #[test]
    fn missing_keys_default() {
        let reg = SessionRegistry::new();
        assert_eq!(reg.get_or_default::<u32>("score"), 0);
        assert_eq!(reg.get::<u32>("score"), None);
    }

    #[test]
    fn last_write_wins() {
        let mut reg = SessionRegistry::new();
        reg.set("score", &10u32).unwrap();
        reg.set("score", &0u32).unwrap();
        assert_eq!(reg.get_or_default::<u32>("score"), 0);
    }
}
