use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::str::FromStr;

use crate::error::{ArcanaError, Result};

/// An abstract string key-value store.
///
/// This trait decouples the client logic from the concrete storage backend
/// (JSON file on disk, in-memory map, platform secure storage).
///
/// # Implementation Notes
///
/// - A missing key is `Ok(None)`, never an error.
/// - Writers of the same key are last-write-wins; no merging is attempted.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Lists every key starting with `prefix`.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Typed helpers layered on top of [`KeyValueStore`].
#[async_trait]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Reads a JSON document stored under `key`.
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Writes `value` as a JSON document under `key`.
    async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw).await
    }

    /// Reads a scalar stored as its string form (numbers, decimals, flags).
    async fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key).await? {
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
                ArcanaError::data_access(format!("Invalid value under '{key}': {e}"))
            }),
            None => Ok(None),
        }
    }

    /// Returns true when `key` holds the literal `"true"`.
    async fn get_flag(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.as_deref() == Some("true"))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Mutex;

    /// Map-backed store with switchable write failures.
    #[derive(Default)]
    pub struct MockStore {
        pub entries: Mutex<BTreeMap<String, String>>,
        pub failing_keys: Mutex<HashSet<String>>,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_writes_to(&self, key: &str) {
            self.failing_keys.lock().unwrap().insert(key.to_string());
        }

        pub fn heal(&self) {
            self.failing_keys.lock().unwrap().clear();
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl KeyValueStore for MockStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: String) -> Result<()> {
            if self.failing_keys.lock().unwrap().contains(key) {
                return Err(ArcanaError::io("storage full"));
            }
            self.entries.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            if self.failing_keys.lock().unwrap().contains(key) {
                return Err(ArcanaError::io("storage full"));
            }
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }

        async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::MockStore;
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_json_helpers() {
        let store = MockStore::new();
        store.set_json("list", &vec![1, 2, 3]).await.unwrap();
        let loaded: Option<Vec<i32>> = store.get_json("list").await.unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));

        let missing: Option<Vec<i32>> = store.get_json("nothing").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_parsed_decimal_and_flag() {
        let store = MockStore::new();
        store.set("balance", "10.50".to_string()).await.unwrap();
        store.set("flag", "true".to_string()).await.unwrap();

        let balance: Option<Decimal> = store.get_parsed("balance").await.unwrap();
        assert_eq!(balance, Some(Decimal::new(1050, 2)));
        assert!(store.get_flag("flag").await.unwrap());
        assert!(!store.get_flag("absent").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_parsed_rejects_garbage() {
        let store = MockStore::new();
        store.set("elapsed", "abc".to_string()).await.unwrap();
        let result: Result<Option<u64>> = store.get_parsed("elapsed").await;
        assert!(result.unwrap_err().is_storage());
    }
}
