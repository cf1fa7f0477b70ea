//! Durable per-session identity.
//!
//! Holds the random session id plus the user and channel names persisted
//! after a successful login. The store is explicitly constructed and injected
//! into the [`Session`](crate::Session); nothing else writes to it.
//!
//! Writes are synchronous and durable before the call returns. A storage
//! backend that has lost its medium should behave as "always empty" so the
//! callers stay total; there is no error path.

use std::collections::HashMap;

use harbor_proto::User;
use uuid::Uuid;

const KEY_ID: &str = "id";
const KEY_USER_NAME: &str = "userName";
const KEY_CHANNEL_NAME: &str = "channelName";

/// Key/value backend scoped to the current process session.
pub trait IdentityStorage {
    /// Read a value. `None` when absent or the backend is unavailable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value. Must be durable before returning; failures are
    /// swallowed (the backend degrades to "always empty").
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory backend, cleared when the process session ends.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

/// Session identity: `{session id, user name, channel name}`.
///
/// The session id is lazily created on first read from a cryptographically
/// random UUID and never regenerated. User and channel names are persisted
/// only after a successful login; logout clears the channel name while the
/// session id survives.
#[derive(Debug)]
pub struct IdentityStore<S> {
    storage: S,
}

impl<S: IdentityStorage> IdentityStore<S> {
    /// Wrap a storage backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stable session id, created on first read.
    pub fn session_id(&mut self) -> Uuid {
        if let Some(value) = self.storage.get(KEY_ID)
            && let Ok(id) = Uuid::parse_str(&value)
        {
            return id;
        }

        let id = Uuid::new_v4();
        self.storage.set(KEY_ID, &id.to_string());
        id
    }

    /// Stored user name; empty when not logged in.
    pub fn user_name(&self) -> String {
        self.storage.get(KEY_USER_NAME).unwrap_or_default()
    }

    /// Persist the user name.
    pub fn set_user_name(&mut self, value: &str) {
        self.storage.set(KEY_USER_NAME, value);
    }

    /// Stored channel name; empty when not joined anywhere.
    pub fn channel_name(&self) -> String {
        self.storage.get(KEY_CHANNEL_NAME).unwrap_or_default()
    }

    /// Persist the channel name.
    pub fn set_channel_name(&mut self, value: &str) {
        self.storage.set(KEY_CHANNEL_NAME, value);
    }

    /// Actor identity for server requests.
    pub fn user(&mut self) -> User {
        User { name: self.user_name(), session_id: self.session_id() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_is_created_once() {
        let mut store = IdentityStore::new(MemoryStorage::new());
        let first = store.session_id();
        let second = store.session_id();
        assert_eq!(first, second);
    }

    #[test]
    fn names_default_to_empty() {
        let store = IdentityStore::new(MemoryStorage::new());
        assert_eq!(store.user_name(), "");
        assert_eq!(store.channel_name(), "");
    }

    #[test]
    fn logout_clears_channel_but_keeps_session_id() {
        let mut store = IdentityStore::new(MemoryStorage::new());
        let id = store.session_id();
        store.set_user_name("ana");
        store.set_channel_name("lobby");

        store.set_channel_name("");

        assert_eq!(store.channel_name(), "");
        assert_eq!(store.user_name(), "ana");
        assert_eq!(store.session_id(), id);
    }

    #[test]
    fn corrupt_stored_id_is_replaced() {
        let mut storage = MemoryStorage::new();
        storage.set(KEY_ID, "not-a-uuid");
        let mut store = IdentityStore::new(storage);

        let id = store.session_id();
        assert_eq!(store.session_id(), id);
    }
}
