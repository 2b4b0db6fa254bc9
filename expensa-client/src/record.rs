//! The persisted session record and the storage keys around it.

use serde::{Deserialize, Serialize};
use shared::models::{RoleFlags, UserProfile};
use tracing::{debug, warn};

use crate::storage::{SessionStorage, StorageError};

/// Key of the serialized [`PersistedSession`].
pub const SESSION_KEY: &str = "SESSION";
/// Key of the cached anti-forgery token.
pub const CSRF_TOKEN_KEY: &str = "CSRF_TOKEN";
/// Bearer token key written by older clients.
pub const LEGACY_TOKEN_KEY: &str = "JWT_TOKEN";
/// `{fullName, roles}` snapshot written by older clients.
pub const LEGACY_USER_KEY: &str = "USER";
/// `"true"` when the user was an admin, written by older clients.
pub const LEGACY_ADMIN_KEY: &str = "IS_ADMIN";
/// `"true"` when the user was a manager, written by older clients.
pub const LEGACY_MANAGER_KEY: &str = "IS_MANAGER";

const LEGACY_KEYS: [&str; 4] = [
    LEGACY_TOKEN_KEY,
    LEGACY_USER_KEY,
    LEGACY_ADMIN_KEY,
    LEGACY_MANAGER_KEY,
];

/// Every key an authenticated client may have written.
pub const ALL_KEYS: [&str; 6] = [
    SESSION_KEY,
    CSRF_TOKEN_KEY,
    LEGACY_TOKEN_KEY,
    LEGACY_USER_KEY,
    LEGACY_ADMIN_KEY,
    LEGACY_MANAGER_KEY,
];

/// Everything needed to restore a session, stored as one JSON value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(flatten)]
    pub roles: RoleFlags,
}

impl PersistedSession {
    /// Reads the record, migrating legacy keys when no record exists.
    ///
    /// Records that do not decode or carry a blank token are removed and
    /// reported as absent.
    pub fn load(storage: &dyn SessionStorage) -> Result<Option<Self>, StorageError> {
        let Some(raw) = storage.get(SESSION_KEY)? else {
            return Self::migrate_legacy(storage);
        };

        match serde_json::from_str::<Self>(&raw) {
            Ok(record) if !record.token.trim().is_empty() => Ok(Some(record)),
            Ok(_) => {
                warn!("discarding persisted session without a token");
                storage.remove(SESSION_KEY)?;
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "discarding undecodable persisted session");
                storage.remove(SESSION_KEY)?;
                Ok(None)
            }
        }
    }

    /// Writes the record under [`SESSION_KEY`].
    pub fn save(&self, storage: &dyn SessionStorage) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(self).map_err(|err| StorageError::Corrupt {
            path: SESSION_KEY.to_string(),
            message: err.to_string(),
        })?;
        storage.set(SESSION_KEY, &serialized)
    }

    /// Removes every session artifact. All keys are attempted even if one
    /// fails; the first failure is returned.
    pub fn clear(storage: &dyn SessionStorage) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in ALL_KEYS {
            if let Err(err) = storage.remove(key) {
                warn!(key, error = %err, "failed to remove session key");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn migrate_legacy(storage: &dyn SessionStorage) -> Result<Option<Self>, StorageError> {
        let token = storage
            .get(LEGACY_TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty());

        let Some(token) = token else {
            let mut partial = false;
            for key in LEGACY_KEYS {
                if storage.get(key)?.is_some() {
                    partial = true;
                    storage.remove(key)?;
                }
            }
            if partial {
                warn!("discarded legacy session keys without a bearer token");
            }
            return Ok(None);
        };

        let user = storage
            .get(LEGACY_USER_KEY)?
            .and_then(|raw| serde_json::from_str::<UserProfile>(&raw).ok());
        let roles = RoleFlags {
            is_admin: storage.get(LEGACY_ADMIN_KEY)?.as_deref() == Some("true"),
            is_manager: storage.get(LEGACY_MANAGER_KEY)?.as_deref() == Some("true"),
        };
        let record = Self { token, user, roles };
        record.save(storage)?;
        for key in LEGACY_KEYS {
            storage.remove(key)?;
        }
        debug!("migrated legacy session keys into a single record");
        Ok(Some(record))
    }
}

/// Bearer token of the persisted session, if any.
pub fn stored_token(storage: &dyn SessionStorage) -> Result<Option<String>, StorageError> {
    Ok(PersistedSession::load(storage)?.map(|record| record.token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn record() -> PersistedSession {
        PersistedSession {
            token: "abc123".into(),
            user: Some(UserProfile::from_claims("Jane Doe", vec!["ROLE_ADMIN".into()])),
            roles: RoleFlags {
                is_admin: true,
                is_manager: false,
            },
        }
    }

    #[test]
    fn record_roundtrips_through_one_key() {
        let storage = MemoryStorage::new();
        record().save(&storage).unwrap();

        assert_eq!(storage.keys(), vec![SESSION_KEY.to_string()]);
        let raw = storage.get(SESSION_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""isAdmin":true"#));
        assert_eq!(PersistedSession::load(&storage).unwrap(), Some(record()));
        assert_eq!(stored_token(&storage).unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn corrupt_or_tokenless_records_are_discarded() {
        let storage = MemoryStorage::new();
        storage.set(SESSION_KEY, "{not json").unwrap();
        assert!(PersistedSession::load(&storage).unwrap().is_none());
        assert!(storage.get(SESSION_KEY).unwrap().is_none());

        storage
            .set(SESSION_KEY, r#"{"token":"  ","isAdmin":true}"#)
            .unwrap();
        assert!(PersistedSession::load(&storage).unwrap().is_none());
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn legacy_keys_migrate_into_record() {
        let storage = MemoryStorage::new();
        storage.set(LEGACY_TOKEN_KEY, "legacy-token").unwrap();
        storage
            .set(LEGACY_USER_KEY, r#"{"fullName":"Jane Doe","roles":["ROLE_MANAGER"]}"#)
            .unwrap();
        storage.set(LEGACY_MANAGER_KEY, "true").unwrap();
        storage.set(CSRF_TOKEN_KEY, "csrf").unwrap();

        let migrated = PersistedSession::load(&storage).unwrap().unwrap();
        assert_eq!(migrated.token, "legacy-token");
        assert!(migrated.roles.is_manager);
        assert!(!migrated.roles.is_admin);
        assert_eq!(
            migrated.user.as_ref().map(|user| user.full_name.as_str()),
            Some("Jane Doe")
        );
        assert_eq!(
            storage.keys(),
            vec![CSRF_TOKEN_KEY.to_string(), SESSION_KEY.to_string()]
        );
    }

    #[test]
    fn partial_legacy_state_is_discarded() {
        let storage = MemoryStorage::new();
        storage.set(LEGACY_ADMIN_KEY, "true").unwrap();
        storage.set(LEGACY_USER_KEY, r#"{"fullName":"Ghost"}"#).unwrap();

        assert!(PersistedSession::load(&storage).unwrap().is_none());
        assert!(storage.keys().is_empty());
    }

    #[test]
    fn clear_removes_every_key() {
        let storage = MemoryStorage::new();
        for key in ALL_KEYS {
            storage.set(key, "value").unwrap();
        }
        PersistedSession::clear(&storage).unwrap();
        assert!(storage.keys().is_empty());
    }
}
