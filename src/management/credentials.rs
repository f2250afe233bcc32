use std::sync::Mutex;

use crate::{Res, types::CredentialRecord};

pub const CREDENTIAL_SERVICE: &str = "spotti";
pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Durable home of the access/refresh token pair across runs.
///
/// `load` returns `None` unless both secrets are present; a half-written
/// record counts as "not authenticated", never as an error.
pub trait CredentialStore {
    fn load(&self) -> Res<Option<CredentialRecord>>;
    fn save(&self, record: &CredentialRecord) -> Res<()>;
    fn clear(&self) -> Res<()>;
}

/// Platform keychain backed store (Keychain, Credential Manager, Secret Service).
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Store whose two secrets live under `service` in the platform keychain.
    ///
    /// # Arguments
    ///
    /// * `service` - Keychain service name; [`CREDENTIAL_SERVICE`] by default
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Res<keyring::Entry> {
        Ok(keyring::Entry::new(&self.service, key)?)
    }

    /// Reads one secret; a missing or empty entry is `None`.
    fn read(&self, key: &str) -> Res<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) if !value.is_empty() => Ok(Some(value)),
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes one secret; deleting an absent entry succeeds.
    fn remove(&self, key: &str) -> Res<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(CREDENTIAL_SERVICE)
    }
}

impl CredentialStore for KeyringStore {
    fn load(&self) -> Res<Option<CredentialRecord>> {
        let Some(token) = self.read(TOKEN_KEY)? else {
            return Ok(None);
        };
        let Some(refresh_token) = self.read(REFRESH_TOKEN_KEY)? else {
            return Ok(None);
        };
        Ok(Some(CredentialRecord {
            token,
            refresh_token,
        }))
    }

    fn save(&self, record: &CredentialRecord) -> Res<()> {
        for (key, secret) in write_order(record) {
            self.entry(key)?.set_password(secret)?;
        }
        Ok(())
    }

    fn clear(&self) -> Res<()> {
        self.remove(TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)
    }
}

/// Keys and secrets in the order `save` writes them. The refresh token goes
/// first: an interrupted save leaves a stale access token next to a fresh
/// refresh token, and a stale access token is repaired by one refresh.
fn write_order(record: &CredentialRecord) -> [(&'static str, &str); 2] {
    [
        (REFRESH_TOKEN_KEY, record.refresh_token.as_str()),
        (TOKEN_KEY, record.token.as_str()),
    ]
}

/// Process-local store, for tests and for machines without a keychain.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<CredentialRecord>>,
}

impl MemoryStore {
    /// Store that starts out holding `record`.
    pub fn with_record(record: CredentialRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Res<Option<CredentialRecord>> {
        Ok(self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, record: &CredentialRecord) -> Res<()> {
        *self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Res<()> {
        *self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}
