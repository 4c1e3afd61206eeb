use kb_shared::{
    const_config::storage::{STORAGE_KEY_TOKEN, STORAGE_KEY_USER_INFO},
    log_err_as_warn,
    uac::UserIdentity,
};
use secrecy::{ExposeSecret as _, SecretString};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

use crate::storage::DurableStorage;

/// Owns the identity of the current user and the bearer credential.
///
/// The identity is held in memory and mirrored to durable storage on every
/// change. The token is only kept in durable storage, under its own key, so
/// the two can disagree (for example a token with no identity).
///
/// Cloning is cheap and all clones share the same state.
#[derive(Debug, Clone)]
pub struct IdentityStore {
    storage: Arc<dyn DurableStorage>,
    user_info: Arc<Mutex<Option<Arc<UserIdentity>>>>,
}

impl IdentityStore {
    /// Seeds the identity from whatever was persisted.
    ///
    /// Missing or unparsable data leaves the store empty. Failures are logged
    /// but never stop startup.
    #[tracing::instrument(name = "LOAD IDENTITY")]
    pub fn load(storage: Arc<dyn DurableStorage>) -> Self {
        let user_info = read_persisted_identity(storage.as_ref()).map(Arc::new);
        Self {
            storage,
            user_info: Arc::new(Mutex::new(user_info)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn login(&self, identity: UserIdentity) {
        match serde_json::to_string(&identity) {
            Ok(serialized) => {
                log_err_as_warn!(self.storage.set_item(STORAGE_KEY_USER_INFO, &serialized));
            }
            Err(err) => warn!(?err, "failed to serialize user info, not persisted"),
        }
        *self.lock() = Some(Arc::new(identity));
    }

    /// Clears the identity and the token
    #[tracing::instrument(skip(self))]
    pub fn logout(&self) {
        self.clear_identity();
        self.clear_token();
    }

    pub fn user_info(&self) -> Option<Arc<UserIdentity>> {
        self.lock().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|identity| identity.is_admin())
    }

    /// Reads the token from durable storage. Empty values count as absent.
    pub fn token(&self) -> Option<SecretString> {
        match self.storage.get_item(STORAGE_KEY_TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(err) => {
                warn!(?err, "failed to read token");
                None
            }
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn set_token(&self, token: &SecretString) {
        log_err_as_warn!(self
            .storage
            .set_item(STORAGE_KEY_TOKEN, token.expose_secret()));
    }

    pub fn clear_token(&self) {
        log_err_as_warn!(self.storage.remove_item(STORAGE_KEY_TOKEN));
    }

    /// Called when the server rejects the credential. The token is always
    /// removed, the identity only when `clear_identity` is set.
    #[tracing::instrument(skip(self))]
    pub fn expire_session(&self, clear_identity: bool) {
        self.clear_token();
        if clear_identity {
            self.clear_identity();
        }
    }

    fn clear_identity(&self) {
        *self.lock() = None;
        log_err_as_warn!(self.storage.remove_item(STORAGE_KEY_USER_INFO));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<UserIdentity>>> {
        self.user_info.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_persisted_identity(storage: &dyn DurableStorage) -> Option<UserIdentity> {
    let raw = match storage.get_item(STORAGE_KEY_USER_INFO) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("no persisted user info");
            return None;
        }
        Err(err) => {
            warn!(?err, "failed to read persisted user info");
            return None;
        }
    };
    // `null` is what gets stored if an empty identity was ever written
    match serde_json::from_str::<Option<UserIdentity>>(&raw) {
        Ok(identity) => identity,
        Err(err) => {
            warn!(?err, "persisted user info is corrupt, starting logged out");
            None
        }
    }
}
