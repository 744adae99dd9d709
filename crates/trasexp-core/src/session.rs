//! Client session and its persistence
//!
//! The session is loaded once at startup and written back after every
//! change. On disk it is a flat map of string keys to string values; the
//! user record is stored as JSON text under `user`.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::{AuthResponse, StoredUser};
use crate::store::{Store, SubscriptionId};
use trasexp_config::ThemeMode;

const KEY_AUTH_TOKEN: &str = "authToken";
const KEY_USER: &str = "user";
const KEY_SELECTED_ACCOUNT: &str = "selectedAccountId";
const KEY_THEME: &str = "trasexp-theme";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    pub user: Option<StoredUser>,
    pub selected_account_id: Option<String>,
    pub theme: Option<ThemeMode>,
}

impl Session {
    /// Signed in only when both the token and the user are present
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some() && self.user.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.user_id.as_str())
    }

    pub fn to_entries(&self) -> CoreResult<BTreeMap<String, String>> {
        let mut entries = BTreeMap::new();
        if let Some(ref token) = self.auth_token {
            entries.insert(KEY_AUTH_TOKEN.to_string(), token.clone());
        }
        if let Some(ref user) = self.user {
            let json = serde_json::to_string(user).map_err(|e| CoreError::SessionError {
                message: e.to_string(),
            })?;
            entries.insert(KEY_USER.to_string(), json);
        }
        if let Some(ref id) = self.selected_account_id {
            entries.insert(KEY_SELECTED_ACCOUNT.to_string(), id.clone());
        }
        if let Some(theme) = self.theme {
            entries.insert(KEY_THEME.to_string(), theme.to_string());
        }
        Ok(entries)
    }

    /// Rebuild a session from stored entries; unreadable values are dropped
    pub fn from_entries(entries: &BTreeMap<String, String>) -> Self {
        let user = entries.get(KEY_USER).and_then(|raw| {
            serde_json::from_str::<StoredUser>(raw)
                .map_err(|e| log::warn!("Discarding unreadable stored user: {}", e))
                .ok()
        });
        let theme = entries.get(KEY_THEME).and_then(|raw| raw.parse().ok());
        let selected_account_id = entries
            .get(KEY_SELECTED_ACCOUNT)
            .filter(|id| !id.is_empty() && id.as_str() != "null")
            .cloned();

        Self {
            auth_token: entries.get(KEY_AUTH_TOKEN).filter(|t| !t.is_empty()).cloned(),
            user,
            selected_account_id,
            theme,
        }
    }
}

/// Persistence boundary of the session
pub trait SessionStore: Send + Sync {
    fn load(&self) -> CoreResult<Session>;
    fn save(&self, session: &Session) -> CoreResult<()>;
}

/// Session kept in a JSON file.
///
/// Clones share one write lock, so saves never interleave on the
/// temporary file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> CoreResult<Session> {
        if !self.path.exists() {
            log::debug!("No session file at {}, starting signed out", self.path.display());
            return Ok(Session::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Session::default());
        }
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|e| CoreError::SessionError {
                message: format!("{}: {}", self.path.display(), e),
            })?;
        Ok(Session::from_entries(&entries))
    }

    fn save(&self, session: &Session) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&session.to_entries()?).map_err(|e| {
            CoreError::SessionError {
                message: e.to_string(),
            }
        })?;
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory session store, for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    saved: Mutex<Session>,
    saves: Mutex<usize>,
}

impl MemorySessionStore {
    pub fn new(initial: Session) -> Self {
        Self {
            saved: Mutex::new(initial),
            saves: Mutex::new(0),
        }
    }

    pub fn saved(&self) -> Session {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> CoreResult<Session> {
        Ok(self.saved())
    }

    fn save(&self, session: &Session) -> CoreResult<()> {
        *self.saved.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = session.clone();
        *self.saves.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        Ok(())
    }
}

/// Shared, observable session that saves itself on every change
#[derive(Clone)]
pub struct SessionHandle {
    store: Store<Session>,
}

impl SessionHandle {
    /// Load the session once and persist it after each update.
    ///
    /// A session that cannot be read is replaced by a signed-out one.
    pub fn open(persistence: Arc<dyn SessionStore>) -> Self {
        Self::open_with_logger(persistence, Arc::new(DefaultErrorLogger))
    }

    /// Like [`SessionHandle::open`], reporting load and save failures to
    /// `logger`
    pub fn open_with_logger(persistence: Arc<dyn SessionStore>, logger: Arc<dyn ErrorLogger>) -> Self {
        let initial = persistence.load().unwrap_or_else(|e| {
            logger.log_error(&e, &ErrorContext::new("load_session"));
            logger.log_warning("Starting signed out", &ErrorContext::new("load_session"));
            Session::default()
        });
        let store = Store::new(initial);
        store.subscribe(move |session: &Session| {
            if let Err(e) = persistence.save(session) {
                let context = ErrorContext::new("save_session")
                    .with_user_id(session.user_id().map(str::to_string));
                logger.log_error(&e, &context);
            }
        });
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemorySessionStore::default()))
    }

    pub fn get(&self) -> Session {
        self.store.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&Session) + Send + Sync + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Store the token and user returned by login or registration
    pub fn sign_in(&self, auth: &AuthResponse) {
        let user = StoredUser::from(auth);
        log::info!("Signed in as {}", user.email);
        self.store.update(|session| {
            if let Some(ref token) = auth.token {
                session.auth_token = Some(token.clone());
            }
            session.user = Some(user);
        });
    }

    /// Forget the user along with the account they had selected
    pub fn sign_out(&self) {
        self.store.update(|session| {
            session.auth_token = None;
            session.user = None;
            session.selected_account_id = None;
        });
    }

    /// Drop credentials the backend rejected
    pub fn clear_auth(&self) {
        self.store.update(|session| {
            session.auth_token = None;
            session.user = None;
        });
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.select(Session::is_authenticated)
    }

    pub fn token(&self) -> Option<String> {
        self.store.select(|session| session.auth_token.clone())
    }

    pub fn user(&self) -> Option<StoredUser> {
        self.store.select(|session| session.user.clone())
    }

    pub fn user_id(&self) -> Option<String> {
        self.store.select(|session| session.user_id().map(str::to_string))
    }

    pub fn selected_account_id(&self) -> Option<String> {
        self.store.select(|session| session.selected_account_id.clone())
    }

    pub fn select_account(&self, id: Option<String>) {
        self.store.update(|session| session.selected_account_id = id);
    }

    pub fn theme(&self) -> Option<ThemeMode> {
        self.store.select(|session| session.theme)
    }

    pub fn set_theme(&self, theme: ThemeMode) {
        self.store.update(|session| session.theme = Some(theme));
    }
}
