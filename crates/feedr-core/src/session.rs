//! Client-side session lifecycle.
//!
//! [`SessionStore`] is the sole mutator of session state and the single
//! source of truth other components read from. It is constructed once at
//! startup and injected into consumers; there is no ambient global session.
//!
//! The state machine has two states: Anonymous (no user) and Authenticated
//! (user present). `login` is the only Anonymous→Authenticated transition,
//! conditional on two chained network calls; `logout` is the only reverse
//! transition and is unconditional. A failed `login` leaves the state
//! Anonymous.

use anyhow::Result;
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::api::types::{LoginRequest, User};
use crate::store::{KvStore, keys};

/// Owner of the in-memory session state (current user, current credential).
pub struct SessionStore {
    api: ApiClient,
    store: KvStore,
    user_tx: watch::Sender<Option<User>>,
}

impl SessionStore {
    /// Creates a session store, seeding the in-memory user from whatever
    /// was last persisted.
    pub fn new(api: ApiClient, store: KvStore) -> Self {
        let user = store.get::<User>(keys::USER);
        let (user_tx, _) = watch::channel(user);
        Self {
            api,
            store,
            user_tx,
        }
    }

    /// Returns the user of the current session, if authenticated.
    pub fn current_user(&self) -> Option<User> {
        self.user_tx.borrow().clone()
    }

    /// Returns whether a session user is present.
    pub fn is_authenticated(&self) -> bool {
        self.user_tx.borrow().is_some()
    }

    /// Subscribes to session transitions.
    ///
    /// The channel is only signalled when the user actually changes, so
    /// subscribers react exactly on Anonymous⇄Authenticated transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user_tx.subscribe()
    }

    /// The API client every session-scoped request goes through.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The persistent store backing this session.
    pub fn store(&self) -> &KvStore {
        &self.store
    }

    /// Performs the login exchange and, on success, caches and persists the
    /// resulting session.
    ///
    /// Returns `Ok(false)` when the server rejects the credentials, the
    /// response carries no usable token, or the follow-up profile fetch does
    /// not succeed; prior session state is left untouched in every failure
    /// case, including a failed re-login over an existing session. Transport
    /// failures propagate as errors.
    ///
    /// Taking `&mut self` serializes logins: at most one can be in flight
    /// per store, so rapid repeated attempts cannot race on the persisted
    /// credential/user pair.
    pub async fn login(&mut self, credentials: LoginRequest) -> Result<bool> {
        let Some(token) = self.api.login(&credentials).await? else {
            return Ok(false);
        };

        // The persisted token must land before the profile fetch so the
        // request client picks it up. The prior token (if any) is snapshot
        // first: a failed profile fetch must not strand the previous
        // session's user without its credential.
        let previous_token = self.store.get::<String>(keys::TOKEN);
        self.store.set(keys::TOKEN, &token);

        let profile = match self.api.current_user().await {
            Ok(profile) => profile,
            Err(err) => {
                // Roll back rather than leave an orphaned credential with
                // no confirmed user.
                self.restore_token(previous_token.as_deref());
                return Err(err);
            }
        };

        let Some(user) = profile else {
            self.restore_token(previous_token.as_deref());
            return Ok(false);
        };

        self.store.set(keys::USER, &user);
        self.publish(Some(user));
        Ok(true)
    }

    /// Clears the in-memory user and the persisted credential/user pair.
    ///
    /// Always succeeds, requires no network call, and is idempotent.
    pub fn logout(&mut self) {
        self.store.remove(keys::TOKEN);
        self.store.remove(keys::USER);
        self.publish(None);
    }

    /// Puts the persisted credential back the way it was before a failed
    /// login: the prior token when one existed, absent otherwise. Keeps the
    /// user and credential jointly present or jointly absent.
    fn restore_token(&self, previous: Option<&str>) {
        match previous {
            Some(token) => self.store.set(keys::TOKEN, &token),
            None => self.store.remove(keys::TOKEN),
        }
    }

    fn publish(&self, user: Option<User>) {
        self.user_tx.send_if_modified(|current| {
            if *current == user {
                false
            } else {
                *current = user;
                true
            }
        });
    }
}
