use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info, warn};

#[cfg(not(test))]
use std::time::Instant;

#[cfg(test)]
use mock_instant::Instant;

use shared_models::session::SessionUser;
use shared_storage::{KvStore, StorageError};

use crate::models::{ChallengeView, SessionError};

/// Mock verification: any login succeeds with exactly this code.
pub const VERIFICATION_CODE: &str = "123456";

pub const RESEND_COOLDOWN: Duration = Duration::from_secs(60);

const LOGIN_FLAG_KEY: &str = "is_logged_in";
const CONTACT_KEY: &str = "user_email";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid phone regex"));

struct Challenge {
    contact: String,
    issued_at: Instant,
}

#[derive(Default)]
struct SessionInner {
    user: Option<SessionUser>,
    challenge: Option<Challenge>,
}

/// Process-wide logged-in/logged-out state with a mocked email/code flow.
/// The flag and contact survive restarts through the injected store; the
/// booking engine never touches this.
pub struct SessionService {
    store: Arc<dyn KvStore>,
    inner: Mutex<SessionInner>,
}

impl SessionService {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            inner: Mutex::new(SessionInner::default()),
        }
    }

    /// Init lifecycle: re-read the persisted flag + contact, if present.
    pub fn restore_on_startup(&self) -> Result<Option<SessionUser>, SessionError> {
        let flag = self.store.get(LOGIN_FLAG_KEY).map_err(map_storage)?;
        let contact = self.store.get(CONTACT_KEY).map_err(map_storage)?;

        let user = match (flag.as_deref(), contact) {
            (Some("true"), Some(contact)) => {
                info!("Restored session for {}", contact);
                Some(SessionUser {
                    contact,
                    logged_in_at: None,
                })
            }
            _ => {
                debug!("No persisted session to restore");
                None
            }
        };

        let mut inner = self.lock();
        inner.user = user.clone();
        Ok(user)
    }

    /// Step 1: accept an email address or phone number and "send" the code.
    pub fn start_login(&self, contact: &str) -> Result<ChallengeView, SessionError> {
        let contact = contact.trim();
        if !EMAIL_RE.is_match(contact) && !PHONE_RE.is_match(contact) {
            return Err(SessionError::InvalidContact(contact.to_string()));
        }

        let mut inner = self.lock();
        inner.challenge = Some(Challenge {
            contact: contact.to_string(),
            issued_at: Instant::now(),
        });

        info!("Verification code issued for {}", contact);
        Ok(ChallengeView {
            contact: contact.to_string(),
            resend_in_secs: RESEND_COOLDOWN.as_secs(),
        })
    }

    /// Re-issue the code once the cooldown has elapsed.
    pub fn resend(&self) -> Result<ChallengeView, SessionError> {
        let mut inner = self.lock();
        let challenge = inner
            .challenge
            .as_mut()
            .ok_or(SessionError::NoPendingLogin)?;

        let elapsed = challenge.issued_at.elapsed();
        if elapsed < RESEND_COOLDOWN {
            let remaining_secs = (RESEND_COOLDOWN - elapsed).as_secs().max(1);
            return Err(SessionError::ResendCooldown { remaining_secs });
        }

        challenge.issued_at = Instant::now();
        info!("Verification code re-issued for {}", challenge.contact);
        Ok(ChallengeView {
            contact: challenge.contact.clone(),
            resend_in_secs: RESEND_COOLDOWN.as_secs(),
        })
    }

    /// Step 2: check the code against the fixed mock constant. Success
    /// persists the session; failure leaves both the store and the pending
    /// challenge untouched so the user can retry.
    pub fn verify(&self, code: &str) -> Result<SessionUser, SessionError> {
        let mut inner = self.lock();
        let challenge = inner.challenge.as_ref().ok_or(SessionError::NoPendingLogin)?;

        if code != VERIFICATION_CODE {
            warn!("Rejected verification code for {}", challenge.contact);
            return Err(SessionError::InvalidCode);
        }

        let user = SessionUser::new(&challenge.contact);
        self.store
            .set(LOGIN_FLAG_KEY, "true")
            .map_err(map_storage)?;
        self.store
            .set(CONTACT_KEY, &user.contact)
            .map_err(map_storage)?;

        info!("Logged in as {}", user.contact);
        inner.user = Some(user.clone());
        inner.challenge = None;
        Ok(user)
    }

    /// Teardown lifecycle: clear both persisted keys.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.store.remove(LOGIN_FLAG_KEY).map_err(map_storage)?;
        self.store.remove(CONTACT_KEY).map_err(map_storage)?;

        let mut inner = self.lock();
        if let Some(user) = inner.user.take() {
            info!("Logged out {}", user.contact);
        }
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock().user.is_some()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.lock().user.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        self.inner.lock().expect("session lock poisoned")
    }
}

fn map_storage(err: StorageError) -> SessionError {
    SessionError::Storage(err.to_string())
}
