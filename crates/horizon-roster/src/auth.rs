//! Console sign-in.
//!
//! The console signs in with an account password, an emailed code or a
//! texted code, and can reset a password with a texted code. The backend is
//! abstracted by [`AuthProvider`]; [`AuthService`] validates input before
//! the provider sees it and keeps track of the current [`Session`].
//!
//! # Example
//!
//! ```
//! use horizon_roster::auth::{AuthService, CodeTarget, Credentials, InMemoryAuthProvider};
//!
//! let provider = InMemoryAuthProvider::new()
//!     .with_account("admin", "secret1")
//!     .with_fixed_code("246810");
//! let auth = AuthService::new(provider);
//!
//! auth.send_code(&CodeTarget::Phone("13800138000".into())).unwrap();
//! let session = auth
//!     .sign_in(&Credentials::PhoneCode {
//!         phone: "13800138000".into(),
//!         code: "246810".into(),
//!     })
//!     .unwrap();
//!
//! assert_eq!(session.account, "13800138000");
//! assert!(auth.is_signed_in());
//! ```

use std::collections::HashMap;
use std::fmt;

use parking_lot::{Mutex, RwLock};

use horizon_roster_core::Signal;
use horizon_roster_core::logging::targets;

use crate::error::AuthError;

/// Minimum length of a new password, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Where a verification code is sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodeTarget {
    /// Text message to a phone number.
    Phone(String),
    /// Email to an address.
    Email(String),
}

impl CodeTarget {
    /// Rejects an empty phone number or address.
    pub fn validate(&self) -> Result<(), AuthError> {
        match self {
            CodeTarget::Phone(phone) => require("phone", phone),
            CodeTarget::Email(email) => require("email", email),
        }
    }

    fn address(&self) -> &str {
        match self {
            CodeTarget::Phone(s) | CodeTarget::Email(s) => s,
        }
    }
}

/// Sign-in credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Account name and password.
    Password { account: String, password: String },
    /// Email address and the code sent to it.
    EmailCode { email: String, code: String },
    /// Phone number and the code sent to it.
    PhoneCode { phone: String, code: String },
}

impl Credentials {
    /// Rejects credentials with an empty field.
    pub fn validate(&self) -> Result<(), AuthError> {
        match self {
            Credentials::Password { account, password } => {
                require("account", account)?;
                require("password", password)
            }
            Credentials::EmailCode { email, code } => {
                require("email", email)?;
                require("code", code)
            }
            Credentials::PhoneCode { phone, code } => {
                require("phone", phone)?;
                require("code", code)
            }
        }
    }

    /// The account the credentials sign in to.
    pub fn account(&self) -> &str {
        match self {
            Credentials::Password { account, .. } => account,
            Credentials::EmailCode { email, .. } => email,
            Credentials::PhoneCode { phone, .. } => phone,
        }
    }

    /// Short name of the sign-in method, for logs.
    pub fn method(&self) -> &'static str {
        match self {
            Credentials::Password { .. } => "password",
            Credentials::EmailCode { .. } => "email-code",
            Credentials::PhoneCode { .. } => "phone-code",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("method", &self.method())
            .field("account", &self.account())
            .finish_non_exhaustive()
    }
}

/// A password reset request, confirmed by a texted code.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordReset {
    /// Phone number the code was sent to.
    pub phone: String,
    /// The code.
    pub code: String,
    /// New password.
    pub new_password: String,
    /// New password, typed again.
    pub confirm_password: String,
}

impl PasswordReset {
    /// Checks that every field is filled, the passwords match and the new
    /// password is long enough.
    pub fn validate(&self) -> Result<(), AuthError> {
        require("phone", &self.phone)?;
        require("code", &self.code)?;
        require("new_password", &self.new_password)?;
        require("confirm_password", &self.confirm_password)?;
        if self.new_password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordReset")
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(())
    }
}

/// A signed-in session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// The signed-in account.
    pub account: String,
    /// Opaque session token issued by the provider.
    pub token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

/// Authentication backend.
///
/// Providers receive input that has already passed validation.
pub trait AuthProvider: Send + Sync {
    /// Sends a verification code.
    fn send_code(&self, target: &CodeTarget) -> Result<(), AuthError>;

    /// Signs in.
    fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Ends a session.
    fn sign_out(&self, session: &Session) -> Result<(), AuthError>;

    /// Sets a new password.
    fn reset_password(&self, reset: &PasswordReset) -> Result<(), AuthError>;
}

/// Validates requests and tracks the current session.
pub struct AuthService<P> {
    provider: P,
    session: RwLock<Option<Session>>,
    /// Emitted with the new session on sign-in and `None` on sign-out.
    pub session_changed: Signal<Option<Session>>,
}

impl<P> fmt::Debug for AuthService<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("session", &*self.session.read())
            .finish_non_exhaustive()
    }
}

impl<P: AuthProvider> AuthService<P> {
    /// Creates a signed-out service.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            session: RwLock::new(None),
            session_changed: Signal::new(),
        }
    }

    /// Returns the provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the current session.
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// Returns `true` while a session is active.
    pub fn is_signed_in(&self) -> bool {
        self.session.read().is_some()
    }

    /// Sends a verification code.
    pub fn send_code(&self, target: &CodeTarget) -> Result<(), AuthError> {
        target.validate()?;
        self.provider.send_code(target)?;
        tracing::debug!(target: targets::AUTH, to = target.address(), "verification code sent");
        Ok(())
    }

    /// Signs in, replacing any current session.
    pub fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        credentials.validate()?;
        let session = match self.provider.sign_in(credentials) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(
                    target: targets::AUTH,
                    method = credentials.method(),
                    account = credentials.account(),
                    error = %err,
                    "sign-in failed"
                );
                return Err(err);
            }
        };

        *self.session.write() = Some(session.clone());
        tracing::info!(
            target: targets::AUTH,
            method = credentials.method(),
            account = %session.account,
            "signed in"
        );
        self.session_changed.emit(Some(session.clone()));
        Ok(session)
    }

    /// Ends the current session.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.session().ok_or(AuthError::NotSignedIn)?;
        self.provider.sign_out(&session)?;
        *self.session.write() = None;
        tracing::info!(target: targets::AUTH, account = %session.account, "signed out");
        self.session_changed.emit(None);
        Ok(())
    }

    /// Resets a password.
    pub fn reset_password(&self, reset: &PasswordReset) -> Result<(), AuthError> {
        reset.validate()?;
        self.provider.reset_password(reset)?;
        tracing::info!(target: targets::AUTH, phone = %reset.phone, "password reset");
        Ok(())
    }
}

/// In-memory provider for demos and tests.
///
/// Every sent code is the provider's fixed code. A code is consumed by a
/// successful sign-in or reset.
#[derive(Debug)]
pub struct InMemoryAuthProvider {
    accounts: Mutex<HashMap<String, String>>,
    pending_codes: Mutex<HashMap<String, String>>,
    fixed_code: String,
    next_token: Mutex<u64>,
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            pending_codes: Mutex::new(HashMap::new()),
            fixed_code: "123456".to_string(),
            next_token: Mutex::new(1),
        }
    }
}

impl InMemoryAuthProvider {
    /// Creates a provider with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account.
    #[must_use]
    pub fn with_account(self, account: impl Into<String>, password: impl Into<String>) -> Self {
        self.accounts.lock().insert(account.into(), password.into());
        self
    }

    /// Sets the code every `send_code` issues.
    #[must_use]
    pub fn with_fixed_code(mut self, code: impl Into<String>) -> Self {
        self.fixed_code = code.into();
        self
    }

    /// Returns `true` if `account` is registered with `password`.
    pub fn has_password(&self, account: &str, password: &str) -> bool {
        self.accounts.lock().get(account).is_some_and(|p| p == password)
    }

    fn consume_code(&self, address: &str, code: &str) -> Result<(), AuthError> {
        let mut pending = self.pending_codes.lock();
        match pending.get(address) {
            Some(expected) if expected == code => {
                pending.remove(address);
                Ok(())
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    fn issue(&self, account: &str) -> Session {
        let mut next = self.next_token.lock();
        let token = format!("session-{}", *next);
        *next += 1;
        Session {
            account: account.to_string(),
            token,
        }
    }
}

impl AuthProvider for InMemoryAuthProvider {
    fn send_code(&self, target: &CodeTarget) -> Result<(), AuthError> {
        self.pending_codes
            .lock()
            .insert(target.address().to_string(), self.fixed_code.clone());
        Ok(())
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        match credentials {
            Credentials::Password { account, password } => {
                if !self.has_password(account, password) {
                    return Err(AuthError::InvalidCredentials);
                }
            }
            Credentials::EmailCode { email, code } => self.consume_code(email, code)?,
            Credentials::PhoneCode { phone, code } => self.consume_code(phone, code)?,
        }
        Ok(self.issue(credentials.account()))
    }

    fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        Ok(())
    }

    fn reset_password(&self, reset: &PasswordReset) -> Result<(), AuthError> {
        self.consume_code(&reset.phone, &reset.code)?;
        self.accounts
            .lock()
            .insert(reset.phone.clone(), reset.new_password.clone());
        Ok(())
    }
}

static_assertions::assert_impl_all!(AuthService<InMemoryAuthProvider>: Send, Sync);
