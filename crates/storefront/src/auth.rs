//! Account and order-history store.
//!
//! Manages a single signed-in user, the persisted user directory, and the
//! persisted order collection. Account operations validate and sanitize
//! their input, simulate network latency, and report failures as returned
//! errors - nothing here panics on bad input.
//!
//! Passwords are stored and compared as plain opaque strings. That is a
//! deliberate behavioral port of the source system; hashing would change
//! the persisted record format.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use teahouse_core::{OrderId, OrderStatus, UserId};

use crate::models::{Order, OrderDraft, UserAccount, UserProfile};
use crate::storage::LocalStore;
use crate::validation::{
    FieldErrors, OrderForm, sanitize_input, validate_fields, validate_order_form,
};

/// Storage key for the registered-user directory.
pub const USERS_KEY: &str = "teahouse_users";
/// Storage key for the signed-in user record.
pub const CURRENT_USER_KEY: &str = "teahouse_current_user";
/// Storage key for the all-orders collection.
pub const ORDERS_KEY: &str = "teahouse_orders";

/// Errors surfaced by account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email does not look like an email at all.
    #[error("email is not valid")]
    InvalidEmail,

    /// No directory entry matches the supplied email and password.
    #[error("email or password is incorrect")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("this email is already registered")]
    EmailTaken,

    /// The operation requires a signed-in user.
    #[error("no user is signed in")]
    NotSignedIn,

    /// One or more fields failed validation.
    #[error("input is not valid: {}", format_field_errors(.0))]
    Validation(FieldErrors),
}

fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub address: String,
}

/// Profile fields a signed-in user may change.
///
/// The password is deliberately absent; there is no password-change path
/// in this store.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Store for the signed-in user, the user directory, and order history.
pub struct AuthStore {
    store: LocalStore,
    latency: Duration,
    current: RwLock<Option<UserProfile>>,
    orders: RwLock<Vec<Order>>,
}

impl AuthStore {
    /// Create an auth store.
    ///
    /// `latency` is the simulated network delay applied to login, register,
    /// and profile updates; tests pass `Duration::ZERO`.
    #[must_use]
    pub fn new(store: LocalStore, latency: Duration) -> Self {
        Self {
            store,
            latency,
            current: RwLock::new(None),
            orders: RwLock::new(Vec::new()),
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.read_current().clone()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_current().is_some()
    }

    /// Display name of the signed-in user, empty when signed out.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.read_current()
            .as_ref()
            .map_or_else(String::new, |user| user.display_name().to_string())
    }

    /// The signed-in user's order history, newest first.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.orders
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Sign in with email and password.
    ///
    /// The email is sanitized before lookup; the password is compared
    /// verbatim against the directory entry. On success the matched record
    /// is stored password-stripped as the current user and the user's
    /// order history is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidEmail`] or [`AuthError::InvalidCredentials`].
    pub async fn login(&self, credentials: Credentials) -> Result<UserProfile, AuthError> {
        let email = sanitize_input(&credentials.email);
        if !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }

        tokio::time::sleep(self.latency).await;

        let directory: Vec<UserAccount> = self.store.get_or(USERS_KEY, Vec::new());
        let account = directory
            .iter()
            .find(|u| u.email == email && u.password == credentials.password)
            .ok_or(AuthError::InvalidCredentials)?;

        let profile = account.profile();
        self.store.set(CURRENT_USER_KEY, &profile);
        *self.write_current() = Some(profile.clone());
        self.load_orders();

        info!(user = %profile.id, "user signed in");
        Ok(profile)
    }

    /// Register a new account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] with the aggregated per-field
    /// errors, or [`AuthError::EmailTaken`] when the sanitized email is
    /// already in the directory.
    pub async fn register(&self, registration: Registration) -> Result<UserProfile, AuthError> {
        let mut fields = BTreeMap::new();
        fields.insert("email".to_string(), registration.email.clone());
        fields.insert("password".to_string(), registration.password.clone());
        fields.insert("fullName".to_string(), registration.full_name.clone());
        fields.insert("phone".to_string(), registration.phone.clone());
        fields.insert("address".to_string(), registration.address.clone());

        let report = validate_fields(&fields);
        if !report.is_valid() {
            return Err(AuthError::Validation(report.errors));
        }

        tokio::time::sleep(self.latency).await;

        let field = |name: &str| report.sanitized.get(name).cloned().unwrap_or_default();
        let email = field("email");

        let mut directory: Vec<UserAccount> = self.store.get_or(USERS_KEY, Vec::new());
        if directory.iter().any(|u| u.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let account = UserAccount {
            id: UserId::new(Uuid::new_v4().to_string()),
            email,
            // the password is stored as supplied, not the sanitized copy
            password: registration.password,
            full_name: field("fullName"),
            phone: field("phone"),
            address: field("address"),
            created_at: Utc::now(),
        };

        directory.push(account.clone());
        self.store.set(USERS_KEY, &directory);

        // auto sign-in after registration
        let profile = account.profile();
        self.store.set(CURRENT_USER_KEY, &profile);
        *self.write_current() = Some(profile.clone());
        self.load_orders();

        info!(user = %profile.id, "user registered");
        Ok(profile)
    }

    /// Sign out.
    ///
    /// Clears the current user and the in-memory order list. The persisted
    /// directory and order collection are untouched.
    pub fn logout(&self) {
        *self.write_current() = None;
        self.orders
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
        self.store.remove(CURRENT_USER_KEY);
        debug!("user signed out");
    }

    /// Restore a previously persisted session, if any.
    ///
    /// A malformed stored record clears the stale entry silently instead of
    /// propagating the parse failure.
    pub fn check_auth_status(&self) {
        match self.store.get::<UserProfile>(CURRENT_USER_KEY) {
            Some(profile) => {
                debug!(user = %profile.id, "restored session");
                *self.write_current() = Some(profile);
                self.load_orders();
            }
            None => {
                // absent or stale; either way there is nothing to restore
                self.store.remove(CURRENT_USER_KEY);
            }
        }
    }

    /// Record a new order for the signed-in user.
    ///
    /// The draft's checkout form is validated first - at checkout the phone
    /// is required, the delivery address must be at least 10 characters,
    /// and a payment method must be chosen. The order is then created with
    /// a synthetic id and `pending` status and prepended to both the
    /// in-memory list and the persisted collection.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] when no user is signed in, or
    /// [`AuthError::Validation`] when the checkout form is incomplete.
    pub fn add_order(&self, draft: OrderDraft) -> Result<Order, AuthError> {
        let user_id = self
            .read_current()
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or(AuthError::NotSignedIn)?;

        let form = OrderForm {
            full_name: draft.customer.full_name.clone(),
            phone: draft.customer.phone.clone(),
            email: draft.customer.email.clone(),
            address: draft.customer.address.clone(),
            payment_method: draft.payment_method.clone(),
        };
        let errors = validate_order_form(&form);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let order = Order {
            id: OrderId::new(Uuid::new_v4().to_string()),
            user_id,
            items: draft.items,
            total: draft.total,
            customer: draft.customer,
            order_date: Utc::now(),
            status: OrderStatus::Pending,
        };

        self.orders
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(0, order.clone());

        let mut all_orders: Vec<Order> = self.store.get_or(ORDERS_KEY, Vec::new());
        all_orders.insert(0, order.clone());
        self.store.set(ORDERS_KEY, &all_orders);

        info!(order = %order.id, total = %order.total, "order recorded");
        Ok(order)
    }

    /// Load the signed-in user's orders from the persisted collection.
    ///
    /// Returns an empty list when signed out.
    pub fn load_orders(&self) -> Vec<Order> {
        let Some(user_id) = self.read_current().as_ref().map(|u| u.id.clone()) else {
            return Vec::new();
        };

        let all_orders: Vec<Order> = self.store.get_or(ORDERS_KEY, Vec::new());
        let mine: Vec<Order> = all_orders
            .into_iter()
            .filter(|order| order.user_id == user_id)
            .collect();

        *self
            .orders
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = mine.clone();
        mine
    }

    /// Update the signed-in user's profile.
    ///
    /// All supplied fields are validated and sanitized, then merged into
    /// both the current-user record and the matching directory entry. The
    /// password is never touched here.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] or [`AuthError::Validation`].
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, AuthError> {
        if !self.is_authenticated() {
            return Err(AuthError::NotSignedIn);
        }

        let mut fields = BTreeMap::new();
        if let Some(email) = &update.email {
            fields.insert("email".to_string(), email.clone());
        }
        if let Some(full_name) = &update.full_name {
            fields.insert("fullName".to_string(), full_name.clone());
        }
        if let Some(phone) = &update.phone {
            fields.insert("phone".to_string(), phone.clone());
        }
        if let Some(address) = &update.address {
            fields.insert("address".to_string(), address.clone());
        }

        let report = validate_fields(&fields);
        if !report.is_valid() {
            return Err(AuthError::Validation(report.errors));
        }

        // profile updates simulate a lighter round-trip than login
        tokio::time::sleep(self.latency / 2).await;

        let mut current = self.write_current();
        let Some(profile) = current.as_mut() else {
            return Err(AuthError::NotSignedIn);
        };

        if let Some(email) = report.sanitized.get("email") {
            profile.email.clone_from(email);
        }
        if let Some(full_name) = report.sanitized.get("fullName") {
            profile.full_name.clone_from(full_name);
        }
        if let Some(phone) = report.sanitized.get("phone") {
            profile.phone.clone_from(phone);
        }
        if let Some(address) = report.sanitized.get("address") {
            profile.address.clone_from(address);
        }

        let profile = profile.clone();
        drop(current);

        self.store.set(CURRENT_USER_KEY, &profile);

        let mut directory: Vec<UserAccount> = self.store.get_or(USERS_KEY, Vec::new());
        if let Some(entry) = directory.iter_mut().find(|u| u.id == profile.id) {
            entry.email.clone_from(&profile.email);
            entry.full_name.clone_from(&profile.full_name);
            entry.phone.clone_from(&profile.phone);
            entry.address.clone_from(&profile.address);
            self.store.set(USERS_KEY, &directory);
        } else {
            warn!(user = %profile.id, "signed-in user missing from directory");
        }

        Ok(profile)
    }

    fn read_current(&self) -> std::sync::RwLockReadGuard<'_, Option<UserProfile>> {
        self.current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_current(&self) -> std::sync::RwLockWriteGuard<'_, Option<UserProfile>> {
        self.current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
