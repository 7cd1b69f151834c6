//! Input validation and sanitization.
//!
//! Every validator reports problems as returned values - this layer never
//! panics and never returns `Err`. A `None` from a field validator means the
//! field is valid; `Some(message)` carries a human-readable description.
//!
//! Validation here is advisory: the backend is not assumed to re-check
//! anything, but nothing in this crate trusts unsanitized input either.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use teahouse_core::{Email, EmailError};

/// Field name to error message, one entry per invalid field.
pub type FieldErrors = BTreeMap<String, String>;

/// Maximum quantity for a single cart line.
pub const MAX_LINE_QUANTITY: u32 = 10;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    // Latin letters plus the Vietnamese diacritic range
    Regex::new(r"^[a-zA-ZÀ-ỹ\s]+$").unwrap()
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^(0|\+84)[3-9][0-9]{8}$").unwrap()
});

static JS_SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?i)javascript:").unwrap()
});

static EVENT_HANDLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?i)on\w+=").unwrap()
});

/// Quote/comment/union heuristics for injection-shaped input.
static SQL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    [
        r"(?i)(%27)|(')|(--)|(%23)|(#)",
        r"(?i)((%3D)|(=))[^\n]*((%27)|(')|(--)|(%3B)|(;))",
        r"(?i)\w*((%27)|('))((%6F)|o|(%4F))((%72)|r|(%52))",
        r"(?i)((%27)|('))union",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Strip markup-shaped and script-shaped substrings from user input.
///
/// Removes `<` and `>`, `javascript:` scheme prefixes, and inline
/// `on*=` event-handler patterns, then trims whitespace. Idempotent.
#[must_use]
pub fn sanitize_input(input: &str) -> String {
    let without_brackets: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
    let without_scheme = JS_SCHEME_RE.replace_all(&without_brackets, "");
    let without_handlers = EVENT_HANDLER_RE.replace_all(&without_scheme, "");
    without_handlers.trim().to_string()
}

/// Check a string against SQL-injection-like patterns.
#[must_use]
pub fn check_injection(input: &str) -> Option<String> {
    for pattern in SQL_PATTERNS.iter() {
        if pattern.is_match(input) {
            return Some("Input contains disallowed characters".to_string());
        }
    }
    None
}

/// Validate an email address.
#[must_use]
pub fn validate_email(email: &str) -> Option<String> {
    match Email::parse(email) {
        Ok(_) => None,
        Err(EmailError::Empty) => Some("Email must not be empty".to_string()),
        Err(EmailError::TooLong { max }) => Some(format!("Email must be at most {max} characters")),
        Err(EmailError::InvalidFormat) => Some("Email is not in a valid format".to_string()),
    }
}

/// Validate a password: 6-50 characters, at least one letter and one digit.
#[must_use]
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password must not be empty".to_string());
    }
    if password.len() < 6 {
        return Some("Password must be at least 6 characters".to_string());
    }
    if password.len() > 50 {
        return Some("Password must be at most 50 characters".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Some("Password must contain at least one letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one digit".to_string());
    }
    None
}

/// Validate a full name: 2-50 characters of letters and spaces.
#[must_use]
pub fn validate_full_name(full_name: &str) -> Option<String> {
    if full_name.is_empty() {
        return Some("Full name must not be empty".to_string());
    }
    if full_name.trim().chars().count() < 2 {
        return Some("Full name must be at least 2 characters".to_string());
    }
    if full_name.chars().count() > 50 {
        return Some("Full name must be at most 50 characters".to_string());
    }
    if !NAME_RE.is_match(full_name) {
        return Some("Full name may only contain letters and spaces".to_string());
    }
    None
}

/// Validate a phone number (optional field, Vietnamese mobile format).
#[must_use]
pub fn validate_phone(phone: &str) -> Option<String> {
    if phone.is_empty() {
        return None; // phone is optional
    }
    if !PHONE_RE.is_match(phone) {
        return Some("Phone number is not in a valid format (e.g. 0901234567)".to_string());
    }
    None
}

/// Validate an address (optional field, 5-200 characters).
#[must_use]
pub fn validate_address(address: &str) -> Option<String> {
    if address.is_empty() {
        return None; // address is optional
    }
    if address.chars().count() > 200 {
        return Some("Address must be at most 200 characters".to_string());
    }
    if address.trim().chars().count() < 5 {
        return Some("Address must be at least 5 characters".to_string());
    }
    None
}

/// The checkout form as submitted by the shopper.
#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub payment_method: String,
}

/// Validate a checkout form.
///
/// Stricter than the profile rules: the phone is required here, and the
/// delivery address must be at least 10 characters. Returns one entry per
/// invalid field; empty means the form may become an order.
#[must_use]
pub fn validate_order_form(form: &OrderForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(message) = validate_full_name(&form.full_name) {
        errors.insert("fullName".to_string(), message);
    }

    if form.phone.is_empty() {
        errors.insert(
            "phone".to_string(),
            "Phone number is required when placing an order".to_string(),
        );
    } else if let Some(message) = validate_phone(&form.phone) {
        errors.insert("phone".to_string(), message);
    }

    if let Some(message) = validate_email(&form.email) {
        errors.insert("email".to_string(), message);
    }

    if form.address.trim().chars().count() < 10 {
        errors.insert(
            "address".to_string(),
            "Delivery address must be at least 10 characters".to_string(),
        );
    }

    if form.payment_method.is_empty() {
        errors.insert(
            "paymentMethod".to_string(),
            "Please choose a payment method".to_string(),
        );
    }

    errors
}

/// Validate the fields of a cart line before it enters the cart.
#[must_use]
pub fn validate_cart_line(
    product_id: &str,
    name: &str,
    price: Decimal,
    quantity: u32,
) -> Option<String> {
    if product_id.is_empty() {
        return Some("Product id is not valid".to_string());
    }
    if name.is_empty() {
        return Some("Product name is not valid".to_string());
    }
    if price <= Decimal::ZERO {
        return Some("Product price is not valid".to_string());
    }
    if quantity == 0 {
        return Some("Quantity must be greater than zero".to_string());
    }
    if quantity > MAX_LINE_QUANTITY {
        return Some(format!("Quantity must not exceed {MAX_LINE_QUANTITY}"));
    }
    None
}

/// The result of running [`validate_fields`] over a field map.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Per-field error messages; empty when everything passed.
    pub errors: FieldErrors,
    /// The input map with every value sanitized.
    pub sanitized: BTreeMap<String, String>,
}

impl ValidationReport {
    /// Whether every field passed validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Sanitize and validate a map of user-supplied fields.
///
/// Every value is sanitized, then checked against the injection heuristics,
/// then against the rule for its field name (`email`, `password`, `fullName`,
/// `phone`, `address`). Unknown field names are sanitized but otherwise pass.
#[must_use]
pub fn validate_fields(fields: &BTreeMap<String, String>) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (key, raw) in fields {
        let value = sanitize_input(raw);

        if let Some(message) = check_injection(&value) {
            report.errors.insert(key.clone(), message);
            report.sanitized.insert(key.clone(), value);
            continue;
        }

        let error = match key.as_str() {
            "email" => validate_email(&value),
            "password" => validate_password(&value),
            "fullName" => validate_full_name(&value),
            "phone" => validate_phone(&value),
            "address" => validate_address(&value),
            _ => None,
        };

        if let Some(message) = error {
            report.errors.insert(key.clone(), message);
        }
        report.sanitized.insert(key.clone(), value);
    }

    report
}
