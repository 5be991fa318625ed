//! # Validation Module
//!
//! Input validation utilities for Shelf.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum)                                        │
//! │  └── Malformed JSON rejected before any handler code runs              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Handler (Rust)                                               │
//! │  └── THIS MODULE: field and business rule validation                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (quantity > 0) constraints                       │
//! │  ├── UNIQUE (customers.email COLLATE NOCASE)                           │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shelf_core::validation::{validate_username, validate_email};
//!
//! assert!(validate_username("book_worm").is_ok());
//! assert!(validate_email("reader@example.com").is_ok());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CreateOrderRequest, OrderLine, RegisterRequest};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const USERNAME_MIN: usize = 4;
const USERNAME_MAX: usize = 16;
const PASSWORD_MIN: usize = 8;
const TLD_MIN: usize = 2;
const TLD_MAX: usize = 10;

// =============================================================================
// Order Validators
// =============================================================================

/// Validates a `POST /api/order` body.
///
/// ## Rules
/// ```text
/// items           non-empty
/// quantity        at least 1 on every line
/// address         non-blank
/// city            non-blank
/// district        non-blank
/// postal code     non-blank
/// receiver name   optional (defaults to the username)
/// shipper         optional
/// ```
///
/// ## Example
/// ```rust
/// use shelf_core::types::{CreateOrderRequest, OrderLine};
/// use shelf_core::validation::validate_order_request;
///
/// let req = CreateOrderRequest {
///     items: vec![OrderLine { book_id: 1, quantity: 5 }],
///     address: "A".into(),
///     city: "C".into(),
///     district: "D".into(),
///     postal_code: "Z".into(),
///     ..Default::default()
/// };
/// assert!(validate_order_request(&req).is_ok());
/// ```
pub fn validate_order_request(req: &CreateOrderRequest) -> CoreResult<()> {
    if req.items.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    for line in &req.items {
        validate_order_line(line)?;
    }

    require_non_blank("receiver address", &req.address)?;
    require_non_blank("receiver city", &req.city)?;
    require_non_blank("receiver district", &req.district)?;
    require_non_blank("receiver postal code", &req.postal_code)?;

    Ok(())
}

/// Validates a single order line.
pub fn validate_order_line(line: &OrderLine) -> ValidationResult<()> {
    validate_quantity(line.quantity)
}

/// Validates an item quantity.
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_quantity;
///
/// assert!(validate_quantity(5).is_ok());
/// assert!(validate_quantity(1000).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::TooSmall {
            field: "quantity".to_string(),
            min: 1,
        });
    }

    Ok(())
}

fn require_non_blank(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

// =============================================================================
// Customer Validators
// =============================================================================

/// Validates a registration body: username, then email, then password.
pub fn validate_registration(req: &RegisterRequest) -> ValidationResult<()> {
    validate_username(&req.username)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    Ok(())
}

/// Validates a username.
///
/// ## Rules
/// - 4 to 16 characters
/// - Only ASCII letters, digits and underscores
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_username;
///
/// assert!(validate_username("reader_01").is_ok());
/// assert!(validate_username("abc").is_err());
/// assert!(validate_username("no spaces").is_err());
/// ```
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let len_ok = (USERNAME_MIN..=USERNAME_MAX).contains(&username.len());
    let chars_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !len_ok || !chars_ok {
        return Err(ValidationError::invalid(
            "username",
            "between 4 and 16 characters in length contains only alphanumeric characters or underscores",
        ));
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Accepted Shape
/// ```text
/// local-part  @  label . label . ... tld
/// [A-Za-z0-9_.-]+   [A-Za-z0-9-]+      [A-Za-z]{2,10}
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::invalid("email", "combination"))
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !local_ok {
        return false;
    }

    // Needs at least one label before the TLD.
    let Some((labels, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    let tld_ok = (TLD_MIN..=TLD_MAX).contains(&tld.len())
        && tld.chars().all(|c| c.is_ascii_alphabetic());
    let labels_ok = labels.split('.').all(|label| {
        !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    tld_ok && labels_ok
}

/// Validates password strength.
///
/// ## Rules
/// - At least 8 characters
/// - At least one lowercase letter, one uppercase letter, one digit and one
///   punctuation or symbol character
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_password;
///
/// assert!(validate_password("Secr3t!pass").is_ok());
/// assert!(validate_password("password").is_err());
/// ```
pub fn validate_password(password: &str) -> ValidationResult<()> {
    let mut has_lower = false;
    let mut has_upper = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_lowercase() {
            has_lower = true;
        } else if c.is_uppercase() {
            has_upper = true;
        } else if c.is_numeric() {
            has_digit = true;
        } else if !c.is_whitespace() && !c.is_control() && !c.is_alphabetic() {
            has_special = true;
        }
    }

    if password.chars().count() < PASSWORD_MIN
        || !(has_lower && has_upper && has_digit && has_special)
    {
        return Err(ValidationError::invalid(
            "password",
            "at least 8 characters in length contains at least one lowercase letter, \
             one uppercase letter, one digit, and one special character",
        ));
    }

    Ok(())
}

/// Canonical form of an email for storage and lookup.
///
/// ## Example
/// ```rust
/// use shelf_core::validation::normalize_email;
///
/// assert_eq!(normalize_email("  Reader@Example.COM "), "reader@example.com");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// =============================================================================
// Unit Tests
// =============================================================================
