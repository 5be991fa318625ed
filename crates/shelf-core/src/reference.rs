//! # Reference Codes
//!
//! Generation of the two customer-facing codes printed on every order.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  customer_reference   8 chars of [a-zA-Z0-9]                           │
//! │                       RNG seeded with the order timestamp (nanos),     │
//! │                       so the same order date always yields the same    │
//! │                       code                                              │
//! │                                                                         │
//! │  tracking_number      <shipper>-<10 chars of [A-Z0-9]>                 │
//! │                       e.g. "JNE-7Q2XK0M4ZD"                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither code is guaranteed unique; both are informational.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Alphabet for customer references.
const REFERENCE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Alphabet for tracking numbers.
const TRACKING_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const CUSTOMER_REFERENCE_LEN: usize = 8;
pub const TRACKING_CODE_LEN: usize = 10;

/// Draws `len` characters from `charset`.
fn random_code<R: Rng + ?Sized>(rng: &mut R, charset: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// Generates the customer reference for an order placed at `order_date`.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use shelf_core::reference::customer_reference;
///
/// let now = Utc::now();
/// let code = customer_reference(now);
/// assert_eq!(code.len(), 8);
/// assert_eq!(code, customer_reference(now));
/// ```
pub fn customer_reference(order_date: DateTime<Utc>) -> String {
    // Out-of-range timestamps (year > 2262) fall back to whole seconds.
    let seed = order_date
        .timestamp_nanos_opt()
        .unwrap_or_else(|| order_date.timestamp());
    let mut rng = StdRng::seed_from_u64(seed as u64);
    random_code(&mut rng, REFERENCE_CHARSET, CUSTOMER_REFERENCE_LEN)
}

/// Generates a tracking number for `shipper`.
///
/// A blank shipper yields just the random part.
pub fn tracking_number<R: Rng + ?Sized>(shipper: &str, rng: &mut R) -> String {
    let code = random_code(rng, TRACKING_CHARSET, TRACKING_CODE_LEN);
    let shipper = shipper.trim();

    if shipper.is_empty() {
        code
    } else {
        format!("{}-{}", shipper, code)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_customer_reference_shape() {
        let code = customer_reference(Utc::now());
        assert_eq!(code.len(), CUSTOMER_REFERENCE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_customer_reference_is_deterministic_per_timestamp() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(customer_reference(date), customer_reference(date));

        let later = date + chrono::Duration::nanoseconds(1);
        // Different seeds; equal output would be a 1 in 62^8 coincidence.
        assert_ne!(customer_reference(date), customer_reference(later));
    }

    #[test]
    fn test_tracking_number_with_shipper() {
        let mut rng = StdRng::seed_from_u64(7);
        let tracking = tracking_number("JNE", &mut rng);

        let (prefix, code) = tracking.split_once('-').unwrap();
        assert_eq!(prefix, "JNE");
        assert_eq!(code.len(), TRACKING_CODE_LEN);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_tracking_number_blank_shipper() {
        let mut rng = StdRng::seed_from_u64(7);
        let tracking = tracking_number("  ", &mut rng);

        assert_eq!(tracking.len(), TRACKING_CODE_LEN);
        assert!(!tracking.contains('-'));
    }
}
