//! Registration and login.
//!
//! ```text
//! register:  normalize email ─► exists? ─► argon2 hash ─► insert ─► JWT
//!                                  │                        │
//!                                  └──── EmailTaken ◄───────┘ (UNIQUE race)
//!
//! login:     normalize email ─► lookup ─► verify hash ─► JWT
//!                                  │           │
//!                            UnknownEmail  PasswordMismatch
//! ```

use std::sync::Arc;

use tracing::info;

use super::{ServiceError, ServiceResult};
use crate::auth::{hash_password, verify_password, JwtManager};
use crate::notification::{dispatch, welcome_email, Notifier};
use shelf_core::validation::normalize_email;
use shelf_core::{CoreError, LoginRequest, NewCustomer, RegisterRequest};
use shelf_db::Database;

/// Customer accounts.
#[derive(Clone)]
pub struct CustomerService {
    db: Database,
    jwt: Arc<JwtManager>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl CustomerService {
    pub fn new(db: Database, jwt: Arc<JwtManager>, notifier: Option<Arc<dyn Notifier>>) -> Self {
        CustomerService { db, jwt, notifier }
    }

    /// Creates an account and returns a token for it.
    ///
    /// Input must already have passed `validate_registration`.
    pub async fn register(&self, req: RegisterRequest) -> ServiceResult<String> {
        let email = normalize_email(&req.email);

        let exists = self
            .db
            .customers()
            .exists_by_email(&email)
            .await
            .map_err(ServiceError::storage("checking email"))?;
        if exists {
            return Err(CoreError::EmailTaken.into());
        }

        let password_hash = hash_password(&req.password)?;

        let customer = self
            .db
            .customers()
            .insert(&NewCustomer {
                email,
                password_hash,
                username: req.username,
            })
            .await
            .map_err(|e| {
                if e.is_unique_violation_on("customers.email") {
                    CoreError::EmailTaken.into()
                } else {
                    ServiceError::Storage {
                        context: "inserting customer",
                        source: e,
                    }
                }
            })?;

        info!(customer_id = customer.id, "Customer registered");

        let token = self.jwt.generate_token(&customer)?;

        if let Some(notifier) = &self.notifier {
            dispatch(
                notifier.clone(),
                welcome_email(&customer.email, &customer.username),
            );
        }

        Ok(token)
    }

    /// Checks credentials and returns a fresh token.
    pub async fn login(&self, req: LoginRequest) -> ServiceResult<String> {
        let email = normalize_email(&req.email);

        let customer = self
            .db
            .customers()
            .get_by_email(&email)
            .await
            .map_err(ServiceError::storage("loading customer"))?
            .ok_or(CoreError::UnknownEmail)?;

        if !verify_password(&req.password, &customer.password_hash) {
            return Err(CoreError::PasswordMismatch.into());
        }

        info!(customer_id = customer.id, "Customer logged in");
        self.jwt.generate_token(&customer)
    }
}
