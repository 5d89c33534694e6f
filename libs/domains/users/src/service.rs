use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use notifications::Dispatcher;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{
    LoginRequest, RegisterRequest, Status, UpdateUser, User, UserFilter, VerifyRequest,
};
use crate::otp::OtpEngine;
use crate::repository::UserRepository;

/// Service layer orchestrating registration, verification, login and
/// the admin operations. Generic over the repository implementation.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    otp: OtpEngine,
    notifier: Dispatcher,
}

fn verification_message(code: &str) -> String {
    format!("Your verification code is {}", code)
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>, otp: OtpEngine, notifier: Dispatcher) -> Self {
        Self {
            repository,
            otp,
            notifier,
        }
    }

    /// Hash a password using Argon2id with a fresh random salt
    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC digest. A digest that
    /// fails to parse counts as a failed verification, not an error.
    fn verify_password(&self, password: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            tracing::error!("Stored password digest is malformed");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Register a new user: persist with Pending status, then send a
    /// verification code over email and SMS. Delivery is best-effort
    /// and never fails the registration.
    pub async fn register(&self, input: RegisterRequest) -> UserResult<User> {
        if self.repository.email_exists(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = self
            .repository
            .create(User::new(&input, password_hash))
            .await?;

        match self.otp.generate(&user.email) {
            Ok(code) => {
                self.notifier
                    .broadcast(&user.email, &user.phone, &verification_message(&code))
                    .await;
            }
            Err(e) => {
                tracing::warn!(email = %user.email, error = %e, "Failed to generate OTP");
            }
        }

        tracing::info!(user_id = %user.id, email = %user.email, "Registered user");
        Ok(user)
    }

    /// Verify an email with a one-time code and activate the account.
    /// Verifying an already-active account succeeds again.
    pub async fn verify_email(&self, input: VerifyRequest) -> UserResult<User> {
        let mut user = self
            .repository
            .get_by_email(&input.email)
            .await?
            .ok_or(UserError::NotFound)?;

        if !self.otp.verify(&user.email, &input.otp) {
            return Err(UserError::InvalidOtp);
        }

        if user.status != Status::Active {
            user.status = Status::Active;
            user.updated_at = chrono::Utc::now();
            user = self.repository.update(user).await?;
            tracing::info!(user_id = %user.id, "User verified");
        }

        Ok(user)
    }

    /// Re-send the current-window verification code over email
    pub async fn resend_otp(&self, email: &str) -> UserResult<()> {
        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(UserError::NotFound)?;

        let code = self
            .otp
            .generate(&user.email)
            .map_err(|e| UserError::Internal(e.to_string()))?;

        self.notifier
            .send_email(&user.email, &verification_message(&code))
            .await;

        Ok(())
    }

    /// Check login credentials. The password is checked before the
    /// verification status, so a wrong password on an unverified
    /// account reports WrongPassword.
    pub async fn login(&self, input: LoginRequest) -> UserResult<User> {
        let user = self
            .repository
            .get_by_email(&input.email)
            .await?
            .ok_or(UserError::NotFound)?;

        if !self.verify_password(&input.password, &user.password_hash) {
            return Err(UserError::WrongPassword);
        }

        if user.status != Status::Active {
            return Err(UserError::NotVerified);
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)
    }

    pub async fn list_users(&self, filter: UserFilter) -> UserResult<(Vec<User>, usize)> {
        let total = self.repository.count(filter.clone()).await?;
        let users = self.repository.list(filter).await?;
        Ok((users, total))
    }

    /// Admin update. A new password is re-hashed before persisting.
    pub async fn update_user(&self, id: Uuid, update: UpdateUser) -> UserResult<User> {
        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        let new_hash = match &update.password {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };

        user.apply_update(update, new_hash);
        self.repository.update(user).await
    }

    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }
}
