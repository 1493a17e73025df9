//! Registration and login.

use std::sync::Arc;

use mockable::Clock;
use uuid::Uuid;

use crate::domain::User;
use crate::error::{DomainError, FieldErrors};
use crate::forms::{LoginForm, RegistrationForm};
use crate::ports::{PasswordService, TokenService, UserRepository};

/// A freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
    /// Usernames granted the staff role when they register or log in.
    staff: Arc<[String]>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            clock,
            staff: Arc::from([]),
        }
    }

    pub fn with_staff(mut self, usernames: impl IntoIterator<Item = String>) -> Self {
        self.staff = usernames.into_iter().collect();
        self
    }

    fn is_listed_staff(&self, username: &str) -> bool {
        self.staff.iter().any(|name| name == username)
    }

    /// Grant the staff role to a listed user. The list never revokes it.
    async fn promote(&self, mut user: User) -> Result<User, DomainError> {
        if user.is_staff || !self.is_listed_staff(&user.username) {
            return Ok(user);
        }

        user.is_staff = true;
        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Granted staff role");
        Ok(user)
    }

    fn issue(&self, user: User) -> Result<IssuedToken, DomainError> {
        let access_token = self
            .tokens
            .generate_token(user.id, &user.username, user.roles())
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(IssuedToken {
            user,
            access_token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    pub async fn register(&self, form: RegistrationForm) -> Result<IssuedToken, DomainError> {
        let input = form.validate()?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            let mut errors = FieldErrors::new();
            errors.add("username", "A user with that username already exists.");
            return Err(errors.into());
        }

        let password_hash = self
            .passwords
            .hash(&input.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut user = User::new(input.username, password_hash, self.clock.utc());
        user.is_staff = self.is_listed_staff(&user.username);
        let user = self.users.insert(user).await?;
        tracing::info!(user_id = %user.id, staff = user.is_staff, "User registered");

        self.issue(user)
    }

    /// Unknown user and wrong password are reported the same way.
    pub async fn login(&self, form: LoginForm) -> Result<IssuedToken, DomainError> {
        let user = self
            .users
            .find_by_username(form.username.trim())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = self
            .passwords
            .verify(&form.password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            tracing::debug!(user_id = %user.id, "Rejected login attempt");
            return Err(DomainError::Unauthorized);
        }

        let user = self.promote(user).await?;
        self.issue(user)
    }

    pub async fn me(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)
    }
}
