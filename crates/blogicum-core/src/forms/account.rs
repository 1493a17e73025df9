use serde::{Deserialize, Serialize};

use super::{max_chars, required};
use crate::domain::User;
use crate::error::FieldErrors;

const USERNAME_MAX_LENGTH: usize = 150;
const NAME_MAX_LENGTH: usize = 150;
const EMAIL_MAX_LENGTH: usize = 254;
const PASSWORD_MIN_LENGTH: usize = 8;

fn check_username(errors: &mut FieldErrors, raw: &str) -> String {
    let username = required(errors, "username", raw);
    max_chars(errors, "username", &username, USERNAME_MAX_LENGTH);
    let allowed = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'));
    if !allowed {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, \
             numbers, and @/./+/-/_ characters.",
        );
    }
    username
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Account creation fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    pub username: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(self) -> Result<RegistrationInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = check_username(&mut errors, &self.username);

        if self.password.chars().count() < PASSWORD_MIN_LENGTH {
            errors.add(
                "password",
                format!(
                    "This password is too short. It must contain at least \
                     {PASSWORD_MIN_LENGTH} characters."
                ),
            );
        }
        if self.password != self.password_confirmation {
            errors.add(
                "password_confirmation",
                "The two password fields didn't match.",
            );
        }

        errors.into_result(RegistrationInput {
            username,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Editable profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInput {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProfileForm {
    pub fn validate(self) -> Result<ProfileInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = check_username(&mut errors, &self.username);

        let first_name = self.first_name.trim().to_string();
        max_chars(&mut errors, "first_name", &first_name, NAME_MAX_LENGTH);
        let last_name = self.last_name.trim().to_string();
        max_chars(&mut errors, "last_name", &last_name, NAME_MAX_LENGTH);

        let email = self.email.trim().to_string();
        max_chars(&mut errors, "email", &email, EMAIL_MAX_LENGTH);
        if !email.is_empty() && !looks_like_email(&email) {
            errors.add("email", "Enter a valid email address.");
        }

        errors.into_result(ProfileInput {
            username,
            first_name,
            last_name,
            email,
        })
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

impl ProfileInput {
    pub fn apply_to(self, user: &mut User) {
        user.username = self.username;
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user.email = self.email;
    }
}
