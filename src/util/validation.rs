//! Advisory form validation for login and signup.
//!
//! These checks mirror the backend's constraints so users get feedback
//! before a round-trip. The server re-validates everything; a form that
//! passes here can still come back with field errors.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::collections::BTreeMap;

use crate::net::types::{Credentials, SignupPayload};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 40;
pub const NAME_MAX: usize = 20;

/// Per-field validation messages, keyed by form field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_owned(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Drop the message for one field, e.g. when the user edits it.
    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<BTreeMap<String, String>> for FieldErrors {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the per-field messages when a required field is blank.
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        if is_blank(&self.username) {
            errors.insert("username", "Enter your username.");
        }
        if is_blank(&self.password) {
            errors.insert("password", "Enter your password.");
        }
        if errors.is_empty() { Ok(Credentials::new(&self.username, &self.password)) } else { Err(errors) }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns the per-field messages for every field that fails its check.
    pub fn validate(&self) -> Result<SignupPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        if is_blank(&self.username) {
            errors.insert("username", "Enter a username.");
        } else if !(USERNAME_MIN..=USERNAME_MAX).contains(&char_len(&self.username)) {
            errors.insert("username", format!("Username must be {USERNAME_MIN}-{USERNAME_MAX} characters."));
        }

        if is_blank(&self.email) {
            errors.insert("email", "Enter an email address.");
        } else if !is_email(&self.email) {
            errors.insert("email", "Enter a valid email address.");
        }

        if is_blank(&self.password) {
            errors.insert("password", "Enter a password.");
        } else if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&char_len(&self.password)) {
            errors.insert("password", format!("Password must be {PASSWORD_MIN}-{PASSWORD_MAX} characters."));
        }

        if is_blank(&self.confirm_password) {
            errors.insert("confirm_password", "Confirm your password.");
        } else if self.password != self.confirm_password {
            errors.insert("confirm_password", "Passwords do not match.");
        }

        if is_blank(&self.name) {
            errors.insert("name", "Enter your name.");
        } else if char_len(&self.name) > NAME_MAX {
            errors.insert("name", format!("Name cannot exceed {NAME_MAX} characters."));
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SignupPayload {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
        })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
