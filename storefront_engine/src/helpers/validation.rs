//! Field-level validation for account data.
//!
//! Validators collect every problem they find into [`ValidationErrors`], keyed by field name, so that a form can show
//! all of its errors at once.
use std::{collections::BTreeMap, fmt::Display, sync::OnceLock};

use regex::Regex;
use serde::Serialize;

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_PHONE_LENGTH: usize = 13;
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` if nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self.0.iter().map(|(field, msgs)| format!("{field}: {}", msgs.join(" "))).collect::<Vec<_>>();
        write!(f, "{}", parts.join("; "))
    }
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

pub fn validate_username(username: &str, errors: &mut ValidationErrors) {
    if username.is_empty() {
        errors.add("username", "This field is required.");
    } else if username.chars().count() > MAX_USERNAME_LENGTH {
        errors.add("username", format!("Ensure this value has at most {MAX_USERNAME_LENGTH} characters."));
    } else if !username_regex().is_match(username) {
        errors.add("username", "Enter a valid username. Use only letters, numbers, and @/./+/-/_ characters.");
    }
}

/// An empty e-mail is allowed; a non-empty one must look like an address.
pub fn validate_email(email: &str, errors: &mut ValidationErrors) {
    if !email.is_empty() && !email_regex().is_match(email) {
        errors.add("email", "Enter a valid email address.");
    }
}

pub fn validate_phone_number(phone: &str, errors: &mut ValidationErrors) {
    if phone.chars().count() > MAX_PHONE_LENGTH {
        errors.add("phone_number", format!("Ensure this value has at most {MAX_PHONE_LENGTH} characters."));
    }
}

/// Checks a new password and its confirmation. Errors are recorded against `field`.
pub fn validate_new_password(
    field: &str,
    password: &str,
    confirmation: &str,
    username: &str,
    errors: &mut ValidationErrors,
) {
    if password.is_empty() {
        errors.add(field, "This field is required.");
        return;
    }
    if password != confirmation {
        errors.add(field, "The two password fields didn't match.");
        return;
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            field,
            format!("This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."),
        );
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "This password is entirely numeric.");
    }
    if !username.is_empty() && password.eq_ignore_ascii_case(username) {
        errors.add(field, "The password is too similar to the username.");
    }
}
