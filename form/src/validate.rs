use std::collections::HashMap;

use regex::Regex;
use serde::Serialize;

/// The three fields that carry rules beyond "whatever the user typed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    /// The form control this error attaches to.
    pub fn id(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Message => "message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Raw field values as scraped from the form, before any rule has run.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub service: String,
    pub message: String,
    pub company: String,
}

impl ContactForm {
    /// Builds the form from a field-name to raw-value mapping. Unknown keys
    /// are ignored, missing keys stay empty.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();

        Self {
            name: get("name"),
            email: get("email"),
            organization: get("organization"),
            service: get("service"),
            message: get("message"),
            company: get("company"),
        }
    }
}

/// Validated submission body, ready for transmission.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub service: String,
    pub message: String,
    pub company: String,
}

/// Runs every rule and accumulates failures, so the user sees all offending
/// fields at once instead of fixing them one round trip at a time.
pub fn validate(form: &ContactForm) -> Result<ContactPayload, Vec<FieldError>> {
    let mut errors = Vec::new();

    if form.name.trim().len() < 2 {
        errors.push(FieldError {
            field: Field::Name,
            message: "Please enter a valid name (at least 2 characters)".to_string(),
        });
    }

    let email_re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    if !email_re.is_match(&form.email) {
        errors.push(FieldError {
            field: Field::Email,
            message: "Please enter a valid email address".to_string(),
        });
    }

    if form.message.trim().len() < 10 {
        errors.push(FieldError {
            field: Field::Message,
            message: "Please enter a message (at least 10 characters)".to_string(),
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ContactPayload {
        name: form.name.clone(),
        email: form.email.clone(),
        organization: form.organization.clone(),
        service: form.service.clone(),
        message: form.message.clone(),
        company: form.company.clone(),
    })
}
