//! Field rules for the contact form and normalization of accepted input.

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use shared::domain::{ContactForm, FieldName};
use thiserror::Error;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+39)?[0-9]{9,10}$").expect("invalid phone pattern"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email pattern"));

const MIN_NAME_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Il nome deve contenere almeno 2 caratteri")]
    NomeTooShort,
    #[error("Il cognome deve contenere almeno 2 caratteri")]
    CognomeTooShort,
    #[error("Il telefono è obbligatorio")]
    TelefonoMissing,
    #[error("Inserisci un numero di telefono valido (es. 333 1234567)")]
    TelefonoInvalid,
    #[error("L'email è obbligatoria")]
    EmailMissing,
    #[error("Inserisci un'email valida (es. nome@email.com)")]
    EmailInvalid,
    #[error("Devi accettare la privacy policy per procedere")]
    PrivacyNotAccepted,
}

impl ValidationError {
    pub fn field(self) -> FieldName {
        match self {
            Self::NomeTooShort => FieldName::Nome,
            Self::CognomeTooShort => FieldName::Cognome,
            Self::TelefonoMissing | Self::TelefonoInvalid => FieldName::Telefono,
            Self::EmailMissing | Self::EmailInvalid => FieldName::Email,
            Self::PrivacyNotAccepted => FieldName::Privacy,
        }
    }
}

pub fn validate_nome(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::NomeTooShort);
    }
    Ok(())
}

pub fn validate_cognome(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::CognomeTooShort);
    }
    Ok(())
}

pub fn validate_telefono(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::TelefonoMissing);
    }
    if !PHONE_PATTERN.is_match(&clean_phone(value)) {
        return Err(ValidationError::TelefonoInvalid);
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmailMissing);
    }
    if !EMAIL_PATTERN.is_match(value) {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

pub fn validate_privacy(checked: bool) -> Result<(), ValidationError> {
    if !checked {
        return Err(ValidationError::PrivacyNotAccepted);
    }
    Ok(())
}

/// Runs the rule for a single field against the current form values.
pub fn validate_field(form: &ContactForm, field: FieldName) -> Result<(), ValidationError> {
    match field {
        FieldName::Nome => validate_nome(&form.nome),
        FieldName::Cognome => validate_cognome(&form.cognome),
        FieldName::Telefono => validate_telefono(&form.telefono),
        FieldName::Email => validate_email(&form.email),
        FieldName::Privacy => validate_privacy(form.privacy),
    }
}

/// Drops whitespace and hyphens, the separators people type in numbers.
pub fn clean_phone(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Per-field result of one validation pass, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorMap {
    entries: BTreeMap<FieldName, Option<ValidationError>>,
}

impl FieldErrorMap {
    pub fn from_form(form: &ContactForm) -> Self {
        let entries = FieldName::ALL
            .iter()
            .map(|&field| (field, validate_field(form, field).err()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, field: FieldName) -> Option<ValidationError> {
        self.entries.get(&field).copied().flatten()
    }

    pub fn is_clean(&self) -> bool {
        self.entries.values().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, Option<ValidationError>)> + '_ {
        self.entries.iter().map(|(field, error)| (*field, *error))
    }

    pub fn errors(&self) -> impl Iterator<Item = ValidationError> + '_ {
        self.entries.values().filter_map(|error| *error)
    }
}

/// Normalized lead, only obtainable from [`validate_form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    nome: String,
    cognome: String,
    telefono: String,
    email: String,
    privacy: bool,
}

impl ContactSubmission {
    pub fn nome(&self) -> &str {
        &self.nome
    }

    pub fn cognome(&self) -> &str {
        &self.cognome
    }

    pub fn telefono(&self) -> &str {
        &self.telefono
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn privacy(&self) -> bool {
        self.privacy
    }
}

/// Validates every field and, if all pass, returns the normalized submission.
pub fn validate_form(form: &ContactForm) -> Result<ContactSubmission, FieldErrorMap> {
    let errors = FieldErrorMap::from_form(form);
    if !errors.is_clean() {
        return Err(errors);
    }

    Ok(ContactSubmission {
        nome: form.nome.trim().to_string(),
        cognome: form.cognome.trim().to_string(),
        telefono: clean_phone(&form.telefono),
        email: form.email.trim().to_lowercase(),
        privacy: form.privacy,
    })
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
