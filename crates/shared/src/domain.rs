use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Storage key under which the consent record lives.
pub const CONSENT_STORAGE_KEY: &str = "windtre_cookie_consent";
/// Nominal retention of a consent decision. Nothing enforces it.
pub const CONSENT_RETENTION_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Nome,
    Cognome,
    Telefono,
    Email,
    Privacy,
}

impl FieldName {
    /// Form order, which is also the order errors are rendered in.
    pub const ALL: [FieldName; 5] = [
        FieldName::Nome,
        FieldName::Cognome,
        FieldName::Telefono,
        FieldName::Email,
        FieldName::Privacy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Nome => "nome",
            FieldName::Cognome => "cognome",
            FieldName::Telefono => "telefono",
            FieldName::Email => "email",
            FieldName::Privacy => "privacy",
        }
    }

    pub fn is_checkbox(self) -> bool {
        matches!(self, FieldName::Privacy)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub accepted: bool,
    pub timestamp: DateTime<Utc>,
}

impl ConsentRecord {
    pub fn new(accepted: bool) -> Self {
        Self {
            accepted,
            timestamp: Utc::now(),
        }
    }

    /// End of the nominal retention window. Informational only.
    pub fn retained_until(&self) -> DateTime<Utc> {
        self.timestamp + Duration::days(CONSENT_RETENTION_DAYS)
    }
}

/// Raw values as currently entered in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub nome: String,
    pub cognome: String,
    pub telefono: String,
    pub email: String,
    pub privacy: bool,
}
