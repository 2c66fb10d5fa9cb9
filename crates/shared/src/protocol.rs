use serde::{Deserialize, Serialize};

pub const CONTACTS_PATH: &str = "/rest/v1/contacts";
pub const API_KEY_HEADER: &str = "apikey";
pub const PREFER_HEADER: &str = "Prefer";
pub const PREFER_MINIMAL: &str = "return=minimal";

/// Row inserted into the `contacts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInsertRequest {
    pub nome: String,
    pub cognome: String,
    pub telefono: String,
    pub email: String,
    pub privacy_accepted: bool,
    pub user_agent: String,
}
