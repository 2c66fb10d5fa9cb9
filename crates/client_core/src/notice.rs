//! User-facing notification chosen from a submission failure.

use std::{fmt, time::Duration};

use shared::error::SubmitFailure;

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Connectivity,
    ServerError,
    Generic,
}

impl Notice {
    pub fn for_failure(failure: &SubmitFailure) -> Self {
        match failure {
            SubmitFailure::NetworkFailure(_) => Notice::Connectivity,
            failure if failure.is_server_error() => Notice::ServerError,
            SubmitFailure::HttpStatus { .. } | SubmitFailure::ParseFailure(_) => Notice::Generic,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::Connectivity => {
                "Errore di connessione. Verifica la tua connessione internet."
            }
            Notice::ServerError => "Errore del server. Riprova più tardi.",
            Notice::Generic => "Si è verificato un errore. Riprova più tardi.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
