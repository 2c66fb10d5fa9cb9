//! Headless controllers for the storefront landing page: the cookie-consent
//! banner and the lead-capture contact form.

pub mod consent;
pub mod form;
pub mod notice;
pub mod scheduler;
pub mod transport;
pub mod validation;
pub mod view;

pub use consent::{BannerState, ConsentError, ConsentManager};
pub use form::{ContactFormController, FormSettings, SubmitOutcome, SubmitPhase};
pub use notice::Notice;
pub use transport::{ContactTransport, RestContactTransport, SubmitEndpoint};
pub use validation::{ContactSubmission, FieldErrorMap, ValidationError};
pub use view::{BannerView, ContactFormView};

#[cfg(test)]
#[path = "tests/fakes.rs"]
mod fakes;

#[cfg(test)]
#[path = "tests/mock_endpoint.rs"]
mod mock_endpoint;
