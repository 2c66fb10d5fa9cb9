//! Contact form controller: inline validation and the submit lifecycle.

use std::{sync::Arc, time::Duration};

use shared::{domain::FieldName, error::SubmitFailure};
use tracing::{debug, error, info};

use crate::{
    notice::{Notice, DEFAULT_NOTICE_TTL},
    scheduler::TaskSlot,
    transport::ContactTransport,
    validation::{validate_field, validate_form, FieldErrorMap, ValidationError},
    view::ContactFormView,
};

#[derive(Debug, Clone)]
pub struct FormSettings {
    /// Sent with every submission as client metadata.
    pub user_agent: String,
    pub notice_ttl: Duration,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("landing/", env!("CARGO_PKG_VERSION")).to_string(),
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Validating,
    Submitting,
    /// Terminal for this page load; the form is gone.
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Aborted(FieldErrorMap),
    Succeeded,
    Failed {
        failure: SubmitFailure,
        notice: Notice,
    },
    /// A submit arrived while one was in flight or after success.
    Ignored,
}

pub struct ContactFormController {
    view: Arc<dyn ContactFormView>,
    transport: Arc<dyn ContactTransport>,
    settings: FormSettings,
    phase: SubmitPhase,
    notice_timer: TaskSlot,
}

impl ContactFormController {
    pub fn new(
        view: Arc<dyn ContactFormView>,
        transport: Arc<dyn ContactTransport>,
        settings: FormSettings,
    ) -> Self {
        Self {
            view,
            transport,
            settings,
            phase: SubmitPhase::Idle,
            notice_timer: TaskSlot::new(),
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// Validates one field and updates its error slot.
    pub fn on_blur(&self, field: FieldName) -> Result<(), ValidationError> {
        let result = validate_field(&self.view.read_input(), field);
        let message = result.err().map(|e| e.to_string());
        self.view.set_field_error(field, message.as_deref());
        result
    }

    /// Typing only clears a displayed error; it never marks a field valid.
    pub fn on_input(&self, field: FieldName) {
        if self
            .view
            .field_error(field)
            .is_some_and(|message| !message.is_empty())
        {
            self.view.set_field_error(field, None);
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice_timer.cancel();
        self.view.hide_notice();
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if matches!(self.phase, SubmitPhase::Submitting | SubmitPhase::Succeeded) {
            debug!(phase = ?self.phase, "ignoring submit");
            return SubmitOutcome::Ignored;
        }

        self.dismiss_notice();
        self.phase = SubmitPhase::Validating;

        let submission = match validate_form(&self.view.read_input()) {
            Ok(submission) => submission,
            Err(errors) => {
                self.render_errors(&errors);
                self.phase = SubmitPhase::Idle;
                debug!(
                    failing = errors.errors().count(),
                    "contact form rejected by validation"
                );
                return SubmitOutcome::Aborted(errors);
            }
        };
        self.render_errors(&FieldErrorMap::default());

        self.phase = SubmitPhase::Submitting;
        self.view.set_loading(true);
        info!("submitting contact request");
        let result = self
            .transport
            .submit(&submission, &self.settings.user_agent)
            .await;
        self.view.set_loading(false);

        match result {
            Ok(()) => {
                self.view.clear_fields();
                self.render_errors(&FieldErrorMap::default());
                self.view.show_success();
                self.phase = SubmitPhase::Succeeded;
                SubmitOutcome::Succeeded
            }
            Err(failure) => {
                let notice = Notice::for_failure(&failure);
                error!(error = %failure, ?notice, "contact submission failed");
                self.show_notice(notice);
                self.phase = SubmitPhase::Idle;
                SubmitOutcome::Failed { failure, notice }
            }
        }
    }

    fn render_errors(&self, errors: &FieldErrorMap) {
        for field in FieldName::ALL {
            let message = errors.get(field).map(|e| e.to_string());
            self.view.set_field_error(field, message.as_deref());
        }
    }

    fn show_notice(&mut self, notice: Notice) {
        self.view.show_notice(notice.message());
        let view = Arc::clone(&self.view);
        self.notice_timer
            .schedule(self.settings.notice_ttl, move || view.hide_notice());
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
