//! Terminal renditions of the page views.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use client_core::{BannerView, ContactFormView};
use shared::domain::{ContactForm, FieldName};

pub struct TerminalBanner;

impl BannerView for TerminalBanner {
    fn show(&self) {
        println!("[cookie banner] Questo sito utilizza cookie tecnici. [Accetta] (cookie.html)");
    }

    fn mark_hidden(&self) {
        println!("[cookie banner] hidden");
    }

    fn remove(&self) {
        tracing::debug!("cookie banner removed from layout");
    }
}

#[derive(Default)]
struct FormState {
    input: ContactForm,
    errors: BTreeMap<FieldName, String>,
    success: bool,
}

pub struct TerminalFormView {
    state: Mutex<FormState>,
}

impl TerminalFormView {
    pub fn new(input: ContactForm) -> Self {
        Self {
            state: Mutex::new(FormState {
                input,
                ..FormState::default()
            }),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.lock().success
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ContactFormView for TerminalFormView {
    fn read_input(&self) -> ContactForm {
        self.lock().input.clone()
    }

    fn set_field_error(&self, field: FieldName, message: Option<&str>) {
        let mut state = self.lock();
        match message {
            Some(message) => {
                if state.errors.get(&field).map(String::as_str) != Some(message) {
                    eprintln!("  {field}: {message}");
                }
                state.errors.insert(field, message.to_string());
            }
            None => {
                state.errors.remove(&field);
            }
        }
    }

    fn field_error(&self, field: FieldName) -> Option<String> {
        self.lock().errors.get(&field).cloned()
    }

    fn set_loading(&self, loading: bool) {
        if loading {
            println!("Invio in corso...");
        }
    }

    fn clear_fields(&self) {
        self.lock().input = ContactForm::default();
    }

    fn show_success(&self) {
        self.lock().success = true;
        println!("Grazie! Abbiamo ricevuto la tua richiesta, ti contatteremo al più presto.");
    }

    fn show_notice(&self, message: &str) {
        eprintln!("[errore] {message}");
    }

    fn hide_notice(&self) {}
}
