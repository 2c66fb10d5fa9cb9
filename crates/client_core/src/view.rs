//! Presentation seams the controllers drive. A browser binding, a terminal,
//! or a test double can sit behind them.

use shared::domain::{ContactForm, FieldName};

pub trait BannerView: Send + Sync {
    /// Put the banner in layout and make it visible.
    fn show(&self);
    /// Start hiding (the visual transition). The banner still occupies layout.
    fn mark_hidden(&self);
    /// Take the banner out of layout.
    fn remove(&self);
}

pub trait ContactFormView: Send + Sync {
    fn read_input(&self) -> ContactForm;
    /// `None` clears the error slot and the field's error styling.
    fn set_field_error(&self, field: FieldName, message: Option<&str>);
    /// Text currently shown in the field's error slot, if any.
    fn field_error(&self, field: FieldName) -> Option<String>;
    /// Disables the submit control and swaps its label for the loading indicator.
    fn set_loading(&self, loading: bool);
    fn clear_fields(&self);
    /// Hides the form panel and reveals the success panel.
    fn show_success(&self);
    fn show_notice(&self, message: &str);
    fn hide_notice(&self);
}
