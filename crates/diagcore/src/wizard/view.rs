//! Rendering seam between the wizard and whatever draws it
//!
//! The state machine never touches concrete widgets; a host (web page,
//! terminal, test double) implements [`ViewPort`].

use bytes::Bytes;

use super::state::WizardState;
use crate::core::error::AppResult;

/// Inputs of the contact form that can be flagged as invalid
///
/// The Telegram handle is optional free text and never flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
}

impl Field {
    /// Form input name (`<input name=...>`)
    pub fn input_name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
        }
    }
}

/// Raw contents of the contact form, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub telegram: String,
}

impl ContactForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>, telegram: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            telegram: telegram.into(),
        }
    }
}

/// Colour category of the shared status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// green
    Success,
    /// red
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

/// A downloaded attachment handed to the host for saving/opening
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Operations the wizard needs from its renderer
pub trait ViewPort {
    /// Makes `screen` the only visible screen
    fn show_screen(&mut self, screen: WizardState);

    /// Fills the insight screen: rich text plus the continue button label
    fn set_insight(&mut self, display_text: &str, call_to_action_label: &str);

    fn read_contact_form(&self) -> ContactForm;

    /// Clears every input of the contact form
    fn reset_contact_form(&mut self);

    /// Sets or removes the error mark on a single input
    fn mark_field(&mut self, field: Field, marked: bool);

    /// Overwrites the status line; `None` hides it
    fn set_status(&mut self, status: Option<&StatusLine>);

    /// Enables/disables the submit control while a request is pending
    fn set_submit_enabled(&mut self, _enabled: bool) {}

    /// Hands over a post-submit attachment (the programmatic link click)
    fn deliver_download(&mut self, download: Download) -> AppResult<()> {
        log::info!(
            "Download {} ({} bytes) ignored by this view",
            download.filename,
            download.bytes.len()
        );
        Ok(())
    }
}
