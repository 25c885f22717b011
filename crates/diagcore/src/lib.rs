//! diagcore - client-side core of the IT-risk diagnostics Mini App
//!
//! This library holds everything the lead-capture wizard needs apart from the
//! actual rendering: the screen state machine, the scenario catalogue,
//! Telegram identity resolution and the submission client.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors and logging
//! - `wizard`: Validator, identity resolver, screen controller, submission client
//!   and feedback channel
//!
//! Rendering is pluggable through [`wizard::ViewPort`]; the host platform
//! (Telegram Mini-App runtime) through [`wizard::HostBridge`].

pub mod core;
pub mod wizard;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult, WizardConfig};
pub use wizard::{
    ContactForm, HttpTransport, Identity, LoginWidgetAuth, ScenarioId, ViewPort, WizardError, WizardSession,
    WizardState,
};
