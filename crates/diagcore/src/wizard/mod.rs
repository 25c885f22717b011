//! The lead-capture wizard
//!
//! - `validation`: name/email syntax checks
//! - `scenario`: the six scenarios and their insights
//! - `identity` / `telegram_auth`: Telegram identity resolution and signature checks
//! - `controller`: the screen state machine ([`WizardSession`])
//! - `submission`: payload, HTTP transport, response classification
//! - `feedback` / `view`: status reporting and the rendering seam

pub mod controller;
pub mod error;
pub mod feedback;
pub mod identity;
pub mod messages;
pub mod scenario;
pub mod state;
pub mod submission;
pub mod telegram_auth;
pub mod validation;
pub mod view;

pub use controller::WizardSession;
pub use error::WizardError;
pub use feedback::{DiagnosticTrace, FeedbackChannel, TraceEntry};
pub use identity::{AuthMailbox, HostBridge, HostSnapshot, Identity, IdentityResolver, LoginWidgetAuth};
pub use scenario::{Insight, ScenarioId, UnknownScenario};
pub use state::WizardState;
pub use submission::{
    ContactInfo, HttpTransport, ServerReply, SubmissionPayload, SubmitResponse, SubmitTransport, SubmitVerdict,
    TransportError,
};
pub use validation::{is_valid_email, is_valid_name};
pub use view::{ContactForm, Download, Field, StatusKind, StatusLine, ViewPort};
