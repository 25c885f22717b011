//! User-visible feedback
//!
//! Two independent signals: per-field error marks and one shared status
//! line. Every report overwrites the status line; clearing resets both.
//! The optional diagnostic trace is a secondary, append-only channel.

use chrono::{DateTime, Utc};

use super::view::{Field, StatusKind, StatusLine, ViewPort};

/// One entry of the diagnostic trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Append-only list of wizard events
#[derive(Debug, Clone, Default)]
pub struct DiagnosticTrace {
    entries: Vec<TraceEntry>,
}

impl DiagnosticTrace {
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push(TraceEntry {
            at: Utc::now(),
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `HH:MM:SS message` lines, oldest first
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} {}", e.at.format("%H:%M:%S"), e.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Routes errors and successes to the view, and optionally to the trace
#[derive(Debug, Default)]
pub struct FeedbackChannel {
    trace: Option<DiagnosticTrace>,
}

impl FeedbackChannel {
    pub fn new(enable_diagnostic_log: bool) -> Self {
        Self {
            trace: enable_diagnostic_log.then(DiagnosticTrace::default),
        }
    }

    /// Records a diagnostic event (no-op for the view)
    pub fn trace(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("trace: {}", message);
        if let Some(trace) = self.trace.as_mut() {
            trace.push(message);
        }
    }

    pub fn diagnostic_trace(&self) -> Option<&DiagnosticTrace> {
        self.trace.as_ref()
    }

    /// Red status line, plus a mark on the offending field if there is one
    pub fn report_error<V: ViewPort + ?Sized>(&mut self, view: &mut V, field: Option<Field>, message: &str) {
        log::warn!("❌ {}", message);
        self.trace(format!("error: {}", message));
        view.set_status(Some(&StatusLine {
            kind: StatusKind::Error,
            text: message.to_string(),
        }));
        if let Some(field) = field {
            view.mark_field(field, true);
        }
    }

    /// Green status line
    pub fn report_success<V: ViewPort + ?Sized>(&mut self, view: &mut V, message: &str) {
        log::info!("✅ {}", message);
        self.trace(format!("success: {}", message));
        view.set_status(Some(&StatusLine {
            kind: StatusKind::Success,
            text: message.to_string(),
        }));
    }

    /// Hides the status line and removes the marks from `fields`
    pub fn clear<V: ViewPort + ?Sized>(&mut self, view: &mut V, fields: &[Field]) {
        view.set_status(None);
        for field in fields {
            view.mark_field(*field, false);
        }
    }
}
