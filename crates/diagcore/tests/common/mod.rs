//! Common test utilities
//!
//! Shared across the diagcore integration tests: a view that records every
//! call, a scripted in-memory transport and small builders.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use diagcore::wizard::{
    AuthMailbox, ContactForm, Download, Field, HostSnapshot, LoginWidgetAuth, ServerReply, StatusKind, StatusLine,
    SubmissionPayload, SubmitResponse, SubmitTransport, TransportError, ViewPort, WizardSession, WizardState,
};
use diagcore::{AppResult, WizardConfig};

/// ViewPort double that remembers everything it was asked to render
#[derive(Debug, Default)]
pub struct RecordingView {
    pub screens: Vec<WizardState>,
    pub insight: Option<(String, String)>,
    pub form: ContactForm,
    pub status: Option<StatusLine>,
    pub marked: HashSet<Field>,
    pub submit_enabled: Vec<bool>,
    pub resets: usize,
    pub downloads: Vec<Download>,
}

impl RecordingView {
    pub fn visible(&self) -> Option<WizardState> {
        self.screens.last().copied()
    }

    pub fn status_kind(&self) -> Option<StatusKind> {
        self.status.as_ref().map(|s| s.kind)
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }
}

impl ViewPort for RecordingView {
    fn show_screen(&mut self, screen: WizardState) {
        self.screens.push(screen);
    }

    fn set_insight(&mut self, display_text: &str, call_to_action_label: &str) {
        self.insight = Some((display_text.to_string(), call_to_action_label.to_string()));
    }

    fn read_contact_form(&self) -> ContactForm {
        self.form.clone()
    }

    fn reset_contact_form(&mut self) {
        self.resets += 1;
        self.form = ContactForm::default();
    }

    fn mark_field(&mut self, field: Field, marked: bool) {
        if marked {
            self.marked.insert(field);
        } else {
            self.marked.remove(&field);
        }
    }

    fn set_status(&mut self, status: Option<&StatusLine>) {
        self.status = status.cloned();
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled.push(enabled);
    }

    fn deliver_download(&mut self, download: Download) -> AppResult<()> {
        self.downloads.push(download);
        Ok(())
    }
}

/// Scripted reply for [`FakeTransport`]
pub enum Scripted {
    Reply(u16, serde_json::Value),
    Malformed,
}

/// In-memory transport: records payloads, answers from a script
#[derive(Clone, Default)]
pub struct FakeTransport {
    pub sent: Arc<Mutex<Vec<(String, SubmissionPayload)>>>,
    pub fetched: Arc<Mutex<Vec<String>>>,
    script: Arc<Mutex<VecDeque<Scripted>>>,
    asset_fails: bool,
}

impl FakeTransport {
    pub fn answering(replies: Vec<Scripted>) -> Self {
        Self {
            script: Arc::new(Mutex::new(replies.into())),
            ..Self::default()
        }
    }

    pub fn ok() -> Self {
        Self::answering(vec![Scripted::Reply(200, serde_json::json!({"status": "ok", "lead_id": 1}))])
    }

    pub fn with_failing_asset(mut self) -> Self {
        self.asset_fails = true;
        self
    }

    pub fn sent(&self) -> Vec<(String, SubmissionPayload)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmitTransport for FakeTransport {
    async fn submit(&self, path: &str, payload: &SubmissionPayload) -> Result<ServerReply, TransportError> {
        self.sent.lock().unwrap().push((path.to_string(), payload.clone()));
        // An exhausted script behaves like an unreachable server
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Reply(http_status, body)) => Ok(ServerReply {
                http_status,
                body: SubmitResponse::from_json(&body),
            }),
            Some(Scripted::Malformed) => Err(TransportError::MalformedBody("expected value at line 1".into())),
            None => Err(TransportError::HttpStatus(503)),
        }
    }

    async fn fetch_asset(&self, path: &str) -> Result<Download, TransportError> {
        self.fetched.lock().unwrap().push(path.to_string());
        if self.asset_fails {
            return Err(TransportError::HttpStatus(404));
        }
        Ok(Download {
            filename: "checklist.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF-1.4"),
        })
    }
}

pub type TestSession = WizardSession<RecordingView, FakeTransport>;

/// Config with no cosmetic delay so tests don't sleep
pub fn fast_config() -> WizardConfig {
    WizardConfig::default().with_success_delay(std::time::Duration::ZERO)
}

pub fn session(config: WizardConfig, transport: FakeTransport, host: HostSnapshot) -> TestSession {
    WizardSession::new(config, RecordingView::default(), transport, Arc::new(host), AuthMailbox::new())
}

pub fn valid_form() -> ContactForm {
    ContactForm::new("Anna Maria-Lee", "anna@example.com", "@anna")
}

pub fn widget_auth(id: i64) -> LoginWidgetAuth {
    LoginWidgetAuth {
        id,
        first_name: "Anna".to_string(),
        last_name: Some("Lee".to_string()),
        username: Some("anna".to_string()),
        photo_url: None,
        auth_date: 1_700_000_000,
        hash: "0a1b2c".to_string(),
    }
}
