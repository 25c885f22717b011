//! Screen controller
//!
//! [`WizardSession`] owns everything that lives for one page visit: the
//! current screen, the chosen scenario, the identity resolver (with its
//! Login Widget mailbox) and the feedback channel. All transitions are
//! triggered by explicit user events; the only suspend point is the
//! submission request.

use std::sync::Arc;

use super::error::WizardError;
use super::feedback::{DiagnosticTrace, FeedbackChannel};
use super::identity::{AuthMailbox, HostBridge, Identity, IdentityResolver, LoginWidgetAuth};
use super::messages;
use super::scenario::ScenarioId;
use super::state::WizardState;
use super::submission::{validate_contact, SubmissionPayload, SubmitTransport, SubmitVerdict};
use super::view::{Field, ViewPort};
use crate::core::config::WizardConfig;

/// One visitor's pass through the wizard
pub struct WizardSession<V: ViewPort, T: SubmitTransport> {
    config: WizardConfig,
    view: V,
    transport: T,
    identity: IdentityResolver,
    feedback: FeedbackChannel,
    state: WizardState,
    scenario: Option<ScenarioId>,
    last_identity: Option<Identity>,
}

impl<V: ViewPort, T: SubmitTransport> WizardSession<V, T> {
    /// Starts a session on the scenario screen and notifies the host runtime
    pub fn new(config: WizardConfig, mut view: V, transport: T, host: Arc<dyn HostBridge>, mailbox: AuthMailbox) -> Self {
        host.ready();
        host.expand();
        view.show_screen(WizardState::ScenarioSelect);

        let mut feedback = FeedbackChannel::new(config.enable_diagnostic_log);
        feedback.trace("session started");

        Self {
            config,
            view,
            transport,
            identity: IdentityResolver::new(host, mailbox),
            feedback,
            state: WizardState::ScenarioSelect,
            scenario: None,
            last_identity: None,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn selected_scenario(&self) -> Option<ScenarioId> {
        self.scenario
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access for hosts that feed user input into their view
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Handle for the Login Widget callback; can be cloned and moved anywhere
    pub fn auth_mailbox(&self) -> AuthMailbox {
        self.identity.mailbox().clone()
    }

    /// Identity used by the most recent submission attempt that got that far
    pub fn last_identity(&self) -> Option<&Identity> {
        self.last_identity.as_ref()
    }

    /// `None` unless the diagnostic trace is enabled
    pub fn diagnostic_trace(&self) -> Option<&DiagnosticTrace> {
        self.feedback.diagnostic_trace()
    }

    /// Scenario button click: `ScenarioSelect → InsightShown`
    pub fn select_scenario(&mut self, id: ScenarioId) -> Result<WizardState, WizardError> {
        if self.state != WizardState::ScenarioSelect {
            return Err(self.refuse(messages::STEP_UNAVAILABLE));
        }

        log::info!("Scenario selected: {} ({})", id, id.title());
        self.feedback.trace(format!("scenario selected: {}", id));
        self.scenario = Some(id);

        let insight = id.insight();
        self.view.set_insight(insight.display_text, insight.call_to_action_label);
        Ok(self.transition(WizardState::InsightShown))
    }

    /// Call-to-action click: `InsightShown → ContactForm`
    ///
    /// Also accepted on `ScenarioSelect`, where it is the only way to reach
    /// the form without a scenario: refused there with `SCENARIO_REQUIRED`
    /// unless `advance_without_scenario_guard` is set, in which case the
    /// insight screen is skipped and the lead goes out with `scenario: null`.
    pub fn proceed_to_contact(&mut self) -> Result<WizardState, WizardError> {
        if !matches!(self.state, WizardState::ScenarioSelect | WizardState::InsightShown) {
            return Err(self.refuse(messages::STEP_UNAVAILABLE));
        }
        if self.scenario.is_none() && !self.config.advance_without_scenario_guard {
            return Err(self.refuse(messages::SCENARIO_REQUIRED));
        }

        self.feedback.trace("proceeding to contact form");
        Ok(self.transition(WizardState::ContactForm))
    }

    /// Login Widget `data-onauth` callback
    pub fn handle_login_widget_auth(&mut self, auth: LoginWidgetAuth) {
        self.feedback.trace(format!("login widget auth: user {}", auth.id));
        self.identity.mailbox().deliver(auth);
        self.feedback.report_success(&mut self.view, messages::LOGIN_OK);
    }

    /// Form submit: stays on `ContactForm` on any failure, moves to `Success`
    /// only after the server accepted the lead.
    pub async fn submit_contact(&mut self) -> Result<WizardState, WizardError> {
        if self.state != WizardState::ContactForm {
            return Err(self.refuse(messages::STEP_UNAVAILABLE));
        }

        let form = self.view.read_contact_form();
        self.feedback.clear(&mut self.view, &[Field::Name, Field::Email]);

        let contact = match validate_contact(&form) {
            Ok(contact) => contact,
            Err((field, message)) => {
                let err = WizardError::Validation { field, message };
                self.report(&err);
                return Err(err);
            }
        };

        let identity = self.identity.resolve();
        self.feedback.trace(format!("identity source: {}", identity.source()));
        self.last_identity = Some(identity.clone());
        if identity.is_none() && self.config.require_identity {
            let err = WizardError::IdentityRequired;
            self.report(&err);
            return Err(err);
        }

        let payload = SubmissionPayload::new(contact, self.scenario, identity);
        log::info!(
            "Submitting lead: scenario={:?}, telegram_handle={}",
            payload.scenario.map(|s| s.to_string()),
            payload.telegram.is_some()
        );
        self.feedback.trace("submitting");

        // Only one request per session at a time: &mut self is held across the
        // await, and the control stays disabled until the answer arrives.
        self.view.set_submit_enabled(false);
        let result = self.transport.submit(&self.config.submit_path, &payload).await;
        self.view.set_submit_enabled(true);

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Submission transport failure: {}", e);
                let err = WizardError::Transport(e);
                self.report(&err);
                return Err(err);
            }
        };

        match reply.verdict() {
            SubmitVerdict::Rejected { message } => {
                let err = WizardError::Rejected { message };
                self.report(&err);
                Err(err)
            }
            SubmitVerdict::Accepted { lead_id, asset_path } => {
                log::info!("Lead accepted (lead_id: {:?})", lead_id);
                self.feedback.report_success(&mut self.view, messages::SUBMIT_OK);
                self.view.reset_contact_form();

                if !self.config.success_delay.is_zero() {
                    tokio::time::sleep(self.config.success_delay).await;
                }
                let state = self.transition(WizardState::Success);

                if self.config.post_submit_download {
                    self.download_asset(asset_path).await;
                }
                Ok(state)
            }
        }
    }

    /// Post-submit attachment; a failure is reported but Success stands
    async fn download_asset(&mut self, asset_path: Option<String>) {
        let path = asset_path.unwrap_or_else(|| self.config.download_path.clone());
        self.feedback.trace(format!("downloading {}", path));

        let delivered = match self.transport.fetch_asset(&path).await {
            Ok(download) => self.view.deliver_download(download).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(e) = delivered {
            log::error!("Checklist download failed: {}", e);
            self.feedback.report_error(&mut self.view, None, messages::DOWNLOAD_FAILED);
        }
    }

    fn transition(&mut self, next: WizardState) -> WizardState {
        log::debug!("Wizard: {} → {} (#{})", self.state, next, next.screen_id());
        self.feedback.trace(format!("screen: {}", next));
        self.state = next;
        self.view.show_screen(next);
        next
    }

    fn refuse(&mut self, message: &'static str) -> WizardError {
        let err = WizardError::Precondition(message);
        self.report(&err);
        err
    }

    fn report(&mut self, err: &WizardError) {
        self.feedback.report_error(&mut self.view, err.field(), err.user_message());
    }
}
