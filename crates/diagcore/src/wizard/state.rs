use strum::Display;

/// The screen currently shown. Exactly one is live at a time.
///
/// `ScenarioSelect → InsightShown → ContactForm → Success`; `Success` is
/// terminal, a reload starts a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum WizardState {
    #[default]
    #[strum(serialize = "scenario-select")]
    ScenarioSelect,
    #[strum(serialize = "insight")]
    InsightShown,
    #[strum(serialize = "contact-form")]
    ContactForm,
    #[strum(serialize = "success")]
    Success,
}

impl WizardState {
    /// Element id of the screen in the page markup
    pub fn screen_id(self) -> &'static str {
        match self {
            WizardState::ScenarioSelect => "screen1",
            WizardState::InsightShown => "screen2",
            WizardState::ContactForm => "screen3",
            WizardState::Success => "screen4",
        }
    }
}
