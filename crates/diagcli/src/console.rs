//! Terminal rendering of the wizard

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

use diagcore::wizard::{ContactForm, Download, Field, ScenarioId, StatusKind, StatusLine, ViewPort, WizardState};
use diagcore::config::endpoints;
use diagcore::AppResult;

static LIST_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<li[^>]*>").expect("list item regex"));
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("html tag regex"));

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Renders insight HTML as plain lines, list items become bullets
pub fn html_to_text(html: &str) -> String {
    let with_bullets = LIST_ITEM_RE.replace_all(html, "\n• ");
    HTML_TAG_RE
        .replace_all(&with_bullets, "")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// [`ViewPort`] printing to stdout; the driver fills `form` from stdin
#[derive(Debug)]
pub struct ConsoleView {
    pub form: ContactForm,
    download_dir: PathBuf,
    submit_enabled: bool,
    cta_label: String,
}

impl ConsoleView {
    pub fn new(download_dir: PathBuf) -> Self {
        Self {
            form: ContactForm::default(),
            download_dir,
            submit_enabled: true,
            cta_label: String::new(),
        }
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn cta_label(&self) -> &str {
        &self.cta_label
    }
}

impl ViewPort for ConsoleView {
    fn show_screen(&mut self, screen: WizardState) {
        println!();
        match screen {
            WizardState::ScenarioSelect => {
                println!("🧭 Диагностика ИТ-рисков — выберите ситуацию:");
                for id in ScenarioId::iter() {
                    println!("  {}. {}", id.number(), id.title());
                }
            }
            WizardState::InsightShown => println!("💡 Что важно знать"),
            WizardState::ContactForm => println!("✉️  Куда отправить чек-лист?"),
            WizardState::Success => println!("🎉 Готово! Проверьте Telegram и почту."),
        }
    }

    fn set_insight(&mut self, display_text: &str, call_to_action_label: &str) {
        self.cta_label = call_to_action_label.to_string();
        println!("{}", html_to_text(display_text));
        println!("[Enter] {}", call_to_action_label);
    }

    fn read_contact_form(&self) -> ContactForm {
        self.form.clone()
    }

    fn reset_contact_form(&mut self) {
        self.form = ContactForm::default();
    }

    fn mark_field(&mut self, field: Field, marked: bool) {
        if marked {
            println!("  ⚠ поле «{}»", field.input_name());
        }
    }

    fn set_status(&mut self, status: Option<&StatusLine>) {
        if let Some(status) = status {
            let color = match status.kind {
                StatusKind::Success => GREEN,
                StatusKind::Error => RED,
            };
            println!("{}{}{}", color, status.text, RESET);
        }
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
        if !enabled {
            println!("⏳ Отправляем...");
        }
    }

    fn deliver_download(&mut self, download: Download) -> AppResult<()> {
        // Only the final component of a server-supplied name is used
        let filename = Path::new(&download.filename)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| endpoints::DEFAULT_ASSET_NAME.into());
        fs_err::create_dir_all(&self.download_dir)?;
        let target = self.download_dir.join(filename);
        fs_err::write(&target, &download.bytes)?;
        log::info!("Saved {} ({} bytes)", target.display(), download.bytes.len());
        println!("📄 Чек-лист сохранён: {}", target.display());
        Ok(())
    }
}
