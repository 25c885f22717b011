//! Submission client
//!
//! Validates the contact form, builds the JSON payload, performs the single
//! `POST /submit` and classifies the answer. The HTTP side sits behind
//! [`SubmitTransport`] so the controller can be driven without a network.

use async_trait::async_trait;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::identity::{Identity, LoginWidgetAuth};
use super::messages;
use super::scenario::ScenarioId;
use super::validation::{has_valid_name_chars, has_valid_name_len, is_valid_email};
use super::view::{ContactForm, Download, Field};
use crate::core::config::{endpoints, network};
use crate::core::error::AppResult;

/// `status` value the backend uses to accept a lead
pub const ACCEPTANCE_MARKER: &str = "ok";

/// Failures where no usable server answer was obtained
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS, timeout, TLS...
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The body is not JSON at all
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// Non-2xx answer where a payload was required (downloads)
    #[error("unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("bad endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Validated contact details, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub telegram_handle: Option<String>,
}

/// Checks the form in fixed order and stops at the first problem:
/// name presence, name characters, name length, email presence, email syntax.
pub fn validate_contact(form: &ContactForm) -> Result<ContactInfo, (Field, &'static str)> {
    let name = form.name.trim();
    let email = form.email.trim();
    let telegram = form.telegram.trim();

    if name.is_empty() {
        return Err((Field::Name, messages::NAME_REQUIRED));
    }
    if !has_valid_name_chars(name) {
        return Err((Field::Name, messages::NAME_INVALID_CHARS));
    }
    if !has_valid_name_len(name) {
        return Err((Field::Name, messages::NAME_TOO_SHORT));
    }
    if email.is_empty() {
        return Err((Field::Email, messages::EMAIL_REQUIRED));
    }
    if !is_valid_email(email) {
        return Err((Field::Email, messages::EMAIL_INVALID));
    }

    Ok(ContactInfo {
        name: name.to_string(),
        email: email.to_string(),
        telegram_handle: (!telegram.is_empty()).then(|| telegram.to_string()),
    })
}

/// JSON body of `POST /submit`
///
/// `telegram_user_id` and `telegram_auth` are always present (possibly null);
/// `init_data` only when the raw blob is the resolved identity. At most one
/// identity field is non-null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    pub scenario: Option<ScenarioId>,
    pub telegram_user_id: Option<i64>,
    pub telegram_auth: Option<LoginWidgetAuth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_data: Option<String>,
}

impl SubmissionPayload {
    pub fn new(contact: ContactInfo, scenario: Option<ScenarioId>, identity: Identity) -> Self {
        let mut payload = Self {
            name: contact.name,
            email: contact.email,
            telegram: contact.telegram_handle,
            scenario,
            telegram_user_id: None,
            telegram_auth: None,
            init_data: None,
        };
        match identity {
            Identity::None => {}
            Identity::WebAppUserId(id) => payload.telegram_user_id = Some(id),
            Identity::LoginWidgetAuth(auth) => payload.telegram_auth = Some(auth),
            Identity::InitDataBlob(blob) => payload.init_data = Some(blob),
        }
        payload
    }
}

/// Fields of the `/submit` answer the wizard looks at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub lead_id: Option<Value>,
    pub pdf_url: Option<String>,
}

impl SubmitResponse {
    /// Picks the known fields out of any JSON value. A field of the wrong
    /// type reads as absent, so it never turns an answer into a transport
    /// failure.
    pub fn from_json(body: &Value) -> Self {
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            status: text("status"),
            message: text("message"),
            lead_id: body.get("lead_id").filter(|v| !v.is_null()).cloned(),
            pdf_url: text("pdf_url"),
        }
    }
}

/// HTTP status plus parsed body
#[derive(Debug, Clone, PartialEq)]
pub struct ServerReply {
    pub http_status: u16,
    pub body: SubmitResponse,
}

/// What the controller does with a server reply
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitVerdict {
    Accepted {
        lead_id: Option<Value>,
        asset_path: Option<String>,
    },
    Rejected {
        message: Option<String>,
    },
}

impl ServerReply {
    /// Accepted only on 2xx with `status == "ok"`
    pub fn verdict(self) -> SubmitVerdict {
        let is_success = (200..300).contains(&self.http_status);
        if is_success && self.body.status.as_deref() == Some(ACCEPTANCE_MARKER) {
            SubmitVerdict::Accepted {
                lead_id: self.body.lead_id,
                asset_path: self.body.pdf_url,
            }
        } else {
            SubmitVerdict::Rejected {
                message: self.body.message.filter(|m| !m.trim().is_empty()),
            }
        }
    }
}

/// Network side of the submission client
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    /// One POST of `payload` to `path`; no retries
    async fn submit(&self, path: &str, payload: &SubmissionPayload) -> Result<ServerReply, TransportError>;

    /// GET of a post-submit attachment
    async fn fetch_asset(&self, path: &str) -> Result<Download, TransportError>;
}

/// [`SubmitTransport`] over `reqwest`, resolving paths against a base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> AppResult<Self> {
        let client = reqwest::Client::builder().timeout(network::timeout()).build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> AppResult<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl SubmitTransport for HttpTransport {
    async fn submit(&self, path: &str, payload: &SubmissionPayload) -> Result<ServerReply, TransportError> {
        let url = self.endpoint(path)?;
        log::debug!("POST {}", url);

        let response = self.client.post(url).json(payload).send().await?;
        let http_status = response.status().as_u16();
        let raw = response.bytes().await?;

        let json: Value = serde_json::from_slice(&raw).map_err(|e| TransportError::MalformedBody(e.to_string()))?;
        let body = SubmitResponse::from_json(&json);
        log::debug!("Server answered {} with status {:?}", http_status, body.status);

        Ok(ServerReply { http_status, body })
    }

    async fn fetch_asset(&self, path: &str) -> Result<Download, TransportError> {
        let url = self.endpoint(path)?;
        log::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(TransportError::HttpStatus(response.status().as_u16()));
        }

        let headers = response.headers();
        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| endpoints::DEFAULT_ASSET_NAME.to_string());
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(Download {
            filename,
            content_type,
            bytes,
        })
    }
}

/// Extracts `filename` from a `Content-Disposition` header value
fn filename_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn contact() -> ContactInfo {
        ContactInfo {
            name: "Anna".to_string(),
            email: "anna@example.com".to_string(),
            telegram_handle: None,
        }
    }

    // ==================== validate_contact Tests ====================

    #[test]
    fn test_validation_order() {
        let cases = vec![
            (ContactForm::new("", "", ""), Field::Name, messages::NAME_REQUIRED),
            (ContactForm::new("   ", "bad", ""), Field::Name, messages::NAME_REQUIRED),
            (ContactForm::new("A1", "", ""), Field::Name, messages::NAME_INVALID_CHARS),
            (ContactForm::new("A", "", ""), Field::Name, messages::NAME_TOO_SHORT),
            (ContactForm::new("Anna", "  ", ""), Field::Email, messages::EMAIL_REQUIRED),
            (ContactForm::new("Anna", "a@b", ""), Field::Email, messages::EMAIL_INVALID),
        ];
        for (form, field, message) in cases {
            assert_eq!(validate_contact(&form), Err((field, message)), "form: {form:?}");
        }
    }

    #[test]
    fn test_validation_trims_and_drops_empty_handle() {
        let form = ContactForm::new("  Анна Петрова ", " anna@example.com ", "   ");
        let info = validate_contact(&form).unwrap();
        assert_eq!(info.name, "Анна Петрова");
        assert_eq!(info.email, "anna@example.com");
        assert_eq!(info.telegram_handle, None);

        let form = ContactForm::new("Anna", "anna@example.com", " @anna ");
        assert_eq!(validate_contact(&form).unwrap().telegram_handle.as_deref(), Some("@anna"));
    }

    // ==================== SubmissionPayload Tests ====================

    #[test]
    fn test_payload_without_identity() {
        let payload = SubmissionPayload::new(contact(), Some(ScenarioId::LaunchPreparation), Identity::None);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "name": "Anna",
                "email": "anna@example.com",
                "scenario": "2",
                "telegram_user_id": null,
                "telegram_auth": null,
            })
        );
    }

    #[test]
    fn test_payload_with_webapp_user() {
        let mut info = contact();
        info.telegram_handle = Some("@anna".to_string());
        let payload = SubmissionPayload::new(info, Some(ScenarioId::BudgetReview), Identity::WebAppUserId(42));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["telegram_user_id"], json!(42));
        assert_eq!(value["telegram_auth"], json!(null));
        assert_eq!(value["telegram"], json!("@anna"));
        assert_eq!(value["scenario"], json!("6"));
        assert!(value.get("init_data").is_none());
    }

    #[test]
    fn test_payload_with_widget_auth() {
        let auth = LoginWidgetAuth {
            id: 9,
            first_name: "Ivan".to_string(),
            last_name: None,
            username: None,
            photo_url: None,
            auth_date: 1_700_000_000,
            hash: "ab".to_string(),
        };
        let payload = SubmissionPayload::new(contact(), None, Identity::LoginWidgetAuth(auth));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["telegram_user_id"], json!(null));
        assert_eq!(value["telegram_auth"]["id"], json!(9));
        assert_eq!(value["scenario"], json!(null));
    }

    #[test]
    fn test_payload_with_init_data_blob() {
        let payload = SubmissionPayload::new(
            contact(),
            Some(ScenarioId::ProjectInCrisis),
            Identity::InitDataBlob("query_id=x&hash=y".to_string()),
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["init_data"], json!("query_id=x&hash=y"));
        assert_eq!(value["telegram_user_id"], json!(null));
        assert_eq!(value["telegram_auth"], json!(null));
    }

    // ==================== verdict Tests ====================

    fn reply(http_status: u16, body: Value) -> ServerReply {
        ServerReply {
            http_status,
            body: SubmitResponse::from_json(&body),
        }
    }

    #[test]
    fn test_verdict_accepted() {
        let verdict = reply(200, json!({"status": "ok", "lead_id": 15, "pdf_url": "/download"})).verdict();
        assert_eq!(
            verdict,
            SubmitVerdict::Accepted {
                lead_id: Some(json!(15)),
                asset_path: Some("/download".to_string()),
            }
        );
    }

    #[test]
    fn test_verdict_rejected_variants() {
        let rejected = vec![
            (reply(200, json!({"status": "error", "message": "Неверные данные"})), Some("Неверные данные")),
            (reply(200, json!({"status": "OK"})), None),
            (reply(200, json!({})), None),
            (reply(400, json!({"status": "ok"})), None),
            (reply(500, json!({"status": "error", "message": "  "})), None),
        ];
        for (reply, message) in rejected {
            assert_eq!(
                reply.verdict(),
                SubmitVerdict::Rejected {
                    message: message.map(str::to_string)
                }
            );
        }
    }

    #[test]
    fn test_response_ignores_wrongly_typed_fields() {
        let body = SubmitResponse::from_json(&json!({"status": "ok", "lead_id": 7, "pdf_url": 5}));
        assert_eq!(body.status.as_deref(), Some("ok"));
        assert_eq!(body.pdf_url, None);
        assert_eq!(
            reply(200, json!({"status": "ok", "lead_id": 7, "pdf_url": 5})).verdict(),
            SubmitVerdict::Accepted {
                lead_id: Some(json!(7)),
                asset_path: None,
            }
        );

        assert_eq!(
            reply(200, json!({"status": 0, "message": "CRM down"})).verdict(),
            SubmitVerdict::Rejected {
                message: Some("CRM down".to_string())
            }
        );
        assert_eq!(SubmitResponse::from_json(&json!(["ok"])), SubmitResponse::default());
        assert_eq!(SubmitResponse::from_json(&json!({"lead_id": null})).lead_id, None);
    }

    #[test]
    fn test_filename_from_disposition() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="checklist.pdf""#).as_deref(),
            Some("checklist.pdf")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=report.pdf").as_deref(),
            Some("report.pdf")
        );
        assert_eq!(filename_from_disposition("inline"), None);
        assert_eq!(filename_from_disposition(r#"attachment; filename="""#), None);
    }
}
